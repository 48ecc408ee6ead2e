//! Error types for window and GPU setup.
//!
//! The wave itself cannot fail; everything here comes from the platform.

use std::fmt;

/// Errors that can occur while bringing up the GPU.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter can present to the window's surface.
    NoAdapter(wgpu::RequestAdapterError),
    /// The adapter refused to hand out a device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface and adapter share no usable configuration.
    UnsupportedSurface,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "failed to create GPU surface: {e}"),
            GpuError::NoAdapter(e) => write!(
                f,
                "no compatible GPU adapter found ({e}); a Vulkan, Metal, DX12 or GL driver is required"
            ),
            GpuError::DeviceCreation(e) => write!(f, "failed to create GPU device: {e}"),
            GpuError::UnsupportedSurface => write!(f, "window surface is not supported by the adapter"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::NoAdapter(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::UnsupportedSurface => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that end the application.
#[derive(Debug)]
pub enum AppError {
    /// The event loop could not be created or exited abnormally.
    EventLoop(winit::error::EventLoopError),
    /// The OS refused to open the window.
    Window(winit::error::OsError),
    Gpu(GpuError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "event loop error: {e}"),
            AppError::Window(e) => write!(f, "failed to create window: {e}"),
            AppError::Gpu(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}
