use std::collections::HashSet;
use std::hash::Hash;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels per scroll "line" for touchpads that report pixel deltas.
const PIXELS_PER_LINE: f32 = 120.0;

/// Held / pressed-this-frame / released-this-frame bookkeeping for one kind of button.
#[derive(Debug)]
struct Buttons<T> {
    down: HashSet<T>,
    pressed: HashSet<T>,
    released: HashSet<T>,
}

impl<T> Default for Buttons<T> {
    fn default() -> Self {
        Self {
            down: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> Buttons<T> {
    fn set(&mut self, button: T, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // key repeat arrives as extra presses
                if self.down.insert(button) {
                    self.pressed.insert(button);
                }
            }
            ElementState::Released => {
                if self.down.remove(&button) {
                    self.released.insert(button);
                }
            }
        }
    }

    fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    fn release_all(&mut self) {
        self.released.extend(self.down.drain());
    }
}

/// Keyboard and mouse state, rebuilt from window events each frame.
#[derive(Debug, Default)]
pub struct Input {
    keys: Buttons<KeyCode>,
    mouse: Buttons<MouseButton>,
    cursor: Option<Vec2>,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the per-frame deltas. Call once the frame has consumed them.
    pub fn begin_frame(&mut self) {
        self.keys.end_frame();
        self.mouse.end_frame();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.keys.set(key, event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse.set(*button, *state),
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                    MouseScrollDelta::PixelDelta(pos) => {
                        Vec2::new(pos.x as f32, pos.y as f32) / PIXELS_PER_LINE
                    }
                };
            }
            // buttons released while unfocused never reach us
            WindowEvent::Focused(false) => {
                self.keys.release_all();
                self.mouse.release_all();
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, position: Vec2) {
        // no delta for the first sample after the cursor enters
        if let Some(previous) = self.cursor {
            self.mouse_delta += position - previous;
        }
        self.cursor = Some(position);
    }

    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys.down.contains(&key)
    }

    /// True only on the frame the key went down.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys.pressed.contains(&key)
    }

    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse.down.contains(&button)
    }

    /// Cursor position in physical pixels, `None` while outside the window.
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Accumulated cursor movement this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll this frame, in lines.
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }
}
