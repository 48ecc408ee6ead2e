/// RGBA color with channels in `[0, 1]`, stored in sRGB space.
///
/// Colors are authored the way a stylesheet would write them (`#5661ff`) and
/// converted to linear space only when they are uploaded to the GPU.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::rgba(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::rgba(0.0, 0.0, 1.0, 1.0);

    /// Parse `#rrggbb` or `rrggbb`. Case-insensitive; anything else is `None`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::hex)
    }

    /// Format as lowercase `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Per-channel linear interpolation. `t = 0` returns `self` and `t = 1`
    /// returns `other`, both exactly.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Color::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Convert the color channels from sRGB to linear space. Alpha is kept.
    pub fn to_linear(self) -> Color {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Color::rgba(channel(self.r), channel(self.g), channel(self.b), self.a)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// 8-bit sRGB channels, as color pickers want them.
    pub fn to_rgb8(self) -> [u8; 3] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// Replace the color channels from 8-bit sRGB, keeping alpha.
    pub fn set_rgb8(&mut self, rgb: [u8; 3]) {
        self.r = rgb[0] as f32 / 255.0;
        self.g = rgb[1] as f32 / 255.0;
        self.b = rgb[2] as f32 / 255.0;
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let linear = self.to_linear();
        wgpu::Color {
            r: linear.r as f64,
            g: linear.g as f64,
            b: linear.b as f64,
            a: linear.a as f64,
        }
    }
}
