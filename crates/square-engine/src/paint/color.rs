/// RGBA color with components in `[0, 1]`.
///
/// Values are written to the framebuffer as given: the square pass has no
/// blend stage, so there is no premultiplication step to honor.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Background the canvas is cleared to before the square is drawn.
    pub const CLEAR_GRAY: Self = Self::rgba(0.5, 0.5, 0.5, 0.9);

    /// Fill emitted by the fragment shader for every covered pixel.
    pub const SQUARE_FILL: Self = Self::rgba(0.0, 0.0, 0.0, 0.1);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Clear value for a render pass load op.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}
