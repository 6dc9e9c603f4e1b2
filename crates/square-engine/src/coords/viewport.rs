use super::CanvasSize;

/// Viewport rectangle in physical pixels, as passed to `set_viewport`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// The viewport `(0, 0, canvas.width, canvas.height)`.
    #[inline]
    pub fn covering(canvas: CanvasSize) -> Self {
        Self::new(0.0, 0.0, canvas.width as f32, canvas.height as f32)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covering_matches_canvas_dimensions() {
        let vp = ViewportRect::covering(CanvasSize::new(640, 480));
        assert_eq!(vp, ViewportRect::new(0.0, 0.0, 640.0, 480.0));
    }

    #[test]
    fn empty_canvas_gives_invalid_viewport() {
        assert!(!ViewportRect::covering(CanvasSize::new(0, 480)).is_valid());
        assert!(ViewportRect::covering(CanvasSize::new(1, 1)).is_valid());
    }
}
