/// Viewport size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Physical texel extent at `scale`, never below 1x1.
    pub fn physical_extent(self, scale: f32) -> (u32, u32) {
        let w = (self.width * scale).round().max(1.0) as u32;
        let h = (self.height * scale).round().max(1.0) as u32;
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_scales_and_clamps() {
        assert_eq!(Viewport::new(640.0, 360.0).physical_extent(2.0), (1280, 720));
        assert_eq!(Viewport::new(0.0, 10.0).physical_extent(1.0), (1, 10));
    }

    #[test]
    fn zero_is_invalid() {
        assert!(!Viewport::default().is_valid());
        assert!(Viewport::new(1.0, 1.0).is_valid());
    }
}
