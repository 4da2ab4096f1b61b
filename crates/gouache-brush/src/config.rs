use crate::color::Rgba;
use crate::shape::{softness_for, CubicBezier};

/// Upper bound for smoothing; at 1.0 the blend weight would reach zero and
/// the pointer would never move.
pub const MAX_SMOOTHING: f32 = 0.89;

/// Live brush settings.
///
/// This is mutable state read by the sampler and the renderer on every call,
/// not a one-shot init struct: a change made mid-stroke applies from the next
/// `stroke_to`. Fields are private so every write goes through a setter that
/// clamps the value and refreshes whatever is derived from it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BrushConfig {
    size: f32,
    hardness: f32,
    noise: f32,
    density: f32,
    jitter: f32,
    opacity: f32,
    smoothing: f32,
    pressure_factor: f32,
    tilt_factor: f32,
    color: Rgba,
    falloff_curve: CubicBezier,

    // derived
    softness: f32,
    blend_weight: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        let mut config = Self {
            size: 32.0,
            hardness: 0.75,
            noise: 0.2,
            density: 8.0,
            jitter: 0.0,
            opacity: 1.0,
            smoothing: 0.25,
            pressure_factor: 1.0,
            tilt_factor: 1.0,
            color: Rgba::BLACK,
            falloff_curve: CubicBezier::EASE_IN_CUBIC,
            softness: 0.0,
            blend_weight: 0.0,
        };
        config.set_hardness(config.hardness);
        config.set_smoothing(config.smoothing);
        config
    }
}

impl BrushConfig {
    // ── getters ───────────────────────────────────────────────────────────

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn hardness(&self) -> f32 {
        self.hardness
    }

    #[inline]
    pub fn noise(&self) -> f32 {
        self.noise
    }

    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    #[inline]
    pub fn jitter(&self) -> f32 {
        self.jitter
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[inline]
    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    #[inline]
    pub fn pressure_factor(&self) -> f32 {
        self.pressure_factor
    }

    #[inline]
    pub fn tilt_factor(&self) -> f32 {
        self.tilt_factor
    }

    #[inline]
    pub fn color(&self) -> Rgba {
        self.color
    }

    #[inline]
    pub fn falloff_curve(&self) -> CubicBezier {
        self.falloff_curve
    }

    /// `max(1 - hardness, MIN_SOFTNESS)`, refreshed by [`set_hardness`](Self::set_hardness).
    #[inline]
    pub fn softness(&self) -> f32 {
        self.softness
    }

    /// Smoothing blend weight `1 - smoothing^0.3`, refreshed by
    /// [`set_smoothing`](Self::set_smoothing).
    #[inline]
    pub fn blend_weight(&self) -> f32 {
        self.blend_weight
    }

    // ── setters ───────────────────────────────────────────────────────────

    /// Base stamp diameter in logical pixels. Clamped to `>= 0.5`.
    pub fn set_size(&mut self, size: f32) {
        self.size = size.max(0.5);
    }

    /// Side effect: regenerates the falloff softness.
    pub fn set_hardness(&mut self, hardness: f32) {
        self.hardness = hardness.clamp(0.0, 1.0);
        self.softness = softness_for(self.hardness);
    }

    pub fn set_noise(&mut self, noise: f32) {
        self.noise = noise.clamp(0.0, 1.0);
    }

    /// Stamps per brush diameter. Clamped to `>= 0.01`.
    pub fn set_density(&mut self, density: f32) {
        self.density = density.max(0.01);
    }

    /// Positional jitter as a fraction of the stamp size.
    pub fn set_jitter(&mut self, jitter: f32) {
        self.jitter = jitter.clamp(0.0, 1.0);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Side effect: regenerates the blend weight. Clamped to `[0, MAX_SMOOTHING]`.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, MAX_SMOOTHING);
        self.blend_weight = 1.0 - self.smoothing.powf(0.3);
    }

    pub fn set_pressure_factor(&mut self, factor: f32) {
        self.pressure_factor = factor.max(0.0);
    }

    pub fn set_tilt_factor(&mut self, factor: f32) {
        self.tilt_factor = factor.max(0.0);
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color.clamped();
    }

    pub fn set_falloff_curve(&mut self, curve: CubicBezier) {
        self.falloff_curve = CubicBezier::new(
            curve.x1.clamp(0.0, 1.0),
            curve.y1,
            curve.x2.clamp(0.0, 1.0),
            curve.y2,
        );
    }

    // ── response curves ───────────────────────────────────────────────────

    /// `0.5 + (p - 0.5) × pressure_factor`.
    #[inline]
    pub fn pressure_response(&self, pressure: f32) -> f32 {
        0.5 + (pressure - 0.5) * self.pressure_factor
    }

    /// Elliptical foreshortening `1 / (1 + m × tilt_factor × 0.1)`.
    #[inline]
    pub fn tilt_ratio(&self, tilt_magnitude: f32) -> f32 {
        1.0 / (1.0 + tilt_magnitude * self.tilt_factor * 0.1)
    }

    /// Stamp diameter for a given pressure.
    #[inline]
    pub fn stamp_size(&self, pressure: f32) -> f32 {
        self.size * self.pressure_response(pressure).max(0.1)
    }

    /// Arc-length distance between consecutive stamps at this pressure and tilt.
    #[inline]
    pub fn stamp_spacing(&self, pressure: f32, tilt_magnitude: f32) -> f32 {
        self.size / self.density
            * self.pressure_response(pressure).max(0.1)
            * self.tilt_ratio(tilt_magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = BrushConfig::default();
        assert_eq!(c.size(), 32.0);
        assert_eq!(c.hardness(), 0.75);
        assert_eq!(c.density(), 8.0);
        assert_eq!(c.smoothing(), 0.25);
        assert_eq!(c.color(), Rgba::BLACK);
        assert!((c.softness() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn set_hardness_regenerates_softness() {
        let mut c = BrushConfig::default();
        c.set_hardness(0.4);
        assert!((c.softness() - 0.6).abs() < 1e-6);
        c.set_hardness(2.0);
        assert_eq!(c.hardness(), 1.0);
        assert_eq!(c.softness(), crate::shape::MIN_SOFTNESS);
    }

    #[test]
    fn set_smoothing_regenerates_weight() {
        let mut c = BrushConfig::default();
        c.set_smoothing(0.0);
        assert_eq!(c.blend_weight(), 1.0);
        c.set_smoothing(0.5);
        assert!((c.blend_weight() - (1.0 - 0.5f32.powf(0.3))).abs() < 1e-6);
        c.set_smoothing(5.0);
        assert_eq!(c.smoothing(), MAX_SMOOTHING);
        assert!(c.blend_weight() > 0.0);
    }

    #[test]
    fn setters_clamp_degenerate_values() {
        let mut c = BrushConfig::default();
        c.set_size(-4.0);
        c.set_density(0.0);
        assert!(c.size() > 0.0);
        assert!(c.density() > 0.0);
        assert!(c.stamp_spacing(1.0, 0.0).is_finite());
    }

    #[test]
    fn spacing_at_full_pressure() {
        let mut c = BrushConfig::default();
        c.set_size(32.0);
        c.set_density(4.0);
        assert_eq!(c.stamp_spacing(1.0, 0.0), 8.0);
    }

    #[test]
    fn spacing_shrinks_with_pressure_and_tilt() {
        let c = BrushConfig::default();
        assert!(c.stamp_spacing(0.2, 0.0) < c.stamp_spacing(1.0, 0.0));
        assert!(c.stamp_spacing(1.0, 5.0) < c.stamp_spacing(1.0, 0.0));
    }

    #[test]
    fn pressure_response_floor() {
        let mut c = BrushConfig::default();
        c.set_pressure_factor(4.0);
        // 0.5 + (0 - 0.5) * 4 = -1.5, floored to 0.1 for size.
        assert!((c.stamp_size(0.0) - c.size() * 0.1).abs() < 1e-5);
    }

    #[test]
    fn tilt_ratio_values() {
        let c = BrushConfig::default();
        assert_eq!(c.tilt_ratio(0.0), 1.0);
        assert!((c.tilt_ratio(10.0) - 0.5).abs() < 1e-6);
    }
}
