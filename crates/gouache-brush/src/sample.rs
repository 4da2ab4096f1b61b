use crate::config::BrushConfig;
use crate::math::{distance, lerp, lerp_angle};

/// One raw pointer sample as delivered by the input adapter.
///
/// Positions are logical pixels. `pressure` must already be clamped to `[0, 1]`;
/// smoothing lerps it and never renormalizes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    /// Tilt direction in radians.
    pub tilt_angle: f32,
    /// Tilt amount, `>= 0`.
    pub tilt_magnitude: f32,
}

impl PointerSample {
    /// Full pressure, no tilt.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, pressure: 1.0, tilt_angle: 0.0, tilt_magnitude: 0.0 }
    }

    #[inline]
    pub const fn with_pressure(mut self, pressure: f32) -> Self {
        self.pressure = pressure;
        self
    }

    #[inline]
    pub const fn with_tilt(mut self, angle: f32, magnitude: f32) -> Self {
        self.tilt_angle = angle;
        self.tilt_magnitude = magnitude;
        self
    }
}

/// Smoothed pointer state for the active stroke, plus the brush response
/// derived from it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DynamicsState {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub tilt_angle: f32,
    pub tilt_magnitude: f32,

    /// Stamp diameter at this pressure.
    pub size: f32,
    /// Elliptical foreshortening from tilt.
    pub ratio: f32,
}

impl DynamicsState {
    pub fn from_sample(sample: PointerSample, config: &BrushConfig) -> Self {
        Self::derive(
            sample.x,
            sample.y,
            sample.pressure,
            sample.tilt_angle,
            sample.tilt_magnitude,
            config,
        )
    }

    /// Blends toward `sample` by `weight`. Angles take the shortest arc.
    pub fn blend(&self, sample: PointerSample, weight: f32, config: &BrushConfig) -> Self {
        Self::derive(
            lerp(self.x, sample.x, weight),
            lerp(self.y, sample.y, weight),
            lerp(self.pressure, sample.pressure, weight),
            lerp_angle(self.tilt_angle, sample.tilt_angle, weight),
            lerp(self.tilt_magnitude, sample.tilt_magnitude, weight),
            config,
        )
    }

    #[inline]
    pub fn distance_to(&self, other: &DynamicsState) -> f32 {
        distance(self.x, self.y, other.x, other.y)
    }

    /// Spacing for the next stamp. Recomputed on every call because pressure
    /// and tilt move mid-stroke.
    #[inline]
    pub fn stamp_spacing(&self, config: &BrushConfig) -> f32 {
        config.stamp_spacing(self.pressure, self.tilt_magnitude)
    }

    fn derive(
        x: f32,
        y: f32,
        pressure: f32,
        tilt_angle: f32,
        tilt_magnitude: f32,
        config: &BrushConfig,
    ) -> Self {
        Self {
            x,
            y,
            pressure,
            tilt_angle,
            tilt_magnitude,
            size: config.stamp_size(pressure),
            ratio: config.tilt_ratio(tilt_magnitude),
        }
    }
}
