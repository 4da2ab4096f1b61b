//! Radial falloff model for a single stamp.
//!
//! This is the CPU reference for what `stamp.wgsl` evaluates per fragment.
//! Both sides must agree on the easing, the softness floor and the hash.

use crate::config::BrushConfig;

/// Lower bound for `1 - hardness`, keeps the falloff division finite.
pub const MIN_SOFTNESS: f32 = 0.01;

/// Cubic Bezier easing curve through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`.
///
/// Same parametrisation as CSS `cubic-bezier()`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const EASE_IN_CUBIC: CubicBezier = CubicBezier::new(0.32, 0.0, 0.67, 0.0);
    pub const LINEAR: CubicBezier = CubicBezier::new(0.0, 0.0, 1.0, 1.0);

    #[inline]
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Control points packed as `[x1, y1, x2, y2]` for uniform upload.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Evaluates the easing at `x ∈ [0, 1]`.
    pub fn ease(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(x);
        bezier(t, self.y1, self.y2)
    }

    /// Finds `t` with `bx(t) = x`: Newton first, bisection if the slope flattens.
    fn solve_t(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..8 {
            let err = bezier(t, self.x1, self.x2) - x;
            if err.abs() < 1e-6 {
                return t;
            }
            let slope = bezier_slope(t, self.x1, self.x2);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let v = bezier(t, self.x1, self.x2);
            if (v - x).abs() < 1e-6 {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::EASE_IN_CUBIC
    }
}

#[inline]
fn bezier(t: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

#[inline]
fn bezier_slope(t: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// 32-bit integer hash of three inputs (PCG-style permutation).
///
/// Mirrored bit-for-bit by `hash3` in `stamp.wgsl`.
#[inline]
pub fn hash3(a: u32, b: u32, c: u32) -> u32 {
    let mut v = a
        .wrapping_mul(1664525)
        .wrapping_add(1013904223)
        ^ b.wrapping_mul(2246822519)
        ^ c.wrapping_mul(3266489917);
    v ^= v >> 16;
    v = v.wrapping_mul(747796405).wrapping_add(2891336453);
    let word = ((v >> ((v >> 28) + 4)) ^ v).wrapping_mul(277803737);
    (word >> 22) ^ word
}

/// `hash3` mapped to `[0, 1)`.
#[inline]
pub fn hash_unit(a: u32, b: u32, c: u32) -> f32 {
    (hash3(a, b, c) >> 8) as f32 / (1u32 << 24) as f32
}

/// Identifies one fragment of one stamp for noise purposes.
///
/// `counter` is a monotonic frame counter, so the same stamp gets the same grain
/// within a frame and different grain across frames.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GrainSeed {
    pub pixel: [u32; 2],
    pub instance: u32,
    pub counter: u32,
}

impl GrainSeed {
    #[inline]
    pub fn sample(self) -> f32 {
        hash_unit(self.pixel[0] ^ self.counter.rotate_left(16), self.pixel[1], self.instance)
    }
}

/// Per-batch falloff parameters, shared by every stamp of a frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Falloff {
    pub softness: f32,
    pub noise: f32,
    pub curve: CubicBezier,
}

impl Falloff {
    pub fn new(hardness: f32, noise: f32, curve: CubicBezier) -> Self {
        Self {
            softness: softness_for(hardness),
            noise: noise.clamp(0.0, 1.0),
            curve,
        }
    }

    pub fn from_config(config: &BrushConfig) -> Self {
        Self {
            softness: config.softness(),
            noise: config.noise(),
            curve: config.falloff_curve(),
        }
    }

    /// Coverage of a stamp at normalized offset `o ∈ [-1, 1]²` from its center.
    ///
    /// `grain` adds the dithering term; `None` evaluates the clean profile.
    pub fn alpha(&self, o: [f32; 2], grain: Option<GrainSeed>) -> f32 {
        let r = (o[0] * o[0] + o[1] * o[1]).sqrt();
        let mut f = (1.0 - r) / self.softness;
        if let Some(seed) = grain {
            f += seed.sample() * self.noise * 0.5 - self.noise;
        }
        self.curve.ease(f.clamp(0.0, 1.0))
    }
}

#[inline]
pub fn softness_for(hardness: f32) -> f32 {
    (1.0 - hardness).max(MIN_SOFTNESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── easing ────────────────────────────────────────────────────────────

    #[test]
    fn ease_endpoints() {
        let c = CubicBezier::EASE_IN_CUBIC;
        assert_eq!(c.ease(0.0), 0.0);
        assert_eq!(c.ease(1.0), 1.0);
        assert_eq!(c.ease(-3.0), 0.0);
        assert_eq!(c.ease(7.0), 1.0);
    }

    #[test]
    fn linear_curve_is_identity() {
        let c = CubicBezier::LINEAR;
        for i in 1..10 {
            let x = i as f32 / 10.0;
            assert!((c.ease(x) - x).abs() < 1e-4, "x={x} got {}", c.ease(x));
        }
    }

    #[test]
    fn ease_in_is_below_diagonal_and_monotonic() {
        let c = CubicBezier::EASE_IN_CUBIC;
        let mut prev = 0.0;
        for i in 1..20 {
            let x = i as f32 / 20.0;
            let y = c.ease(x);
            assert!(y < x, "ease-in should lag: x={x} y={y}");
            assert!(y >= prev);
            prev = y;
        }
    }

    // ── falloff ───────────────────────────────────────────────────────────

    #[test]
    fn center_is_opaque_edge_is_clear() {
        let f = Falloff::new(0.75, 0.0, CubicBezier::EASE_IN_CUBIC);
        assert_eq!(f.alpha([0.0, 0.0], None), 1.0);
        assert_eq!(f.alpha([1.0, 0.0], None), 0.0);
        assert_eq!(f.alpha([0.8, 0.8], None), 0.0);
    }

    #[test]
    fn hardness_one_uses_softness_floor() {
        let f = Falloff::new(1.0, 0.0, CubicBezier::LINEAR);
        assert_eq!(f.softness, MIN_SOFTNESS);
        // Fully covered until the last 1% of the radius.
        assert_eq!(f.alpha([0.98, 0.0], None), 1.0);
        assert!(f.alpha([0.995, 0.0], None) < 1.0);
    }

    #[test]
    fn softer_brush_fades_earlier() {
        let hard = Falloff::new(0.9, 0.0, CubicBezier::LINEAR);
        let soft = Falloff::new(0.1, 0.0, CubicBezier::LINEAR);
        assert!(soft.alpha([0.5, 0.0], None) < hard.alpha([0.5, 0.0], None));
    }

    // ── noise ─────────────────────────────────────────────────────────────

    #[test]
    fn grain_is_deterministic() {
        let seed = GrainSeed { pixel: [10, 20], instance: 3, counter: 99 };
        assert_eq!(seed.sample(), seed.sample());
        let f = Falloff::new(0.2, 0.5, CubicBezier::LINEAR);
        assert_eq!(f.alpha([0.6, 0.1], Some(seed)), f.alpha([0.6, 0.1], Some(seed)));
    }

    #[test]
    fn grain_varies_between_frames_and_stamps() {
        let base = GrainSeed { pixel: [10, 20], instance: 3, counter: 99 };
        let next_frame = GrainSeed { counter: 100, ..base };
        let other_stamp = GrainSeed { instance: 4, ..base };
        assert_ne!(base.sample(), next_frame.sample());
        assert_ne!(base.sample(), other_stamp.sample());
    }

    #[test]
    fn hash_unit_stays_in_range() {
        for i in 0..1000 {
            let v = hash_unit(i, i.wrapping_mul(7), 13);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn zero_noise_ignores_grain() {
        let f = Falloff::new(0.3, 0.0, CubicBezier::EASE_IN_CUBIC);
        let seed = GrainSeed { pixel: [1, 2], instance: 0, counter: 0 };
        assert_eq!(f.alpha([0.4, 0.2], Some(seed)), f.alpha([0.4, 0.2], None));
    }
}
