//! Scalar helpers shared by the sampler and the shape model.

use std::f32::consts::{PI, TAU};

/// Linear interpolation with `f` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, f: f32) -> f32 {
    a + (b - a) * f.clamp(0.0, 1.0)
}

/// Wraps an angle into `[0, 2π)`.
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let w = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if w >= TAU { 0.0 } else { w }
}

/// Signed shortest-arc difference `to - from`, in `(-π, π]`.
#[inline]
pub fn angle_diff(to: f32, from: f32) -> f32 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI { d - TAU } else { d }
}

/// Circular interpolation along the shortest arc. Result is wrapped into `[0, 2π)`.
#[inline]
pub fn lerp_angle(a: f32, b: f32, f: f32) -> f32 {
    wrap_angle(a + angle_diff(b, a) * f.clamp(0.0, 1.0))
}

#[inline]
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    (bx - ax).hypot(by - ay)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deg(d: f32) -> f32 {
        d.to_radians()
    }

    // ── lerp ──────────────────────────────────────────────────────────────

    #[test]
    fn lerp_midpoint() {
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn lerp_clamps_fraction() {
        assert_eq!(lerp(2.0, 4.0, 1.5), 4.0);
        assert_eq!(lerp(2.0, 4.0, -1.0), 2.0);
    }

    // ── angles ────────────────────────────────────────────────────────────

    #[test]
    fn lerp_angle_takes_shortest_arc_across_zero() {
        let a = lerp_angle(deg(350.0), deg(10.0), 0.5);
        // 0°, not the naive 180°.
        assert!(angle_diff(a, 0.0).abs() < 1e-4, "got {a}");
    }

    #[test]
    fn lerp_angle_plain_case_matches_linear() {
        let a = lerp_angle(deg(10.0), deg(50.0), 0.25);
        assert!((a - deg(20.0)).abs() < 1e-5);
    }

    #[test]
    fn angle_diff_range_is_half_open() {
        assert!((angle_diff(PI, 0.0) - PI).abs() < 1e-6);
        assert!((angle_diff(deg(10.0), deg(350.0)) - deg(20.0)).abs() < 1e-5);
        assert!((angle_diff(deg(350.0), deg(10.0)) + deg(20.0)).abs() < 1e-5);
    }

    #[test]
    fn wrap_angle_negative_input() {
        assert!((wrap_angle(-deg(90.0)) - deg(270.0)).abs() < 1e-5);
        assert!(wrap_angle(-1e-9) < TAU);
    }
}
