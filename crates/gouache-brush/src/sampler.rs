use crate::color::Rgba;
use crate::config::BrushConfig;
use crate::math::{distance, lerp, lerp_angle};
use crate::sample::{DynamicsState, PointerSample};
use crate::shape::hash_unit;

/// Below this chord length the step direction is undefined.
const MIN_STEP_DISTANCE: f32 = 1e-6;

/// One stamp to composite. Consumed immediately by a [`StampSink`](crate::StampSink).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StampRequest {
    pub x: f32,
    pub y: f32,
    /// Diameter in logical pixels.
    pub size: f32,
    /// Tilt direction, radians.
    pub angle: f32,
    /// Minor/major axis ratio of the stamp ellipse.
    pub ratio: f32,
    pub color: Rgba,
}

/// Attributes at the last emitted stamp; the anchor for spacing.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Anchor {
    x: f32,
    y: f32,
    size: f32,
    angle: f32,
    ratio: f32,
}

impl From<&DynamicsState> for Anchor {
    fn from(s: &DynamicsState) -> Self {
        Self { x: s.x, y: s.y, size: s.size, angle: s.tilt_angle, ratio: s.ratio }
    }
}

#[derive(Debug, Copy, Clone)]
struct Stroke {
    state: DynamicsState,
    last_stamp: Anchor,
    travel: f32,
    seed: u32,
    sequence: u32,
}

/// Turns an irregular stream of pointer samples into arc-length spaced stamps.
///
/// A stroke starts with [`move_to`](Self::move_to) and continues with
/// [`stroke_to`](Self::stroke_to). Sub-spacing movement is never dropped: it
/// accumulates in `travel` and the remainder carries across calls, so the
/// output does not depend on how the input rate slices the path.
#[derive(Debug, Default)]
pub struct StrokeSampler {
    stroke: Option<Stroke>,
}

impl StrokeSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new stroke at `sample`. Emits nothing.
    pub fn move_to(&mut self, sample: PointerSample, config: &BrushConfig) {
        let state = DynamicsState::from_sample(sample, config);
        self.stroke = Some(Stroke {
            state,
            last_stamp: Anchor::from(&state),
            travel: 0.0,
            seed: stroke_seed(sample),
            sequence: 0,
        });
    }

    /// Ends the active stroke. The next `move_to` or `stroke_to` starts fresh.
    pub fn reset(&mut self) {
        self.stroke = None;
    }

    /// Continues the stroke toward `sample`, appending due stamps to `out`.
    ///
    /// Returns the number of stamps appended. A `stroke_to` without a preceding
    /// `move_to` starts the stroke instead.
    pub fn stroke_to(
        &mut self,
        sample: PointerSample,
        config: &BrushConfig,
        out: &mut Vec<StampRequest>,
    ) -> usize {
        if self.stroke.is_none() {
            log::trace!("stroke_to without move_to; starting stroke at ({}, {})", sample.x, sample.y);
            self.move_to(sample, config);
            return 0;
        }
        let Some(stroke) = self.stroke.as_mut() else { return 0 };

        let last_state = stroke.state;
        let state = last_state.blend(sample, config.blend_weight(), config);
        stroke.state = state;
        stroke.travel += last_state.distance_to(&state);

        let spacing = state.stamp_spacing(config);
        if stroke.travel < spacing {
            return 0;
        }

        let from = stroke.last_stamp;
        let to = Anchor::from(&state);
        let sdist = distance(from.x, from.y, to.x, to.y);
        let steps = (sdist / spacing).floor() as usize;

        let mut emitted = 0;
        if steps > 0 && sdist > MIN_STEP_DISTANCE {
            // Stamps chain along the chord at exact multiples of `spacing`;
            // each one becomes the anchor for the next.
            for i in 1..=steps {
                let f = (i as f32 * spacing) / sdist;
                let anchor = Anchor {
                    x: lerp(from.x, to.x, f),
                    y: lerp(from.y, to.y, f),
                    size: lerp(from.size, to.size, f),
                    angle: lerp_angle(from.angle, to.angle, f),
                    ratio: lerp(from.ratio, to.ratio, f),
                };
                out.push(stroke.stamp(&anchor, config));
                stroke.last_stamp = anchor;
                emitted += 1;
            }
        } else if steps > 0 {
            log::trace!("zero-length stamp step skipped (travel {:.3})", stroke.travel);
        }

        stroke.travel %= spacing;
        emitted
    }

    /// Path distance accumulated since the last emitted stamp.
    pub fn travel(&self) -> f32 {
        self.stroke.map_or(0.0, |s| s.travel)
    }

    /// Smoothed state of the active stroke, if any.
    pub fn state(&self) -> Option<&DynamicsState> {
        self.stroke.as_ref().map(|s| &s.state)
    }

    /// Position of the last emitted stamp (or the stroke origin).
    pub fn last_stamp(&self) -> Option<(f32, f32)> {
        self.stroke.as_ref().map(|s| (s.last_stamp.x, s.last_stamp.y))
    }
}

impl Stroke {
    fn stamp(&mut self, anchor: &Anchor, config: &BrushConfig) -> StampRequest {
        let (mut x, mut y) = (anchor.x, anchor.y);
        let jitter = config.jitter();
        if jitter > 0.0 {
            let reach = jitter * anchor.size;
            x += (hash_unit(self.seed, self.sequence, 0) * 2.0 - 1.0) * reach;
            y += (hash_unit(self.seed, self.sequence, 1) * 2.0 - 1.0) * reach;
        }
        self.sequence = self.sequence.wrapping_add(1);

        StampRequest {
            x,
            y,
            size: anchor.size,
            angle: anchor.angle,
            ratio: anchor.ratio,
            color: config.color(),
        }
    }
}

/// Stable per-stroke seed, so replaying a stroke jitters it identically.
fn stroke_seed(sample: PointerSample) -> u32 {
    crate::shape::hash3(sample.x.to_bits(), sample.y.to_bits(), 0x9e37_79b9)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: f32, density: f32) -> BrushConfig {
        let mut c = BrushConfig::default();
        c.set_size(size);
        c.set_density(density);
        c.set_smoothing(0.0);
        c
    }

    fn run(sampler: &mut StrokeSampler, c: &BrushConfig, points: &[(f32, f32)]) -> Vec<StampRequest> {
        let mut out = Vec::new();
        let (x0, y0) = points[0];
        sampler.move_to(PointerSample::new(x0, y0), c);
        for &(x, y) in &points[1..] {
            sampler.stroke_to(PointerSample::new(x, y), c, &mut out);
        }
        out
    }

    // ── concrete scenario ─────────────────────────────────────────────────

    #[test]
    fn straight_stroke_emits_twelve_stamps() {
        let c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        let out = run(&mut s, &c, &[(0.0, 0.0), (100.0, 0.0)]);

        assert_eq!(out.len(), 12);
        for (i, stamp) in out.iter().enumerate() {
            let expected = 8.0 * (i + 1) as f32;
            assert!((stamp.x - expected).abs() < 1e-4, "stamp {i}: {}", stamp.x);
            assert_eq!(stamp.y, 0.0);
            assert_eq!(stamp.size, 32.0);
        }
        assert!((s.travel() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn move_to_emits_nothing() {
        let c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        s.move_to(PointerSample::new(5.0, 5.0), &c);
        assert_eq!(s.travel(), 0.0);
        assert_eq!(s.last_stamp(), Some((5.0, 5.0)));
    }

    #[test]
    fn reset_ends_stroke() {
        let c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        run(&mut s, &c, &[(0.0, 0.0), (40.0, 0.0)]);
        s.reset();
        assert_eq!(s.state(), None);

        // The next stroke_to starts over instead of chaining from x = 40.
        let mut out = Vec::new();
        assert_eq!(s.stroke_to(PointerSample::new(80.0, 0.0), &c, &mut out), 0);
        assert!(out.is_empty());
        assert_eq!(s.last_stamp(), Some((80.0, 0.0)));
    }

    // ── spacing / travel ──────────────────────────────────────────────────

    #[test]
    fn spacing_invariant_across_small_calls() {
        let c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        let mut points = vec![(0.0, 0.0)];
        // Irregular input rate along a diagonal.
        let mut t = 0.0f32;
        for i in 0..200 {
            t += 0.3 + (i % 7) as f32 * 0.45;
            points.push((t * 0.6, t * 0.8));
        }
        let out = run(&mut s, &c, &points);

        assert!(out.len() > 10);
        let mut prev = (0.0f32, 0.0f32);
        for stamp in &out {
            let d = distance(prev.0, prev.1, stamp.x, stamp.y);
            assert!((d - 8.0).abs() < 1e-2, "gap {d}");
            prev = (stamp.x, stamp.y);
        }
    }

    #[test]
    fn travel_is_conserved() {
        let c = config(20.0, 2.0);
        let mut s = StrokeSampler::new();
        let mut points = vec![(0.0, 0.0)];
        for i in 1..=137 {
            points.push((i as f32 * 0.73, 0.0));
        }
        let out = run(&mut s, &c, &points);

        let spacing = c.stamp_spacing(1.0, 0.0);
        let total = 137.0 * 0.73;
        let consumed = out.len() as f32 * spacing;
        assert!((consumed + s.travel() - total).abs() < 1e-2, "{consumed} + {} vs {total}", s.travel());
    }

    #[test]
    fn sub_threshold_movement_is_deferred_not_dropped() {
        let c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        let mut out = Vec::new();
        s.move_to(PointerSample::new(0.0, 0.0), &c);
        for x in [3.0, 6.0] {
            assert_eq!(s.stroke_to(PointerSample::new(x, 0.0), &c, &mut out), 0);
        }
        assert_eq!(s.stroke_to(PointerSample::new(9.0, 0.0), &c, &mut out), 1);
        assert!((out[0].x - 8.0).abs() < 1e-5);
        assert!((s.travel() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn spacing_follows_pressure_mid_stroke() {
        let c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        let mut out = Vec::new();
        s.move_to(PointerSample::new(0.0, 0.0).with_pressure(0.5), &c);
        // pressure 0.5 → response 0.5 → spacing 4
        s.stroke_to(PointerSample::new(20.0, 0.0).with_pressure(0.5), &c, &mut out);
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|st| (st.size - 16.0).abs() < 1e-4));
    }

    #[test]
    fn attributes_interpolate_between_anchors() {
        let c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        let mut out = Vec::new();
        s.move_to(PointerSample::new(0.0, 0.0).with_pressure(0.5), &c);
        s.stroke_to(PointerSample::new(16.0, 0.0), &c, &mut out);
        // Spacing 8 at the new (full) pressure: two stamps, sizes 16 → 32.
        assert_eq!(out.len(), 2);
        assert!((out[0].size - 24.0).abs() < 1e-4);
        assert!((out[1].size - 32.0).abs() < 1e-4);
    }

    // ── degenerate geometry ───────────────────────────────────────────────

    #[test]
    fn zero_distance_pressure_change_never_emits_nan() {
        let mut c = config(32.0, 4.0);
        c.set_pressure_factor(1.0);
        let mut s = StrokeSampler::new();
        let mut out = Vec::new();
        s.move_to(PointerSample::new(50.0, 50.0), &c);
        s.stroke_to(PointerSample::new(50.0, 50.0).with_pressure(0.0), &c, &mut out);
        s.stroke_to(PointerSample::new(50.0, 50.0).with_tilt(1.0, 3.0), &c, &mut out);
        assert!(out.is_empty());
        assert!(s.travel().is_finite());
    }

    #[test]
    fn returning_to_last_stamp_carries_travel() {
        let c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        let mut out = Vec::new();
        s.move_to(PointerSample::new(0.0, 0.0), &c);
        s.stroke_to(PointerSample::new(5.0, 0.0), &c, &mut out);
        // Travel reaches 10 but the chord back to the anchor is zero.
        s.stroke_to(PointerSample::new(0.0, 0.0), &c, &mut out);
        assert!(out.is_empty());
        assert_eq!(s.last_stamp(), Some((0.0, 0.0)));
        assert!((s.travel() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn stroke_to_without_move_to_starts_stroke() {
        let c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        let mut out = Vec::new();
        assert_eq!(s.stroke_to(PointerSample::new(10.0, 10.0), &c, &mut out), 0);
        assert_eq!(s.last_stamp(), Some((10.0, 10.0)));
    }

    // ── smoothing / jitter ────────────────────────────────────────────────

    #[test]
    fn smoothed_stroke_still_spaces_evenly() {
        let mut c = config(32.0, 4.0);
        c.set_smoothing(0.6);
        let mut s = StrokeSampler::new();
        let points: Vec<(f32, f32)> = (0..120).map(|i| (i as f32 * 2.0, 0.0)).collect();
        let out = run(&mut s, &c, &points);
        for pair in out.windows(2) {
            assert!(((pair[1].x - pair[0].x) - 8.0).abs() < 1e-3);
        }
        // The smoothed state trails the pointer.
        assert!(s.state().map_or(false, |st| st.x < 238.0));
    }

    #[test]
    fn jitter_is_deterministic_per_stroke() {
        let mut c = config(32.0, 4.0);
        c.set_jitter(0.5);
        let a = run(&mut StrokeSampler::new(), &c, &[(0.0, 0.0), (60.0, 0.0)]);
        let b = run(&mut StrokeSampler::new(), &c, &[(0.0, 0.0), (60.0, 0.0)]);
        assert_eq!(a, b);
        assert!(a.iter().any(|st| st.y != 0.0));
        assert!(a.iter().all(|st| st.y.abs() <= 16.0 + 1e-4));
    }

    #[test]
    fn stamp_carries_live_color() {
        let mut c = config(32.0, 4.0);
        let mut s = StrokeSampler::new();
        let mut out = Vec::new();
        s.move_to(PointerSample::new(0.0, 0.0), &c);
        c.set_color(Rgba::new(1.0, 0.0, 0.0, 1.0));
        s.stroke_to(PointerSample::new(8.0, 0.0), &c, &mut out);
        assert_eq!(out[0].color, Rgba::new(1.0, 0.0, 0.0, 1.0));
    }
}
