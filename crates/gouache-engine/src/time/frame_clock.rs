use std::time::{Duration, Instant};

/// Weight of the newest sample in the frame-time average.
pub const DEFAULT_AVERAGE_WEIGHT: f32 = 0.1;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Exponentially weighted moving average of `dt`, in seconds.
    pub avg_dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Smoothed frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        1.0 / self.avg_dt
    }
}

/// Produces `FrameTime` snapshots for one window.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// feed pathological values downstream.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
    avg_dt: f32,
    average_weight: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
            avg_dt: 1.0 / 60.0,
            average_weight: DEFAULT_AVERAGE_WEIGHT,
        }
    }

    /// Sets the EWMA weight of the newest sample, clamped to `(0, 1]`.
    pub fn with_average_weight(mut self, weight: f32) -> Self {
        self.average_weight = weight.clamp(f32::EPSILON, 1.0);
        self
    }

    /// Resets the baseline, e.g. after resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max)
            .as_secs_f32();
        self.last = now;

        let w = self.average_weight;
        self.avg_dt = (1.0 - w) * self.avg_dt + w * dt;

        let ft = FrameTime {
            dt,
            avg_dt: self.avg_dt,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn average_converges_to_steady_rate() {
        let mut clock = FrameClock::new();
        let mut now = clock.last;
        let mut ft = None;
        for _ in 0..200 {
            now += ms(20);
            ft = Some(clock.tick_at(now));
        }
        let ft = ft.unwrap();
        assert!((ft.avg_dt - 0.020).abs() < 1e-4, "avg {}", ft.avg_dt);
        assert!((ft.fps() - 50.0).abs() < 0.5);
    }

    #[test]
    fn single_spike_moves_average_by_weight() {
        let mut clock = FrameClock::new();
        let start = clock.avg_dt;
        let ft = clock.tick_at(clock.last + ms(100));
        let expected = 0.9 * start + 0.1 * 0.100;
        assert!((ft.avg_dt - expected).abs() < 1e-6);
    }

    #[test]
    fn dt_is_clamped() {
        let mut clock = FrameClock::new();
        let ft = clock.tick_at(clock.last + Duration::from_secs(5));
        assert_eq!(ft.dt, 0.25);
        let ft = clock.tick_at(clock.last);
        assert!((ft.dt - 0.0001).abs() < 1e-7);
    }

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        let base = clock.last;
        assert_eq!(clock.tick_at(base + ms(16)).frame_index, 0);
        assert_eq!(clock.tick_at(base + ms(32)).frame_index, 1);
    }
}
