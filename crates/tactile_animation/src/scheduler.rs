//! Frame scheduler
//!
//! Drives the per-frame integration of a [`ValueStore`]. The scheduler
//! does not own the values: the controller that owns the store hands it
//! to [`AnimationScheduler::tick`] once per display frame, after all input
//! for that frame has been applied. Input writes and integration are
//! therefore ordered by the caller and never race.

use std::time::{Duration, Instant};

use crate::values::ValueStore;

/// Default upper bound for a single frame's time step
pub const DEFAULT_MAX_FRAME_DT: Duration = Duration::from_micros(1_000_000 / 15);

/// Ticks shared values at display cadence
#[derive(Debug)]
pub struct AnimationScheduler {
    last_frame: Option<Instant>,
    max_frame_dt: Duration,
    frame: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
            frame: 0,
        }
    }

    /// Limit how far a single frame may advance the simulation
    ///
    /// Frames that arrive late (window hidden, debugger attached) are
    /// clamped to this step instead of jumping the springs forward.
    pub fn with_max_frame_dt(mut self, max: Duration) -> Self {
        self.max_frame_dt = max;
        self
    }

    pub fn max_frame_dt(&self) -> Duration {
        self.max_frame_dt
    }

    /// Number of frames ticked so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Tick using the wall clock
    ///
    /// The first tick after creation (or after [`reset_clock`]) only
    /// records the time and advances nothing.
    ///
    /// [`reset_clock`]: AnimationScheduler::reset_clock
    pub fn tick(&mut self, values: &mut ValueStore) -> bool {
        let now = Instant::now();
        let dt = match self.last_frame.replace(now) {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.tick_with_dt(values, dt.as_secs_f64())
    }

    /// Tick with an explicit time step in seconds
    ///
    /// Returns `true` if any value is still animating.
    pub fn tick_with_dt(&mut self, values: &mut ValueStore, dt: f64) -> bool {
        let dt = dt.clamp(0.0, self.max_frame_dt.as_secs_f64());
        self.frame += 1;

        let active = values.step_all(dt);

        if self.frame % 120 == 0 {
            tracing::debug!(
                "AnimationScheduler: frame {} dt={:.4}s active={}",
                self.frame,
                dt,
                values.active_count()
            );
        } else {
            tracing::trace!("AnimationScheduler: frame {} dt={:.4}s", self.frame, dt);
        }

        active
    }

    /// Forget the last frame time so the next [`tick`] starts fresh
    ///
    /// [`tick`]: AnimationScheduler::tick
    pub fn reset_clock(&mut self) {
        self.last_frame = None;
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spring::SpringConfig;

    #[test]
    fn test_scheduler_tick() {
        let mut scheduler = AnimationScheduler::new();
        let mut values = ValueStore::new();
        let id = values.create(0.0);
        values.spring_to(id, 100.0, SpringConfig::snappy());

        assert!(scheduler.tick_with_dt(&mut values, 1.0 / 60.0));
        assert!(values.current(id).unwrap() > 0.0);
        assert_eq!(scheduler.frame(), 1);
    }

    #[test]
    fn test_first_wall_clock_tick_advances_nothing() {
        let mut scheduler = AnimationScheduler::new();
        let mut values = ValueStore::new();
        let id = values.create(0.0);
        values.spring_to(id, 100.0, SpringConfig::snappy());

        assert!(scheduler.tick(&mut values));
        assert_eq!(values.current(id), Some(0.0));
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut clamped = AnimationScheduler::new().with_max_frame_dt(Duration::from_millis(16));
        let mut reference = AnimationScheduler::new().with_max_frame_dt(Duration::from_millis(16));

        let mut a = ValueStore::new();
        let mut b = ValueStore::new();
        let ia = a.create(0.0);
        let ib = b.create(0.0);
        a.spring_to(ia, 100.0, SpringConfig::snappy());
        b.spring_to(ib, 100.0, SpringConfig::snappy());

        clamped.tick_with_dt(&mut a, 5.0);
        reference.tick_with_dt(&mut b, 0.016);
        assert_eq!(a.current(ia), b.current(ib));
    }
}
