//! Frame pacing.
//!
//! The event loop never sleeps itself; it asks the clock for the next deadline and
//! hands it to winit as `ControlFlow::WaitUntil`. winit wakes early for any window
//! event, which is what lets a close request cut the wait short.
//!
//! All methods take `now` explicitly so the pacing rules can be tested without
//! sleeping.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FrameClock {
    budget: Duration,
    /// When the previous frame started; `None` until the first `tick`.
    last: Option<Instant>,
    next_deadline: Instant,
}

impl FrameClock {
    /// A clock capping iterations at `fps` per second (at least 1).
    pub fn new(fps: u32, now: Instant) -> Self {
        Self {
            budget: Duration::from_secs(1) / fps.max(1),
            last: None,
            next_deadline: now,
        }
    }

    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// The earliest instant the next frame may start.
    #[inline]
    pub fn deadline(&self) -> Instant {
        self.next_deadline
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_deadline
    }

    /// Mark the start of a frame and return the time since the previous one.
    ///
    /// The next deadline is one budget after the previous deadline, so frames stay on a
    /// steady grid. If the loop fell more than a budget behind (a stall, a dragged
    /// window), the grid restarts from `now` instead of bursting to catch up.
    pub fn tick(&mut self, now: Instant) -> Duration {
        let elapsed = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);

        let scheduled = self.next_deadline + self.budget;
        self.next_deadline = if scheduled <= now {
            now + self.budget
        } else {
            scheduled
        };

        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn budget_matches_fps() {
        let clock = FrameClock::new(60, Instant::now());
        assert_eq!(clock.budget(), Duration::from_nanos(16_666_666));
        let clock = FrameClock::new(0, Instant::now());
        assert_eq!(clock.budget(), Duration::from_secs(1));
    }

    #[test]
    fn first_frame_is_due_immediately() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(50, t0);
        assert!(clock.is_due(t0));
        assert_eq!(clock.tick(t0), Duration::ZERO);
        assert_eq!(clock.deadline(), t0 + 20 * MS);
        assert!(!clock.is_due(t0 + 19 * MS));
        assert!(clock.is_due(t0 + 20 * MS));
    }

    #[test]
    fn deadlines_stay_on_grid_when_slightly_late() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(50, t0);
        clock.tick(t0);
        let dt = clock.tick(t0 + 23 * MS);
        assert_eq!(dt, 23 * MS);
        assert_eq!(clock.deadline(), t0 + 40 * MS);
    }

    #[test]
    fn long_stall_does_not_burst() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(50, t0);
        clock.tick(t0);
        clock.tick(t0 + 500 * MS);
        assert_eq!(clock.deadline(), t0 + 520 * MS);
        assert!(!clock.is_due(t0 + 501 * MS));
    }
}
