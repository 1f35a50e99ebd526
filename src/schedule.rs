use std::time::{Duration, Instant};

/// A cancellable fixed-interval timer, polled by whoever owns the clock.
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Schedule {
    pub fn new(interval: Duration) -> Self {
        Schedule { interval, next_due: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// (Re)arms the timer, replacing any pending deadline.
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Consumes one firing if the deadline has passed and re-arms from `now`.
    /// A late poll fires once, not once per missed interval.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// How long until the next firing, zero if overdue.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_150: Duration = Duration::from_millis(150);

    #[test]
    fn test_fires_after_interval() {
        let t0 = Instant::now();
        let mut schedule = Schedule::new(MS_150);
        schedule.arm(t0);

        assert!(!schedule.take_due(t0));
        assert!(!schedule.take_due(t0 + Duration::from_millis(149)));
        assert!(schedule.take_due(t0 + MS_150));
        assert!(!schedule.take_due(t0 + MS_150));
        assert_eq!(schedule.time_until(t0 + MS_150), Some(MS_150));
    }

    #[test]
    fn test_late_poll_fires_once() {
        let t0 = Instant::now();
        let mut schedule = Schedule::new(MS_150);
        schedule.arm(t0);

        let late = t0 + MS_150 * 5;
        assert!(schedule.take_due(late));
        assert!(!schedule.take_due(late));
    }

    #[test]
    fn test_cancelled_never_fires() {
        let t0 = Instant::now();
        let mut schedule = Schedule::new(MS_150);
        schedule.arm(t0);
        schedule.cancel();

        assert!(!schedule.is_armed());
        assert!(!schedule.take_due(t0 + MS_150 * 10));
        assert_eq!(schedule.time_until(t0), None);
    }
}
