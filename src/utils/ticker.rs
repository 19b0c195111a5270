use std::time::{Duration, Instant};

/// Cancelable fixed-interval timer driven by the UI frame loop.
///
/// Holds at most one pending deadline. `poll` fires once the deadline has
/// passed and schedules the next one; `cancel` drops the deadline so nothing
/// fires until the next `start`.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Schedule the first tick one interval after `now`, replacing any pending one
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Returns true when a tick is due, rescheduling the next one from `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick (zero if overdue), None when canceled
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_interval() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_secs(1));
        ticker.start(start);

        assert!(!ticker.poll(start));
        assert!(!ticker.poll(start + Duration::from_millis(999)));
        assert!(ticker.poll(start + Duration::from_secs(1)));
        assert!(!ticker.poll(start + Duration::from_millis(1500)));
        assert!(ticker.poll(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_secs(1));
        ticker.start(start);
        ticker.cancel();

        assert!(!ticker.poll(start + Duration::from_secs(5)));
        assert_eq!(None, ticker.time_until_next(start));
    }

    #[test]
    fn test_time_until_next() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(800));
        ticker.start(start);

        assert_eq!(
            Some(Duration::from_millis(300)),
            ticker.time_until_next(start + Duration::from_millis(500))
        );
        assert_eq!(
            Some(Duration::ZERO),
            ticker.time_until_next(start + Duration::from_secs(2))
        );
    }
}
