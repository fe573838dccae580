//! Poll tick source.
//!
//! Wall-clock based, no internal thread: the watch loops ask `due()`,
//! run one poll to completion, then `mark_ran()`. Because a tick is only
//! consumed after the previous poll finished, polls never overlap.

use chrono::{DateTime, Duration, Utc};

pub struct PollScheduler {
    interval: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl PollScheduler {
    pub fn new(interval_seconds: u64) -> Self {
        Self {
            // Capped at a year; keeps the chrono arithmetic well in range.
            interval: Duration::seconds(interval_seconds.min(31_536_000) as i64),
            next_due: None,
        }
    }

    /// The first tick is due immediately; afterwards one interval after the
    /// previous run.
    pub fn due(&self, now: DateTime<Utc>) -> bool {
        self.next_due.map_or(true, |due| now >= due)
    }

    pub fn mark_ran(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now + self.interval);
    }

    /// How long the loop may sleep before the next tick.
    pub fn sleep_duration(&self, now: DateTime<Utc>) -> std::time::Duration {
        match self.next_due {
            Some(due) if due > now => (due - now)
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(1)),
            _ => std::time::Duration::ZERO,
        }
    }
}
