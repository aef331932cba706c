//! `Server-Timing` accumulation

use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Named durations collected while serving one request
#[derive(Debug, Clone)]
pub struct ServerTiming {
    started: Instant,
    entries: Vec<(&'static str, Duration)>,
}

impl ServerTiming {
    /// Start measuring at `started`
    #[must_use]
    pub const fn starting_at(started: Instant) -> Self {
        Self {
            started,
            entries: Vec::new(),
        }
    }

    /// Record a measurement; a repeated name adds up
    pub fn record(&mut self, name: &'static str, duration: Duration) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, total)) => *total += duration,
            None => self.entries.push((name, duration)),
        }
    }

    /// Header value, ending with `total` measured up to now
    #[must_use]
    pub fn header_value(&self) -> String {
        self.header_value_at(self.started.elapsed())
    }

    fn header_value_at(&self, total: Duration) -> String {
        let mut out = String::new();
        for (name, duration) in &self.entries {
            let _ = write!(out, "{name};dur={}, ", millis(*duration));
        }
        let _ = write!(out, "total;dur={}", millis(total));
        out
    }
}

fn millis(d: Duration) -> String {
    format!("{:.1}", d.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_only() {
        let timing = ServerTiming::starting_at(Instant::now());
        assert_eq!(
            timing.header_value_at(Duration::from_millis(5)),
            "total;dur=5.0"
        );
    }

    #[test]
    fn entries_then_total() {
        let mut timing = ServerTiming::starting_at(Instant::now());
        timing.record("provider", Duration::from_micros(12_340));
        timing.record("provider", Duration::from_millis(1));
        timing.record("cache", Duration::from_micros(300));
        assert_eq!(
            timing.header_value_at(Duration::from_millis(20)),
            "provider;dur=13.3, cache;dur=0.3, total;dur=20.0"
        );
    }

    #[test]
    fn live_total_is_present() {
        let timing = ServerTiming::starting_at(Instant::now());
        assert!(timing.header_value().starts_with("total;dur="));
    }
}
