//! System clock.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Reads the wall clock in UTC; report headers are stamped from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_falls_between_two_system_readings() {
        let before = Utc::now();
        let stamp = LiveClock.now();
        assert!(before <= stamp && stamp <= Utc::now());
    }
}
