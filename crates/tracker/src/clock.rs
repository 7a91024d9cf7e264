// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub const SECONDS_PER_DAY: u64 = 86400;

/// Time source for day-boundary accounting. Injected so tests can cross day
/// boundaries without waiting.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> u64;
}

/// Wall-clock time in UTC. Day boundaries are calendar days with no timezone
/// adjustment.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Days since the unix epoch for the given timestamp.
pub fn day_index(now_secs: u64) -> u64 {
    now_secs / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_index() {
        assert_eq!(day_index(0), 0);
        assert_eq!(day_index(86399), 0);
        assert_eq!(day_index(86400), 1);
        assert_eq!(day_index(86400 * 2 + 1), 2);
    }
}
