// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use est_tracker::Clock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Manually advanced clock so tests can cross day boundaries on demand.
pub struct SimClock {
    now_secs: AtomicU64,
}

impl SimClock {
    pub fn new(start_secs: u64) -> Self {
        Self {
            now_secs: AtomicU64::new(start_secs),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.now_secs.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, secs: u64) {
        self.now_secs.store(secs, Ordering::SeqCst);
    }
}

impl Clock for SimClock {
    fn now_secs(&self) -> u64 {
        self.now_secs.load(Ordering::SeqCst)
    }
}
