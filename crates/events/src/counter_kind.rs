// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The counter families tracked per identity. `Daily` and `Total` belong to
/// the study tracker; the rest belong to the schedule variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    Daily,
    Total,
    Goal,
    Completed,
    PrioritySum,
    TaskCount,
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CounterKind::Daily => "daily",
            CounterKind::Total => "total",
            CounterKind::Goal => "goal",
            CounterKind::Completed => "completed",
            CounterKind::PrioritySum => "priority_sum",
            CounterKind::TaskCount => "task_count",
        };
        f.write_str(name)
    }
}
