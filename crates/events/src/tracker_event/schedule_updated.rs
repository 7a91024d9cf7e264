// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::Identity;
use actix::Message;
use est_fhe::EncryptedHandle;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A schedule entry was folded into an identity's lifetime counters.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct ScheduleUpdated {
    pub identity: Identity,
    pub goal_count: EncryptedHandle,
    pub completed_count: EncryptedHandle,
    pub priority_sum: EncryptedHandle,
    pub task_count: EncryptedHandle,
}

impl Display for ScheduleUpdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "identity: {}", self.identity)
    }
}
