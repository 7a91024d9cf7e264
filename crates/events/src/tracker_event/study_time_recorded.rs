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

/// A study delta was folded into an identity's daily and total counters.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct StudyTimeRecorded {
    pub identity: Identity,
    /// UTC day index of the write
    pub day: u64,
    pub daily: EncryptedHandle,
    pub total: EncryptedHandle,
    /// True when the write crossed a day boundary and reset the daily counter
    pub rolled_over: bool,
}

impl Display for StudyTimeRecorded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "identity: {}, day: {}, rolled_over: {}",
            self.identity, self.day, self.rolled_over
        )
    }
}
