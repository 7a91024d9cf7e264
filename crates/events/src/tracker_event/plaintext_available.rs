// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CorrelationId, CounterKind, Identity};
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A decryption round trip completed: the gateway matched an oracle callback
/// to its pending request and the clear value is ready for the caller.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct PlaintextAvailable {
    pub request_id: CorrelationId,
    pub identity: Identity,
    pub kind: CounterKind,
    pub value: u64,
}

impl Display for PlaintextAvailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request_id: {}, identity: {}, kind: {}",
            self.request_id, self.identity, self.kind
        )
    }
}
