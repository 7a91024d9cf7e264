// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::CorrelationId;
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Inbound oracle callback carrying the clear value for an earlier request.
/// Delivery is asynchronous and unordered; at most one per request id.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct DecryptionResolved {
    pub request_id: CorrelationId,
    pub value: u64,
}

impl Display for DecryptionResolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request_id: {}", self.request_id)
    }
}
