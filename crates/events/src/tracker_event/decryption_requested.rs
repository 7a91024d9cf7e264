// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CorrelationId, CounterKind, Identity};
use actix::Message;
use est_fhe::EncryptedHandle;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Outbound request to the decryption oracle: reveal the clear value behind
/// `handle` to `identity`, tagged for correlation. The handle is guaranteed
/// non-zero by the gateway.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct DecryptionRequested {
    pub request_id: CorrelationId,
    pub identity: Identity,
    pub kind: CounterKind,
    pub handle: EncryptedHandle,
}

impl Display for DecryptionRequested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request_id: {}, identity: {}, kind: {}",
            self.request_id, self.identity, self.kind
        )
    }
}
