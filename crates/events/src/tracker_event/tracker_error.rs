// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct TrackerError {
    pub err_type: TrackerErrorType,
    pub message: String,
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackerErrorType {
    /// Submitted ciphertext failed platform verification
    InvalidProof,
    /// Decryption requested on an uninitialized counter
    NoData,
    /// Oracle callback for a correlation id nobody is waiting on
    UnknownRequestId,
    Decryption,
    Data,
}

impl TrackerError {
    pub fn new(err_type: TrackerErrorType, message: &str) -> Self {
        Self {
            err_type,
            message: message.to_string(),
        }
    }
}
