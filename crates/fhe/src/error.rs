// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{EncryptedHandle, HandleWidth};

#[derive(Debug, thiserror::Error)]
pub enum FheError {
    #[error("input proof failed verification")]
    InvalidProof,
    #[error("operand widths do not match: {0} vs {1}")]
    WidthMismatch(HandleWidth, HandleWidth),
    #[error("no ciphertext stored for handle {0}")]
    UnknownHandle(EncryptedHandle),
    #[error("value {0} exceeds plaintext capacity {1}")]
    ValueOutOfRange(u64, u64),
    #[error("bfv backend failure: {0}")]
    Bfv(#[from] fhe::Error),
}
