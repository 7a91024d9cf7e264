// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Logical bit-width tag carried by every handle so arithmetic can be
/// type-checked without inspecting the encryption internals.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleWidth {
    Uint32,
    Uint64,
}

impl Display for HandleWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleWidth::Uint32 => write!(f, "uint32"),
            HandleWidth::Uint64 => write!(f, "uint64"),
        }
    }
}

/// Opaque 32-byte reference to a ciphertext stored by the co-processor.
///
/// The all-zero byte pattern is reserved for "no data": a counter that has
/// never been written. Callers must branch on [`is_uninitialized`] before
/// asking for decryption.
///
/// [`is_uninitialized`]: EncryptedHandle::is_uninitialized
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncryptedHandle {
    pub width: HandleWidth,
    pub bytes: [u8; 32],
}

impl EncryptedHandle {
    pub fn new(width: HandleWidth, bytes: [u8; 32]) -> Self {
        Self { width, bytes }
    }

    /// The uninitialized sentinel for a counter of the given width.
    pub fn zero(width: HandleWidth) -> Self {
        Self {
            width,
            bytes: [0u8; 32],
        }
    }

    pub fn is_uninitialized(&self) -> bool {
        self.bytes == [0u8; 32]
    }
}

impl Display for EncryptedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.bytes))
    }
}

/// Opaque attestation that a submitted ciphertext was correctly formed
/// from a claimed plaintext. Checked all-or-nothing by the co-processor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputProof(pub Vec<u8>);

/// Ciphertext handle plus its validity proof, as produced by the client
/// adapter and submitted to the counter store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncryptedInput {
    pub handle: EncryptedHandle,
    pub proof: InputProof,
}
