// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::ClientError;
use alloy_primitives::{keccak256, Address, B256};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wallet seam. The real signer lives in the user's wallet; anything that
/// can produce a signature over a 32-byte digest fits here.
pub trait AuthSigner: Send + Sync {
    fn address(&self) -> Address;
    fn sign_digest(&self, digest: B256) -> Result<Vec<u8>, ClientError>;
}

/// Deterministic in-process signer. Not a real ECDSA wallet; it exists so
/// tests and the CLI can exercise the authorization flow and count signing
/// prompts.
pub struct LocalSigner {
    address: Address,
    sign_count: AtomicUsize,
}

impl LocalSigner {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            sign_count: AtomicUsize::new(0),
        }
    }

    /// Number of times the user would have been prompted to sign.
    pub fn sign_count(&self) -> usize {
        self.sign_count.load(Ordering::SeqCst)
    }
}

impl AuthSigner for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_digest(&self, digest: B256) -> Result<Vec<u8>, ClientError> {
        self.sign_count.fetch_add(1, Ordering::SeqCst);
        let sig = keccak256([self.address.as_slice(), digest.as_slice()].concat());
        Ok(sig.to_vec())
    }
}
