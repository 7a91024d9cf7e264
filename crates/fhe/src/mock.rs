// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::proof::{bind_input, check_input};
use crate::{EncryptedHandle, EncryptedInput, FheCoprocessor, FheError, HandleWidth};
use alloy_primitives::Address;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Deterministic test double. Same handle and proof shapes as the real
/// backend, arithmetic on clear values. Handles derive from a seed plus a
/// monotonic counter so runs are reproducible.
pub struct MockCoprocessor {
    seed: u64,
    plaintexts: Mutex<HashMap<[u8; 32], u64>>,
    next_nonce: AtomicU64,
}

impl MockCoprocessor {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            plaintexts: Mutex::new(HashMap::new()),
            next_nonce: AtomicU64::new(1),
        }
    }

    fn mint(&self, width: HandleWidth, value: u64) -> EncryptedHandle {
        let nonce = self.next_nonce.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(b"est.mock");
        hasher.update(self.seed.to_le_bytes());
        hasher.update(nonce.to_le_bytes());
        let handle = EncryptedHandle::new(width, hasher.finalize().into());
        self.plaintexts.lock().unwrap().insert(handle.bytes, value);
        handle
    }

    fn fetch(&self, handle: &EncryptedHandle) -> Result<u64, FheError> {
        self.plaintexts
            .lock()
            .unwrap()
            .get(&handle.bytes)
            .copied()
            .ok_or(FheError::UnknownHandle(*handle))
    }
}

impl Default for MockCoprocessor {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FheCoprocessor for MockCoprocessor {
    fn encrypt_u32(
        &self,
        contract: Address,
        user: Address,
        value: u32,
    ) -> Result<EncryptedInput, FheError> {
        let handle = self.mint(HandleWidth::Uint32, value as u64);
        let proof = bind_input(&handle, contract, user);
        Ok(EncryptedInput { handle, proof })
    }

    fn verify_input(
        &self,
        contract: Address,
        user: Address,
        input: &EncryptedInput,
    ) -> Result<EncryptedHandle, FheError> {
        check_input(input, contract, user)
    }

    fn add(&self, a: &EncryptedHandle, b: &EncryptedHandle) -> Result<EncryptedHandle, FheError> {
        if a.is_uninitialized() {
            return Ok(*b);
        }
        if b.is_uninitialized() {
            return Ok(*a);
        }
        if a.width != b.width {
            return Err(FheError::WidthMismatch(a.width, b.width));
        }
        let sum = self.fetch(a)?.wrapping_add(self.fetch(b)?);
        Ok(self.mint(a.width, sum))
    }

    fn trivial_encrypt(&self, value: u64, width: HandleWidth) -> Result<EncryptedHandle, FheError> {
        Ok(self.mint(width, value))
    }

    fn reveal(&self, handle: &EncryptedHandle) -> Result<u64, FheError> {
        self.fetch(handle)
    }
}
