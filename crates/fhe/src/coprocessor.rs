// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{EncryptedHandle, EncryptedInput, FheError, HandleWidth};
use alloy_primitives::Address;

/// Encryption backend strategy. Selected once at construction time and shared
/// as `Arc<dyn FheCoprocessor>`; never swapped at call time.
///
/// Handles only ever reference ciphertexts held by the backend that minted
/// them. Mixing handles across backends yields `UnknownHandle`.
pub trait FheCoprocessor: Send + Sync {
    /// Randomized encryption of a 32-bit input, bound to the submitting
    /// `(contract, user)` pair by the returned validity proof. The same value
    /// may yield different ciphertexts but always decrypts back to `value`.
    fn encrypt_u32(
        &self,
        contract: Address,
        user: Address,
        value: u32,
    ) -> Result<EncryptedInput, FheError>;

    /// All-or-nothing precondition on externally submitted ciphertexts.
    /// Returns the verified handle, or `InvalidProof` with no side effects.
    fn verify_input(
        &self,
        contract: Address,
        user: Address,
        input: &EncryptedInput,
    ) -> Result<EncryptedHandle, FheError>;

    /// Ciphertext-level addition. Never decrypts either operand. Adding to an
    /// uninitialized (all-zero) handle returns the other operand unchanged.
    fn add(
        &self,
        a: &EncryptedHandle,
        b: &EncryptedHandle,
    ) -> Result<EncryptedHandle, FheError>;

    /// Encrypts a publicly-known constant, e.g. the 1 added to a task count.
    fn trivial_encrypt(&self, value: u64, width: HandleWidth) -> Result<EncryptedHandle, FheError>;

    /// Oracle-side decryption of a stored handle. Callers branch on the
    /// all-zero sentinel before getting here.
    fn reveal(&self, handle: &EncryptedHandle) -> Result<u64, FheError>;
}
