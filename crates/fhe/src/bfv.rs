// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::proof::{bind_input, check_input};
use crate::{
    params::SET_2048_1032193_1, EncryptedHandle, EncryptedInput, FheCoprocessor, FheError,
    HandleWidth, SharedRng,
};
use alloy_primitives::Address;
use fhe::bfv::{
    BfvParameters, BfvParametersBuilder, Ciphertext, Encoding, Plaintext, PublicKey, SecretKey,
};
use fhe_traits::{
    DeserializeParametrized, FheDecoder, FheDecrypter, FheEncoder, FheEncrypter,
    Serialize as FheSerialize,
};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Real BFV backend over fhe.rs. Holds the key pair on behalf of the
/// platform's key-management service and a handle to serialized-ciphertext
/// table standing in for the platform's ciphertext storage.
pub struct BfvCoprocessor {
    params: Arc<BfvParameters>,
    public_key: PublicKey,
    secret_key: SecretKey,
    rng: SharedRng,
    ciphertexts: Mutex<HashMap<[u8; 32], Vec<u8>>>,
    next_nonce: AtomicU64,
}

impl BfvCoprocessor {
    pub fn new(rng: SharedRng) -> Result<Self, FheError> {
        let (degree, plaintext_modulus, moduli) = SET_2048_1032193_1;
        let params = BfvParametersBuilder::new()
            .set_degree(degree)
            .set_plaintext_modulus(plaintext_modulus)
            .set_moduli(&moduli)
            .build_arc()?;
        let secret_key = SecretKey::random(&params, &mut *rng.lock().unwrap());
        let public_key = PublicKey::new(&secret_key, &mut *rng.lock().unwrap());
        Ok(Self {
            params,
            public_key,
            secret_key,
            rng,
            ciphertexts: Mutex::new(HashMap::new()),
            next_nonce: AtomicU64::new(1),
        })
    }

    /// Counters accumulate mod the plaintext modulus, so accepted inputs are
    /// bounded by it to keep decryption exact.
    pub fn plaintext_capacity(&self) -> u64 {
        self.params.plaintext()
    }

    fn mint(&self, width: HandleWidth, ciphertext: Vec<u8>) -> EncryptedHandle {
        let nonce = self.next_nonce.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(&ciphertext);
        hasher.update(nonce.to_le_bytes());
        let handle = EncryptedHandle::new(width, hasher.finalize().into());
        self.ciphertexts
            .lock()
            .unwrap()
            .insert(handle.bytes, ciphertext);
        handle
    }

    fn fetch(&self, handle: &EncryptedHandle) -> Result<Ciphertext, FheError> {
        let bytes = self
            .ciphertexts
            .lock()
            .unwrap()
            .get(&handle.bytes)
            .cloned()
            .ok_or(FheError::UnknownHandle(*handle))?;
        Ok(Ciphertext::from_bytes(&bytes, &self.params)?)
    }

    fn encrypt_value(&self, value: u64, width: HandleWidth) -> Result<EncryptedHandle, FheError> {
        if value >= self.params.plaintext() {
            return Err(FheError::ValueOutOfRange(value, self.params.plaintext()));
        }
        let pt = Plaintext::try_encode(&[value], Encoding::poly(), &self.params)?;
        let ct = self
            .public_key
            .try_encrypt(&pt, &mut *self.rng.lock().unwrap())?;
        Ok(self.mint(width, ct.to_bytes()))
    }
}

impl FheCoprocessor for BfvCoprocessor {
    fn encrypt_u32(
        &self,
        contract: Address,
        user: Address,
        value: u32,
    ) -> Result<EncryptedInput, FheError> {
        let handle = self.encrypt_value(value as u64, HandleWidth::Uint32)?;
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
        let ct_a = self.fetch(a)?;
        let ct_b = self.fetch(b)?;
        let sum = &ct_a + &ct_b;
        Ok(self.mint(a.width, sum.to_bytes()))
    }

    fn trivial_encrypt(&self, value: u64, width: HandleWidth) -> Result<EncryptedHandle, FheError> {
        self.encrypt_value(value, width)
    }

    fn reveal(&self, handle: &EncryptedHandle) -> Result<u64, FheError> {
        let ct = self.fetch(handle)?;
        let pt = self.secret_key.try_decrypt(&ct)?;
        let decoded = Vec::<u64>::try_decode(&pt, Encoding::poly())?;
        Ok(decoded[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn coprocessor() -> BfvCoprocessor {
        let rng = Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(42)));
        BfvCoprocessor::new(rng).unwrap()
    }

    fn addr(byte: u8) -> Address {
        Address::from([byte; 20])
    }

    #[test]
    fn test_encrypt_verify_reveal_roundtrip() {
        let cp = coprocessor();
        let input = cp.encrypt_u32(addr(1), addr(2), 30).unwrap();
        let handle = cp.verify_input(addr(1), addr(2), &input).unwrap();
        assert_eq!(cp.reveal(&handle).unwrap(), 30);
    }

    #[test]
    fn test_proof_is_bound_to_user() {
        let cp = coprocessor();
        let input = cp.encrypt_u32(addr(1), addr(2), 30).unwrap();
        let result = cp.verify_input(addr(1), addr(3), &input);
        assert!(matches!(result, Err(FheError::InvalidProof)));
    }

    #[test]
    fn test_homomorphic_add() {
        let cp = coprocessor();
        let a = cp.encrypt_u32(addr(1), addr(2), 30).unwrap().handle;
        let b = cp.encrypt_u32(addr(1), addr(2), 45).unwrap().handle;
        let sum = cp.add(&a, &b).unwrap();
        assert_eq!(cp.reveal(&sum).unwrap(), 75);
    }

    #[test]
    fn test_add_to_uninitialized_returns_operand() {
        let cp = coprocessor();
        let zero = EncryptedHandle::zero(HandleWidth::Uint32);
        let a = cp.encrypt_u32(addr(1), addr(2), 30).unwrap().handle;
        assert_eq!(cp.add(&zero, &a).unwrap(), a);
        assert_eq!(cp.add(&a, &zero).unwrap(), a);
    }

    #[test]
    fn test_add_width_mismatch() {
        let cp = coprocessor();
        let a = cp.encrypt_u32(addr(1), addr(2), 1).unwrap().handle;
        let b = cp.trivial_encrypt(1, HandleWidth::Uint64).unwrap();
        let result = cp.add(&a, &b);
        assert!(matches!(result, Err(FheError::WidthMismatch(_, _))));
    }

    #[test]
    fn test_reveal_unknown_handle() {
        let cp = coprocessor();
        let handle = EncryptedHandle::new(HandleWidth::Uint32, [7u8; 32]);
        let result = cp.reveal(&handle);
        assert!(matches!(result, Err(FheError::UnknownHandle(_))));
    }

    #[test]
    fn test_randomized_encryption() {
        let cp = coprocessor();
        let a = cp.encrypt_u32(addr(1), addr(2), 30).unwrap().handle;
        let b = cp.encrypt_u32(addr(1), addr(2), 30).unwrap().handle;
        assert_ne!(a, b);
        assert_eq!(cp.reveal(&a).unwrap(), cp.reveal(&b).unwrap());
    }

    #[test]
    fn test_value_out_of_range() {
        let cp = coprocessor();
        let result = cp.trivial_encrypt(u64::MAX, HandleWidth::Uint64);
        assert!(matches!(result, Err(FheError::ValueOutOfRange(_, _))));
    }
}
