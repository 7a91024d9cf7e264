// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{authorization_digest, AuthSigner, ClientError, DecryptAuthorization};
use alloy_primitives::Address;
use est_fhe::{EncryptedHandle, EncryptedInput, FheCoprocessor};
use est_tracker::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// User-side adapter around the co-processor: encrypts inputs before
/// submission and decrypts counter handles under a cached, time-boxed
/// authorization. One instance serves any number of users; authorizations
/// are cached per `(user, contract)`.
pub struct StudyClient {
    coprocessor: Arc<dyn FheCoprocessor>,
    clock: Arc<dyn Clock>,
    contract: Address,
    auth_validity_secs: u64,
    cache: Mutex<HashMap<(Address, Address), DecryptAuthorization>>,
}

impl StudyClient {
    pub fn new(
        coprocessor: Arc<dyn FheCoprocessor>,
        clock: Arc<dyn Clock>,
        contract: Address,
        auth_validity_secs: u64,
    ) -> Self {
        Self {
            coprocessor,
            clock,
            contract,
            auth_validity_secs,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn encrypt_u32(&self, user: Address, value: u32) -> Result<EncryptedInput, ClientError> {
        Ok(self.coprocessor.encrypt_u32(self.contract, user, value)?)
    }

    /// Decrypt a handle for the signing user, prompting for a fresh
    /// authorization when the cached one is missing or stale. The all-zero
    /// handle short-circuits to 0 with no signature and no oracle traffic.
    pub fn user_decrypt(
        &self,
        handle: &EncryptedHandle,
        signer: &dyn AuthSigner,
    ) -> Result<u64, ClientError> {
        if handle.is_uninitialized() {
            return Ok(0);
        }
        self.ensure_authorized(signer)?;
        Ok(self.coprocessor.reveal(handle)?)
    }

    /// Non-renewing variant for callers that manage prompting themselves.
    /// A missing or stale authorization is an error, never a re-sign.
    pub fn try_user_decrypt(
        &self,
        handle: &EncryptedHandle,
        signer: &dyn AuthSigner,
    ) -> Result<u64, ClientError> {
        if handle.is_uninitialized() {
            return Ok(0);
        }

        let user = signer.address();
        let cache = self.cache.lock().unwrap();
        match cache.get(&(user, self.contract)) {
            None => {
                return Err(ClientError::NotAuthorized {
                    user,
                    contract: self.contract,
                })
            }
            Some(auth) if !auth.is_valid_at(self.clock.now_secs()) => {
                return Err(ClientError::AuthorizationExpired {
                    user,
                    contract: self.contract,
                })
            }
            Some(_) => {}
        }
        drop(cache);

        Ok(self.coprocessor.reveal(handle)?)
    }

    /// Reuse the cached authorization while it is inside its validity
    /// window, otherwise prompt the signer for a new one.
    fn ensure_authorized(&self, signer: &dyn AuthSigner) -> Result<(), ClientError> {
        let user = signer.address();
        let now = self.clock.now_secs();
        let mut cache = self.cache.lock().unwrap();

        if let Some(auth) = cache.get(&(user, self.contract)) {
            if auth.is_valid_at(now) {
                return Ok(());
            }
            debug!(user = %user, "Decrypt authorization expired, re-signing");
        }

        let digest = authorization_digest(self.contract, user, now);
        let signature = signer.sign_digest(digest)?;
        cache.insert(
            (user, self.contract),
            DecryptAuthorization {
                user,
                contract: self.contract,
                issued_at: now,
                valid_for_secs: self.auth_validity_secs,
                signature,
            },
        );
        Ok(())
    }
}
