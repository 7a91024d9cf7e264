// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{EncryptedHandle, EncryptedInput, FheError, InputProof};
use alloy_primitives::Address;
use sha2::{Digest, Sha256};

/// Binds a freshly-minted handle to the `(contract, user)` pair it was
/// produced for. The real attestation scheme is a platform service; this
/// digest stands in for it with the same all-or-nothing contract.
pub(crate) fn bind_input(
    handle: &EncryptedHandle,
    contract: Address,
    user: Address,
) -> InputProof {
    let mut hasher = Sha256::new();
    hasher.update(b"est.input.v1");
    hasher.update(handle.bytes);
    hasher.update(contract.as_slice());
    hasher.update(user.as_slice());
    InputProof(hasher.finalize().to_vec())
}

pub(crate) fn check_input(
    input: &EncryptedInput,
    contract: Address,
    user: Address,
) -> Result<EncryptedHandle, FheError> {
    if bind_input(&input.handle, contract, user) != input.proof {
        return Err(FheError::InvalidProof);
    }
    Ok(input.handle)
}
