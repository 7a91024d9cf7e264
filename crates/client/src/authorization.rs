// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::{keccak256, Address, B256};

const DOMAIN_TAG: &[u8] = b"est.decrypt.v1";

/// Typed-data digest a user signs to authorize decryption of their own
/// counters on one contract. Domain-separated so a signature for one
/// contract cannot be replayed against another.
pub fn authorization_digest(contract: Address, user: Address, issued_at: u64) -> B256 {
    let domain = keccak256([DOMAIN_TAG, contract.as_slice()].concat());
    let mut preimage = Vec::with_capacity(32 + 20 + 8);
    preimage.extend_from_slice(domain.as_slice());
    preimage.extend_from_slice(user.as_slice());
    preimage.extend_from_slice(&issued_at.to_be_bytes());
    keccak256(preimage)
}

/// A signed, time-boxed grant to decrypt. Valid from `issued_at` for
/// `valid_for_secs`; reusable any number of times within that window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptAuthorization {
    pub user: Address,
    pub contract: Address,
    pub issued_at: u64,
    pub valid_for_secs: u64,
    pub signature: Vec<u8>,
}

impl DecryptAuthorization {
    pub fn is_valid_at(&self, now_secs: u64) -> bool {
        now_secs < self.issued_at.saturating_add(self.valid_for_secs)
    }

    pub fn digest(&self) -> B256 {
        authorization_digest(self.contract, self.user, self.issued_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_domain_separated() {
        let user = Address::repeat_byte(0x01);
        let a = authorization_digest(Address::repeat_byte(0xaa), user, 100);
        let b = authorization_digest(Address::repeat_byte(0xbb), user, 100);
        assert_ne!(a, b);
    }

    #[test]
    fn test_validity_window_is_half_open() {
        let auth = DecryptAuthorization {
            user: Address::repeat_byte(0x01),
            contract: Address::repeat_byte(0xaa),
            issued_at: 1000,
            valid_for_secs: 600,
            signature: vec![],
        };
        assert!(auth.is_valid_at(1000));
        assert!(auth.is_valid_at(1599));
        assert!(!auth.is_valid_at(1600));
    }
}
