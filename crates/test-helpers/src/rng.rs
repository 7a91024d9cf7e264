// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use est_fhe::{ChaCha20Rng, SharedRng};
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

pub fn create_shared_rng_from_u64(seed: u64) -> SharedRng {
    Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed)))
}

pub fn create_random_identities(rng: &SharedRng, amount: usize) -> Vec<Address> {
    let mut rng = rng.lock().unwrap();
    (0..amount)
        .map(|_| Address::from(rng.gen::<[u8; 20]>()))
        .collect()
}
