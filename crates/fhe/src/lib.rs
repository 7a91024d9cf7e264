// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod bfv;
mod coprocessor;
mod error;
mod handle;
mod mock;
mod proof;

pub use bfv::*;
pub use coprocessor::*;
pub use error::*;
pub use handle::*;
pub use mock::*;

pub use rand_chacha::ChaCha20Rng;
use std::sync::{Arc, Mutex};

pub type SharedRng = Arc<Mutex<ChaCha20Rng>>;

/// Predefined BFV parameter sets.
/// Naming convention: SET_<degree>_<plaintext_modulus>_<moduli_count>
pub mod params {
    pub const SET_2048_1032193_1: (usize, u64, [u64; 1]) = (
        2048,               // degree
        1032193,            // plaintext_modulus
        [0x3FFFFFFF000001], // moduli
    );
}
