// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod authorization;
mod client;
mod error;
mod signer;

pub use authorization::*;
pub use client::*;
pub use error::*;
pub use signer::*;
