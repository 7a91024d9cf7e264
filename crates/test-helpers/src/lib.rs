// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod rng;
mod sim_clock;
mod system;

pub use rng::*;
pub use sim_clock::*;
pub use system::*;
