// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod clock;
mod repo;
mod schedule;
mod tracker;

pub use clock::*;
pub use repo::*;
pub use schedule::*;
pub use tracker::*;
