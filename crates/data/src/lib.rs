// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod data_store;
mod events;
mod in_mem;
mod into_key;
mod persistable;
mod repositories;
mod repository;
mod sled_store;
mod snapshot;

pub use data_store::*;
pub use events::*;
pub use in_mem::*;
pub use into_key::IntoKey;
pub use persistable::*;
pub use repositories::*;
pub use repository::*;
pub use sled_store::*;
pub use snapshot::*;
