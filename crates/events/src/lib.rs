// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod correlation_id;
mod counter_kind;
mod event_id;
mod eventbus;
mod tracker_event;
mod traits;

pub use correlation_id::*;
pub use counter_kind::*;
pub use event_id::*;
pub use eventbus::*;
pub use tracker_event::*;
pub use traits::*;

/// An externally verified actor reference. Identities are never created or
/// destroyed by this system; they arrive as the sender of a call.
pub type Identity = alloy_primitives::Address;
