// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use est_fhe::FheError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Only raised by the non-renewing decrypt path; the renewing path
    /// answers expiry by re-signing instead.
    #[error("decrypt authorization for {user} on {contract} has expired")]
    AuthorizationExpired { user: Address, contract: Address },

    #[error("no decrypt authorization for {user} on {contract}")]
    NotAuthorized { user: Address, contract: Address },

    #[error(transparent)]
    Fhe(#[from] FheError),
}
