// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

/// Conversion into the raw byte keys the stores index by. Scopes and
/// store keys arrive as strings or pre-built byte vectors.
pub trait IntoKey {
    fn into_key(self) -> Vec<u8>;
}

impl IntoKey for Vec<u8> {
    fn into_key(self) -> Vec<u8> {
        self
    }
}

impl IntoKey for &Vec<u8> {
    fn into_key(self) -> Vec<u8> {
        self.clone()
    }
}

impl IntoKey for String {
    fn into_key(self) -> Vec<u8> {
        self.into_bytes()
    }
}

impl IntoKey for &String {
    fn into_key(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl<'a> IntoKey for &'a str {
    fn into_key(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}
