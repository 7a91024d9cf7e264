// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub struct StoreKeys;

impl StoreKeys {
    pub fn tracker() -> String {
        String::from("//tracker")
    }

    pub fn schedule() -> String {
        String::from("//schedule")
    }
}
