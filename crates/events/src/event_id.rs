// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    fmt,
    hash::{DefaultHasher, Hash, Hasher},
};

/// Tag mixed into every id so tracker event ids can never collide with
/// hashes of the same payload computed elsewhere.
const EVENT_ID_DOMAIN: &[u8] = b"est:event:v1";

/// Content-derived identifier for bus events. Equal payloads map to equal
/// ids, which is what duplicate suppression keys on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub [u8; 32]);

impl EventId {
    pub fn hash<T: Hash>(value: T) -> Self {
        let mut content_hasher = DefaultHasher::new();
        value.hash(&mut content_hasher);

        let mut hasher = Sha256::new();
        hasher.update(EVENT_ID_DOMAIN);
        hasher.update(content_hasher.finish().to_le_bytes());
        EventId(hasher.finalize().into())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = bs58::encode(&self.0).into_string();
        write!(f, "evt:{}", &encoded[0..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_content() {
        assert_eq!(EventId::hash(42u64), EventId::hash(42u64));
        assert_ne!(EventId::hash(42u64), EventId::hash(43u64));
    }

    #[test]
    fn test_display_is_a_short_tag() {
        let shown = format!("{}", EventId::hash("study"));
        assert!(shown.starts_with("evt:"));
        assert_eq!(shown.len(), "evt:".len() + 8);
    }
}
