use std::collections::HashMap;

use serde::Deserialize;

use crate::error::Error;
use crate::jwk::{JwkSet, JWK};

/// Keys published by one issuer, in their declared order.
///
/// Keys carrying a `kid` are indexed by it; the last key wins when several
/// share an identifier. Keys without a `kid` stay in the list but cannot be
/// looked up by identifier.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<JWK>,
    index: HashMap<String, usize>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an issuer's JWK set document.
    ///
    /// The document must be a JSON object with a non-empty `keys` array.
    /// Entries that are not usable JWKs (unknown `kty`, bad encoding) are
    /// skipped, as RFC 7517 section 5 asks; at least one must remain.
    pub fn from_json(data: &[u8]) -> Result<Self, Error> {
        let document: KeySetDocument =
            serde_json::from_slice(data).map_err(|e| Error::MalformedKeySet(e.to_string()))?;
        if document.keys.is_empty() {
            return Err(Error::MalformedKeySet("empty keys array".to_string()));
        }
        let mut set = KeySet::new();
        for (i, value) in document.keys.into_iter().enumerate() {
            match serde_json::from_value::<JWK>(value) {
                Ok(key) => set.push(key),
                Err(err) => log::debug!("Skipping key {} of key set: {}", i, err),
            }
        }
        if set.is_empty() {
            return Err(Error::MalformedKeySet("no usable key".to_string()));
        }
        Ok(set)
    }

    pub fn push(&mut self, key: JWK) {
        if let Some(kid) = key.key_id() {
            self.index.insert(kid.to_string(), self.keys.len());
        }
        self.keys.push(key);
    }

    pub fn get(&self, kid: &str) -> Option<&JWK> {
        self.index.get(kid).map(|&i| &self.keys[i])
    }

    /// First key in declared order.
    pub fn first(&self) -> Option<&JWK> {
        self.keys.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JWK> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Key set document with its entries left undecoded.
#[derive(Deserialize)]
struct KeySetDocument {
    keys: Vec<serde_json::Value>,
}

impl From<JwkSet> for KeySet {
    fn from(set: JwkSet) -> Self {
        set.keys.into_iter().collect()
    }
}

impl FromIterator<JWK> for KeySet {
    fn from_iter<T: IntoIterator<Item = JWK>>(iter: T) -> Self {
        let mut set = KeySet::new();
        for key in iter {
            set.push(key);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kid: Option<&str>, x: &str) -> serde_json::Value {
        let mut value = serde_json::json!({
            "kty": "EC",
            "crv": "P-256",
            "x": x,
            "y": "e8lnCO-AlStT-NJVX-crhB7QRYhiix03illJOVAOyck"
        });
        if let Some(kid) = kid {
            value["kid"] = kid.into();
        }
        value
    }

    #[test]
    fn parse_and_index() {
        let doc = serde_json::json!({
            "keys": [key(None, "AA"), key(Some("a"), "AQ"), key(Some("a"), "Ag"), key(Some("b"), "Aw")]
        });
        let set = KeySet::from_json(doc.to_string().as_bytes()).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.first().unwrap().key_id(), None);
        // Duplicate identifiers resolve to the last declared key.
        assert_eq!(set.get("a"), set.iter().nth(2));
        assert_eq!(set.get("b"), set.iter().nth(3));
        assert!(set.get("c").is_none());
    }

    #[test]
    fn unknown_key_type_is_skipped() {
        let doc = serde_json::json!({
            "keys": [
                { "kty": "AKP", "kid": "future", "alg": "ML-DSA-44", "pub": "AAAA" },
                key(Some("key-1"), "AQ")
            ]
        });
        let set = KeySet::from_json(doc.to_string().as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("future").is_none());
        assert_eq!(set.get("key-1").unwrap().key_id(), Some("key-1"));
    }

    #[test]
    fn badly_encoded_key_is_skipped() {
        let doc = serde_json::json!({
            "keys": [key(Some("broken"), "!!"), key(Some("key-1"), "AQ")]
        });
        let set = KeySet::from_json(doc.to_string().as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("broken").is_none());
        assert!(set.get("key-1").is_some());
    }

    #[test]
    fn no_usable_key_rejected() {
        let doc = serde_json::json!({
            "keys": [{ "kty": "AKP", "kid": "future" }, key(None, "!!")]
        });
        assert!(matches!(
            KeySet::from_json(doc.to_string().as_bytes()),
            Err(Error::MalformedKeySet(_))
        ));
    }

    #[test]
    fn missing_or_empty_keys_rejected() {
        for doc in [r#"{"keys": []}"#, r#"{}"#, r#"{"keys": {}}"#, "not json", "[]"] {
            match KeySet::from_json(doc.as_bytes()) {
                Err(Error::MalformedKeySet(_)) => {}
                other => panic!("{}: unexpected {:?}", doc, other),
            }
        }
    }
}
