//! Selection of the verification key for a credential.
use crate::error::Error;
use crate::jwk::JWK;
use crate::key_set::KeySet;

/// Key chosen for verification, and whether it was chosen by `kid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedKey<'a> {
    pub key: &'a JWK,
    pub matched: bool,
}

/// Pick the key identified by `kid`, falling back to the first key of the set.
///
/// The fallback lets verification go ahead against an unconfirmed key so a
/// verdict can still be given; such a key is never reported as `matched`.
pub fn resolve<'a>(key_set: &'a KeySet, kid: Option<&str>) -> Result<ResolvedKey<'a>, Error> {
    if let Some(kid) = kid {
        if let Some(key) = key_set.get(kid) {
            return Ok(ResolvedKey { key, matched: true });
        }
        log::warn!("Key {} not found in issuer key set, using first key", kid);
    }
    match key_set.first() {
        Some(key) => Ok(ResolvedKey {
            key,
            matched: false,
        }),
        None => Err(Error::NoKeyAvailable),
    }
}
