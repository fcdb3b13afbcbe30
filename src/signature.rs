//! ES256 signature verification.
use std::convert::TryFrom;

use p256::ecdsa::signature::Verifier;

use crate::der::concat_signature_to_der;
use crate::jwk::JWK;

/// Verify a JWS `r‖s` signature over `signing_input` with a P-256 key.
///
/// The signature is re-encoded as DER before being handed to the ECDSA
/// primitive, which hashes the input with SHA-256. Malformed signatures and
/// keys that are not P-256 public keys verify as `false`.
pub fn verify(signing_input: &[u8], signature: &[u8], key: &JWK) -> bool {
    let public_key = match p256::PublicKey::try_from(key) {
        Ok(pk) => pk,
        Err(err) => {
            log::debug!("Unusable verification key: {}", err);
            return false;
        }
    };
    // P-256 scalars are 32 bytes each.
    if signature.len() != 64 {
        log::debug!("Unexpected signature length: {}", signature.len());
        return false;
    }
    let der = match concat_signature_to_der(signature) {
        Some(der) => der,
        None => return false,
    };
    let sig = match p256::ecdsa::Signature::from_der(&der) {
        Ok(sig) => sig,
        Err(_) => {
            log::debug!("Signature is not a valid ECDSA value");
            return false;
        }
    };
    let verifying_key = p256::ecdsa::VerifyingKey::from(public_key);
    verifying_key.verify(signing_input, &sig).is_ok()
}
