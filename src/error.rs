//! Error types for `shc-verify`
use serde_json::Error as SerdeJSONError;
use thiserror::Error;

/// Error raised by a stage of the verification pipeline.
///
/// None of these reach the user directly: the orchestrating
/// [`CredentialVerifier`](crate::verifier::CredentialVerifier) turns each of
/// them into an untrusted status entry.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The issuer's key set could not be retrieved
    #[error("Unable to reach issuer ({url}): {reason}")]
    UnreachableIssuer { url: String, reason: String },
    /// The key set document is not a JWK set with at least one key
    #[error("Malformed key set: {0}")]
    MalformedKeySet(String),
    /// The key set holds no key to verify with
    #[error("No key available for verification")]
    NoKeyAvailable,
    /// The compact credential cannot be decoded into a verifiable form
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),
    /// Missing curve in JWK
    #[error("Missing curve in JWK")]
    MissingCurve,
    /// Missing elliptic curve point in JWK
    #[error("Missing elliptic curve point in JWK")]
    MissingPoint,
    /// Curve not implemented
    #[error("Curve not implemented: '{0}'")]
    CurveNotImplemented(String),
    /// Key type is not supported
    #[error("Key type not supported")]
    UnsupportedKeyType,
    /// Error parsing or serializing JSON
    #[error(transparent)]
    SerdeJSON(#[from] SerdeJSONError),
    /// Error from the elliptic curve implementation
    #[error(transparent)]
    EllipticCurve(#[from] p256::elliptic_curve::Error),
}

impl Error {
    pub(crate) fn unreachable(url: &str, reason: impl ToString) -> Self {
        Error::UnreachableIssuer {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
