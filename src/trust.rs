//! Trust classification of a verified credential.
use serde::{Deserialize, Serialize};

pub const MESSAGE_TRUSTED: &str = "Issued by the trusted authority";
pub const MESSAGE_PARTIALLY_TRUSTED: &str =
    "Potentially issued by the trusted authority, key thumbprint mismatch";
pub const MESSAGE_UNTRUSTED: &str = "Not issued by the trusted authority";

/// Tri-state verdict, shown as a green, yellow or red mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrustLevel {
    Untrusted,
    PartiallyTrusted,
    Trusted,
}

impl TrustLevel {
    pub fn mark(&self) -> &'static str {
        match self {
            TrustLevel::Trusted => "green",
            TrustLevel::PartiallyTrusted => "yellow",
            TrustLevel::Untrusted => "red",
        }
    }
}

/// Combine the outcome of a run into a trust level and its explanation.
///
/// Issuer distrust dominates everything else, and a valid signature under a
/// key that was not selected by `kid` is only partially trusted.
pub fn classify(
    signature_valid: bool,
    key_matched: bool,
    issuer_trusted: bool,
) -> (TrustLevel, &'static str) {
    match (issuer_trusted, signature_valid, key_matched) {
        (false, _, _) | (true, false, _) => (TrustLevel::Untrusted, MESSAGE_UNTRUSTED),
        (true, true, false) => (TrustLevel::PartiallyTrusted, MESSAGE_PARTIALLY_TRUSTED),
        (true, true, true) => (TrustLevel::Trusted, MESSAGE_TRUSTED),
    }
}

/// Allowlist of issuers whose credentials may be trusted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IssuerPolicy {
    trusted: Vec<String>,
}

fn normalize(issuer: &str) -> &str {
    issuer.trim().trim_end_matches('/')
}

impl IssuerPolicy {
    pub fn new<I, S>(trusted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            trusted: trusted
                .into_iter()
                .map(|issuer| normalize(issuer.as_ref()).to_string())
                .collect(),
        }
    }

    pub fn is_trusted(&self, issuer: &str) -> bool {
        let issuer = normalize(issuer);
        self.trusted.iter().any(|trusted| trusted == issuer)
    }
}
