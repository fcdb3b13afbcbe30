//! Orchestration of a single verification run.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::error::Error;
use crate::key_resolver::resolve;
use crate::key_source::KeySource;
#[cfg(feature = "http")]
use crate::key_source::HttpKeySource;
use crate::report::{ReportBuilder, StatusEntry};
use crate::signature;
use crate::trust::{classify, IssuerPolicy, TrustLevel};

/// Issuer of the California Department of Public Health digital vaccine records.
pub const CDPH_ISSUER: &str = "https://myvaxrecord.cdph.ca.gov/creds";

/// Verifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifierOptions {
    /// Issuers whose credentials can be trusted.
    pub trusted_issuers: Vec<String>,
    /// Time allowed for fetching an issuer's key set, in milliseconds.
    pub fetch_timeout_ms: u64,
    /// `User-Agent` sent with key set requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            trusted_issuers: vec![CDPH_ISSUER.to_string()],
            fetch_timeout_ms: 10_000,
            user_agent: None,
        }
    }
}

impl VerifierOptions {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn issuer_policy(&self) -> IssuerPolicy {
        IssuerPolicy::new(&self.trusted_issuers)
    }
}

/// Stages of a verification run.
///
/// `Malformed`, `FetchFailed`, `NoKey` and `Done` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    /// The compact credential could not be decoded; no key was fetched.
    Malformed,
    KeyFetching,
    FetchFailed,
    KeyResolving,
    NoKey,
    Verifying,
    Classifying,
    Done,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Stage::Malformed | Stage::FetchFailed | Stage::NoKey | Stage::Done
        )
    }
}

/// Result of the cryptographic checks of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub signature_valid: bool,
    pub key_matched: bool,
}

/// Final verdict of a run.
#[derive(Debug)]
pub struct Verdict {
    pub level: TrustLevel,
    pub message: &'static str,
    /// Terminal stage the run ended in.
    pub stage: Stage,
    /// Set once the signature has been checked.
    pub outcome: Option<VerificationOutcome>,
    /// Why the run stopped early, if it did.
    pub failure: Option<Error>,
}

impl Verdict {
    fn failed(stage: Stage, failure: Error, issuer_trusted: bool) -> Self {
        log::warn!("Verification stopped at {:?}: {}", stage, failure);
        let (level, message) = classify(false, false, issuer_trusted);
        Self {
            level,
            message,
            stage,
            outcome: None,
            failure: Some(failure),
        }
    }

    pub fn status_entry(&self) -> StatusEntry {
        StatusEntry::new(self.level, self.message)
    }
}

/// Runs fetch, resolve, verify and classify for one credential at a time.
///
/// The verifier only holds configuration; every run works on its own key set
/// and outcome, so concurrent runs never observe each other.
#[derive(Debug, Clone)]
pub struct CredentialVerifier<S> {
    source: S,
    policy: IssuerPolicy,
}

fn transition(from: Stage, to: Stage) -> Stage {
    log::debug!("{:?} -> {:?}", from, to);
    to
}

impl<S: KeySource> CredentialVerifier<S> {
    pub fn new(source: S, policy: IssuerPolicy) -> Self {
        Self { source, policy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn policy(&self) -> &IssuerPolicy {
        &self.policy
    }

    /// Verify a credential. Always terminates with a verdict.
    pub async fn verify(&self, credential: &Credential) -> Verdict {
        let issuer = credential.issuer();
        let issuer_trusted = self.policy.is_trusted(issuer);
        if !issuer_trusted {
            log::warn!("Issuer {} is not trusted", issuer);
        }

        let stage = transition(Stage::Start, Stage::KeyFetching);
        let key_set = match self.source.fetch(issuer).await {
            Ok(key_set) => key_set,
            Err(err) => {
                return Verdict::failed(transition(stage, Stage::FetchFailed), err, issuer_trusted)
            }
        };

        let stage = transition(stage, Stage::KeyResolving);
        let resolved = match resolve(&key_set, credential.kid()) {
            Ok(resolved) => resolved,
            Err(err) => {
                return Verdict::failed(transition(stage, Stage::NoKey), err, issuer_trusted)
            }
        };

        let stage = transition(stage, Stage::Verifying);
        let outcome = VerificationOutcome {
            signature_valid: signature::verify(
                credential.signing_input().as_bytes(),
                credential.signature(),
                resolved.key,
            ),
            key_matched: resolved.matched,
        };

        let stage = transition(stage, Stage::Classifying);
        let (level, message) = classify(outcome.signature_valid, outcome.key_matched, issuer_trusted);
        Verdict {
            level,
            message,
            stage: transition(stage, Stage::Done),
            outcome: Some(outcome),
            failure: None,
        }
    }

    /// Verify a credential and append its verdict to `report`.
    pub async fn verify_into(&self, credential: &Credential, report: &mut ReportBuilder) -> TrustLevel {
        let verdict = self.verify(credential).await;
        report.append(verdict.status_entry());
        verdict.level
    }

    /// Decode a compact credential and verify it.
    ///
    /// A credential that cannot be decoded ends in [`Stage::Malformed`]
    /// without any key being fetched.
    pub async fn verify_encoded(&self, compact: &str, kid: Option<String>, issuer: &str) -> Verdict {
        match Credential::from_compact(compact, kid, issuer) {
            Ok(credential) => self.verify(&credential).await,
            Err(err) => Verdict::failed(
                transition(Stage::Start, Stage::Malformed),
                err,
                self.policy.is_trusted(issuer),
            ),
        }
    }

    /// Decode a compact credential, verify it and append the verdict to `report`.
    ///
    /// A credential that cannot be decoded is reported as untrusted.
    pub async fn verify_compact(
        &self,
        compact: &str,
        kid: Option<String>,
        issuer: &str,
        report: &mut ReportBuilder,
    ) -> TrustLevel {
        let verdict = self.verify_encoded(compact, kid, issuer).await;
        report.append(verdict.status_entry());
        verdict.level
    }
}

#[cfg(feature = "http")]
impl CredentialVerifier<HttpKeySource> {
    /// Verifier fetching key sets over HTTP(S), configured from `options`.
    pub fn http(options: &VerifierOptions) -> Self {
        let mut source = HttpKeySource::new(options.fetch_timeout());
        if let Some(ref user_agent) = options.user_agent {
            source = source.with_user_agent(user_agent.clone());
        }
        Self::new(source, options.issuer_policy())
    }
}
