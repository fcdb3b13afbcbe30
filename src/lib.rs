//! Trust verification of signed health credentials.
//!
//! A [SMART Health Card][shc] carries a compact [JSON Web Signature][jws]
//! signed with ES256 by its issuer. Once an external decoder has extracted
//! that compact structure from the scanned image, this crate:
//!
//! 1. fetches the issuer's [JWK set][jwks] from
//!    `<issuer>/.well-known/jwks.json` ([`key_source`]);
//! 2. selects the verification key by `kid`, falling back to the first
//!    published key ([`key_resolver`]);
//! 3. verifies the ECDSA P-256 signature over the exact signing input
//!    ([`signature`]);
//! 4. combines signature validity, key match and issuer trust into a
//!    green/yellow/red [`TrustLevel`] ([`trust`]);
//! 5. records the verdict in an ordered [`VerificationReport`] ([`report`]).
//!
//! [shc]: <https://spec.smarthealth.cards/>
//! [jws]: <https://www.rfc-editor.org/rfc/rfc7515>
//! [jwks]: <https://www.rfc-editor.org/rfc/rfc7517#section-5>
//!
//! # Usage
//!
//! ```no_run
//! use shc_verify::{CredentialVerifier, ReportBuilder, VerifierOptions, display};
//!
//! # #[cfg(feature = "http")]
//! # async fn run(compact: &str) {
//! let verifier = CredentialVerifier::http(&VerifierOptions::default());
//! let mut report = ReportBuilder::new();
//! verifier
//!     .verify_compact(compact, None, "https://myvaxrecord.cdph.ca.gov/creds", &mut report)
//!     .await;
//! let data = display::render(&report.build());
//! println!("{}", data.status[0].text);
//! # }
//! ```
//!
//! # Features
//!
//! - `http` (default): [`key_source::HttpKeySource`], fetching key sets
//!   with `reqwest`.

pub mod credential;
pub mod der;
pub mod display;
pub mod error;
pub mod immunization;
pub mod jwk;
pub mod key_resolver;
pub mod key_set;
pub mod key_source;
pub mod record;
pub mod report;
pub mod signature;
pub mod trust;
pub mod verifier;

pub use credential::Credential;
pub use error::Error;
pub use jwk::JWK;
pub use key_set::KeySet;
pub use key_source::{KeySource, StaticKeySource};
pub use record::{HealthRecord, Patient};
pub use report::{ReportBuilder, StatusEntry, VerificationReport};
pub use trust::{classify, IssuerPolicy, TrustLevel};
pub use verifier::{CredentialVerifier, Stage, Verdict, VerificationOutcome, VerifierOptions};

#[cfg(feature = "http")]
pub use key_source::HttpKeySource;
