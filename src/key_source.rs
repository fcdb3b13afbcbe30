//! Retrieval of issuer key sets.
use std::collections::HashMap;

use crate::error::Error;
use crate::key_set::KeySet;

#[cfg(feature = "http")]
pub use self::http::HttpKeySource;

/// Well-known location of an issuer's JWK set, relative to the issuer URL.
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Any type that can fetch the key set published by an issuer.
///
/// Each call is an independent fetch: implementations must not cache, so that
/// a revoked key stops verifying as soon as the issuer withdraws it.
pub trait KeySource {
    #[allow(async_fn_in_trait)]
    async fn fetch(&self, issuer: &str) -> Result<KeySet, Error>;
}

impl<'a, T: KeySource> KeySource for &'a T {
    async fn fetch(&self, issuer: &str) -> Result<KeySet, Error> {
        T::fetch(*self, issuer).await
    }
}

/// URL of the JWK set document of `issuer`.
pub fn jwks_url(issuer: &str) -> String {
    format!("{}{}", issuer.trim_end_matches('/'), JWKS_PATH)
}

/// A simple static key source, for tests and offline verification.
#[derive(Debug, Default, Clone)]
pub struct StaticKeySource {
    map: HashMap<String, KeySet>,
}

impl StaticKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn insert(&mut self, issuer: &str, keys: KeySet) -> Option<KeySet> {
        self.map
            .insert(issuer.trim_end_matches('/').to_string(), keys)
    }
}

impl KeySource for StaticKeySource {
    async fn fetch(&self, issuer: &str) -> Result<KeySet, Error> {
        match self.map.get(issuer.trim_end_matches('/')) {
            Some(keys) => Ok(keys.clone()),
            None => Err(Error::unreachable(&jwks_url(issuer), "unknown issuer")),
        }
    }
}

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use reqwest::header;

    use super::{jwks_url, KeySource};
    use crate::error::Error;
    use crate::key_set::KeySet;

    pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    /// Fetches `<issuer>/.well-known/jwks.json` over HTTP(S).
    #[derive(Debug, Clone)]
    pub struct HttpKeySource {
        timeout: Duration,
        user_agent: String,
    }

    impl HttpKeySource {
        /// Construct a key source whose fetches give up after `timeout`.
        pub fn new(timeout: Duration) -> Self {
            Self {
                timeout,
                user_agent: USER_AGENT.to_string(),
            }
        }

        pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
            self.user_agent = user_agent.into();
            self
        }

        pub fn timeout(&self) -> Duration {
            self.timeout
        }
    }

    impl KeySource for HttpKeySource {
        async fn fetch(&self, issuer: &str) -> Result<KeySet, Error> {
            let url = jwks_url(issuer);

            let client = reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|err| {
                    Error::unreachable(&url, format!("Error building HTTP client: {err}"))
                })?;

            log::debug!("Fetching key set from {}", url);
            let resp = client
                .get(&url)
                .header(header::USER_AGENT, &self.user_agent)
                .header(header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(|err| {
                    if err.is_timeout() {
                        Error::unreachable(&url, format!("timed out after {:?}", self.timeout))
                    } else {
                        Error::unreachable(&url, format!("Error sending HTTP request: {err}"))
                    }
                })?;
            if let Err(err) = resp.error_for_status_ref() {
                return Err(Error::unreachable(&url, err));
            }
            let body = resp.bytes().await.map_err(|err| {
                Error::unreachable(&url, format!("Error reading HTTP response: {err}"))
            })?;
            KeySet::from_json(&body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_url() {
        assert_eq!(
            jwks_url("https://myvaxrecord.cdph.ca.gov/creds"),
            "https://myvaxrecord.cdph.ca.gov/creds/.well-known/jwks.json"
        );
        assert_eq!(
            jwks_url("https://spec.smarthealth.cards/examples/issuer/"),
            "https://spec.smarthealth.cards/examples/issuer/.well-known/jwks.json"
        );
    }

    #[tokio::test]
    async fn static_source() {
        let mut source = StaticKeySource::new();
        assert!(source.is_empty());
        source.insert("https://issuer.example/", KeySet::new());
        assert_eq!(source.len(), 1);
        assert!(source.fetch("https://issuer.example").await.unwrap().is_empty());
        match source.fetch("https://other.example").await {
            Err(Error::UnreachableIssuer { url, .. }) => {
                assert_eq!(url, "https://other.example/.well-known/jwks.json")
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
