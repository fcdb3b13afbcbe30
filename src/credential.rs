//! Decoded compact credential.
use serde::Deserialize;

use crate::error::Error;

/// Algorithm negotiated by the credential header.
pub const ALGORITHM: &str = "ES256";

/// JOSE header of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Header {
    #[serde(rename = "alg")]
    pub algorithm: String,
    #[serde(rename = "kid")]
    pub key_id: Option<String>,
    /// Payload compression, `DEF` for SMART Health Cards.
    #[serde(rename = "zip")]
    pub compression: Option<String>,
}

/// A signed credential as handed over by the decoder.
///
/// The signing input is kept exactly as it appeared in the compact
/// serialization; it is never rebuilt from the decoded segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    header: Vec<u8>,
    payload: Vec<u8>,
    signature: Vec<u8>,
    kid: Option<String>,
    issuer: String,
    signing_input: String,
}

/// Split a compact JWS into its header, payload and signature segments.
pub fn split_jws(jws: &str) -> Result<(&str, &str, &str), Error> {
    let mut parts = jws.splitn(3, '.');
    let header = parts.next();
    let payload = parts.next();
    let signature = parts.next();
    match (header, payload, signature) {
        (Some(h), Some(p), Some(s)) if !s.contains('.') => Ok((h, p, s)),
        _ => Err(Error::MalformedCredential(
            "expected three dot-separated segments".to_string(),
        )),
    }
}

fn decode_segment(name: &str, segment: &str) -> Result<Vec<u8>, Error> {
    if segment.is_empty() {
        return Err(Error::MalformedCredential(format!("empty {}", name)));
    }
    base64::decode_config(segment, base64::URL_SAFE_NO_PAD)
        .map_err(|e| Error::MalformedCredential(format!("{}: {}", name, e)))
}

impl Credential {
    /// Decode a compact credential.
    ///
    /// `kid` is the key identifier reported by the decoder; when it is absent
    /// the identifier from the header is used instead.
    pub fn from_compact(
        compact: &str,
        kid: Option<String>,
        issuer: impl Into<String>,
    ) -> Result<Self, Error> {
        let compact = compact.trim();
        let (header_b64, payload_b64, signature_b64) = split_jws(compact)?;
        let header = decode_segment("header", header_b64)?;
        let payload = decode_segment("payload", payload_b64)?;
        let signature = decode_segment("signature", signature_b64)?;
        let parsed: Header = serde_json::from_slice(&header)
            .map_err(|e| Error::MalformedCredential(format!("header: {}", e)))?;
        if parsed.algorithm != ALGORITHM {
            return Err(Error::MalformedCredential(format!(
                "unsupported algorithm {}",
                parsed.algorithm
            )));
        }
        let signing_input_len = header_b64.len() + 1 + payload_b64.len();
        Ok(Self {
            header,
            payload,
            signature,
            kid: kid.or(parsed.key_id),
            issuer: issuer.into(),
            signing_input: compact[..signing_input_len].to_string(),
        })
    }

    /// Decoded header bytes.
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    /// Decoded payload bytes (possibly compressed, see [`Header::compression`]).
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Raw `r‖s` signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// `<header>.<payload>`, byte for byte as received.
    pub fn signing_input(&self) -> &str {
        &self.signing_input
    }

    pub fn parsed_header(&self) -> Result<Header, Error> {
        Ok(serde_json::from_slice(&self.header)?)
    }
}
