// http://luca.ntop.org/Teaching/Appunti/asn1.html
// https://en.wikipedia.org/wiki/Distinguished_Encoding_Rules#BER_encoding
// ISO/IEC 8825-1:2015 (E)
// https://www.rfc-editor.org/rfc/rfc3279#section-2.2.3 (Ecdsa-Sig-Value)

const TAG_INTEGER: u8 = 0x02;
const TAG_SEQUENCE: u8 = 0x10;

pub type DER = Vec<u8>;

/// Unsigned big-endian integer.
#[derive(Debug, Clone)]
pub struct Integer(pub Vec<u8>);

/// `Ecdsa-Sig-Value ::= SEQUENCE { r INTEGER, s INTEGER }`
#[derive(Debug, Clone)]
pub struct EcdsaSigValue {
    pub r: Integer,
    pub s: Integer,
}

impl EcdsaSigValue {
    /// Split a JWS-style `r‖s` signature into its two scalars.
    ///
    /// Returns `None` when the input cannot be halved into two non-empty
    /// scalars of equal length.
    pub fn from_concatenated(signature: &[u8]) -> Option<Self> {
        if signature.is_empty() || signature.len() % 2 != 0 {
            return None;
        }
        let (r, s) = signature.split_at(signature.len() / 2);
        Some(Self {
            r: Integer(r.to_vec()),
            s: Integer(s.to_vec()),
        })
    }
}

fn trim_bytes(bytes: &[u8]) -> Vec<u8> {
    // Remove leading zeros from an array.
    match bytes.iter().position(|&x| x != 0) {
        Some(n) => bytes[n..].to_vec(),
        None => vec![0],
    }
}

fn encode(tag: u8, constructed: bool, contents: Vec<u8>) -> Vec<u8> {
    let id = tag
        | match constructed {
            true => 0x20,
            false => 0,
        };
    let len = contents.len();
    let len_bytes = trim_bytes(&len.to_be_bytes());
    if len <= 127 {
        return [vec![id, len_bytes[0]], contents].concat();
    }
    // to_be_bytes is at most 8 bytes long, so the long form always fits.
    let len_len = len_bytes.len() as u8;
    [vec![id, 0x80 | len_len], len_bytes, contents].concat()
}

impl From<Integer> for DER {
    fn from(integer: Integer) -> Self {
        // DER integers are two's complement: keep them positive.
        let mut contents = trim_bytes(&integer.0);
        if contents[0] & 0x80 != 0 {
            contents.insert(0, 0);
        }
        encode(TAG_INTEGER, false, contents)
    }
}

impl From<EcdsaSigValue> for DER {
    fn from(sig: EcdsaSigValue) -> Self {
        encode(
            TAG_SEQUENCE,
            true,
            [DER::from(sig.r), DER::from(sig.s)].concat(),
        )
    }
}

/// Convert a concatenated `r‖s` signature into its DER `Ecdsa-Sig-Value`.
pub fn concat_signature_to_der(signature: &[u8]) -> Option<DER> {
    EcdsaSigValue::from_concatenated(signature).map(DER::from)
}
