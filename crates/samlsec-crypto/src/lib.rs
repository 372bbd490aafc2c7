#![forbid(unsafe_code)]

//! Cryptographic primitives for samlsec: reference digests and
//! `ds:SignatureValue` verification against a public key.

pub mod digest;
pub mod sign;

pub use crate::digest::{verify_digest, DigestMethod};
pub use crate::sign::{verify_signature, PublicKey, SignatureMethod};

use base64::Engine;
use samlsec_core::Error;

/// Decode the text content of `ds:DigestValue` / `ds:SignatureValue`.
///
/// XML whitespace (including line wrapping) is ignored.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, Error> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| Error::Base64(e.to_string()))
}
