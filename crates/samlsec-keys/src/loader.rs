#![forbid(unsafe_code)]

//! Certificate decoding and public key extraction.

use base64::Engine;
use samlsec_core::Error;
use samlsec_crypto::PublicKey;
use spki::DecodePublicKey;

/// Decode a certificate given as PEM (`-----BEGIN CERTIFICATE-----`) or as
/// the bare base64 body of one. Returns the DER bytes.
pub fn decode_certificate(text: &str) -> Result<Vec<u8>, Error> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::Certificate("empty certificate".into()));
    }

    if trimmed.starts_with("-----BEGIN") {
        let (label, der_bytes) = pem_rfc7468::decode_vec(trimmed.as_bytes())
            .map_err(|e| Error::Certificate(format!("failed to decode certificate PEM: {e}")))?;
        if label != "CERTIFICATE" {
            return Err(Error::Certificate(format!(
                "expected CERTIFICATE PEM label, got: {label}"
            )));
        }
        return Ok(der_bytes);
    }

    let compact: String = trimmed.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| Error::Certificate(format!("certificate is neither PEM nor base64: {e}")))
}

/// Parse a SubjectPublicKeyInfo into a verification key.
///
/// RSA, EC P-256 and EC P-384 keys are recognised.
pub fn public_key_from_spki_der(spki_der: &[u8]) -> Result<PublicKey, Error> {
    if let Ok(pk) = rsa::RsaPublicKey::from_public_key_der(spki_der) {
        return Ok(PublicKey::Rsa(pk));
    }
    if let Ok(vk) = p256::ecdsa::VerifyingKey::from_public_key_der(spki_der) {
        return Ok(PublicKey::EcP256(vk));
    }
    if let Ok(vk) = p384::ecdsa::VerifyingKey::from_public_key_der(spki_der) {
        return Ok(PublicKey::EcP384(vk));
    }
    Err(Error::Key(
        "unsupported public key algorithm in X.509 certificate".into(),
    ))
}
