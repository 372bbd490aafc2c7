#![forbid(unsafe_code)]

//! The caller-supplied trust anchor.
//!
//! The verification key always comes from here. `ds:KeyInfo` content in
//! the document is never consulted.

use crate::loader;
use der::{Decode, Encode};
use samlsec_core::Error;
use samlsec_crypto::PublicKey;
use x509_cert::Certificate;

/// A certificate the caller trusts, reduced to what verification needs.
#[derive(Debug, Clone)]
pub struct TrustAnchor {
    key: PublicKey,
    subject: String,
}

impl TrustAnchor {
    /// Load from PEM text or a bare base64 certificate body.
    pub fn from_pem(text: &str) -> Result<Self, Error> {
        let der_bytes = loader::decode_certificate(text)?;
        Self::from_der(&der_bytes)
    }

    /// Load from a DER-encoded X.509 certificate.
    pub fn from_der(data: &[u8]) -> Result<Self, Error> {
        let cert = Certificate::from_der(data)
            .map_err(|e| Error::Certificate(format!("failed to parse X.509 certificate: {e}")))?;

        let spki_der = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| Error::Certificate(format!("failed to encode SPKI: {e}")))?;
        let key = loader::public_key_from_spki_der(&spki_der)?;
        let subject = cert.tbs_certificate.subject.to_string();

        tracing::debug!(subject = %subject, key = key.kind(), "loaded trust anchor");
        Ok(Self { key, subject })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.key
    }

    /// The certificate subject, RFC 4514 style.
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
