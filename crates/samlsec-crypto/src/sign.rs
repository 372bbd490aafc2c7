#![forbid(unsafe_code)]

//! Signature verification (RSA PKCS#1 v1.5, RSA-PSS, ECDSA).
//!
//! Only verification is offered: the trust anchor is always a public key.

use samlsec_core::{algorithm, Error};
use signature::Verifier;

/// A public key able to check a `ds:SignatureValue`.
#[derive(Debug, Clone)]
pub enum PublicKey {
    Rsa(rsa::RsaPublicKey),
    EcP256(p256::ecdsa::VerifyingKey),
    EcP384(p384::ecdsa::VerifyingKey),
}

impl PublicKey {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "RSA",
            Self::EcP256(_) => "EC P-256",
            Self::EcP384(_) => "EC P-384",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    #[cfg(feature = "legacy-sha1")]
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

/// A signature algorithm accepted in `ds:SignatureMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    RsaPkcs1v15(HashType),
    RsaPss(HashType),
    Ecdsa(HashType),
}

impl SignatureMethod {
    /// Look up a signature algorithm by URI.
    ///
    /// HMAC is refused: a shared secret cannot be derived from a
    /// certificate.
    pub fn from_uri(uri: &str) -> Result<Self, Error> {
        match uri {
            #[cfg(feature = "legacy-sha1")]
            algorithm::RSA_SHA1 => Ok(Self::RsaPkcs1v15(HashType::Sha1)),
            algorithm::RSA_SHA224 => Ok(Self::RsaPkcs1v15(HashType::Sha224)),
            algorithm::RSA_SHA256 => Ok(Self::RsaPkcs1v15(HashType::Sha256)),
            algorithm::RSA_SHA384 => Ok(Self::RsaPkcs1v15(HashType::Sha384)),
            algorithm::RSA_SHA512 => Ok(Self::RsaPkcs1v15(HashType::Sha512)),

            algorithm::RSA_PSS_SHA256 => Ok(Self::RsaPss(HashType::Sha256)),
            algorithm::RSA_PSS_SHA384 => Ok(Self::RsaPss(HashType::Sha384)),
            algorithm::RSA_PSS_SHA512 => Ok(Self::RsaPss(HashType::Sha512)),

            #[cfg(feature = "legacy-sha1")]
            algorithm::ECDSA_SHA1 => Ok(Self::Ecdsa(HashType::Sha1)),
            algorithm::ECDSA_SHA256 => Ok(Self::Ecdsa(HashType::Sha256)),
            algorithm::ECDSA_SHA384 => Ok(Self::Ecdsa(HashType::Sha384)),

            algorithm::HMAC_SHA1 | algorithm::HMAC_SHA256 => Err(Error::UnsupportedAlgorithm(
                format!("HMAC cannot be checked against a certificate: {uri}"),
            )),
            _ => Err(Error::UnsupportedAlgorithm(format!(
                "signature algorithm: {uri}"
            ))),
        }
    }

    /// Check `signature` over `data` with `key`.
    ///
    /// `Ok(false)` means the signature did not verify. An error means the
    /// check could not be carried out, e.g. the key does not fit the
    /// algorithm.
    pub fn verify(&self, key: &PublicKey, data: &[u8], signature: &[u8]) -> Result<bool, Error> {
        match (self, key) {
            (Self::RsaPkcs1v15(hash), PublicKey::Rsa(pk)) => {
                verify_rsa_pkcs1v15(*hash, pk, data, signature)
            }
            (Self::RsaPss(hash), PublicKey::Rsa(pk)) => verify_rsa_pss(*hash, pk, data, signature),
            (Self::Ecdsa(HashType::Sha256), PublicKey::EcP256(vk)) => {
                let sig = p256::ecdsa::Signature::from_slice(signature)
                    .map_err(|e| Error::Crypto(format!("invalid P-256 signature: {e}")))?;
                Ok(vk.verify(data, &sig).is_ok())
            }
            (Self::Ecdsa(HashType::Sha384), PublicKey::EcP384(vk)) => {
                let sig = p384::ecdsa::Signature::from_slice(signature)
                    .map_err(|e| Error::Crypto(format!("invalid P-384 signature: {e}")))?;
                Ok(vk.verify(data, &sig).is_ok())
            }
            #[cfg(feature = "legacy-sha1")]
            (Self::Ecdsa(HashType::Sha1), PublicKey::EcP256(vk)) => {
                use signature::hazmat::PrehashVerifier;
                let sig = p256::ecdsa::Signature::from_slice(signature)
                    .map_err(|e| Error::Crypto(format!("invalid P-256 signature: {e}")))?;
                let prehash = <sha1::Sha1 as digest::Digest>::digest(data);
                Ok(vk.verify_prehash(&prehash, &sig).is_ok())
            }
            (method, key) => Err(Error::Key(format!(
                "{} key cannot verify {method:?}",
                key.kind()
            ))),
        }
    }
}

fn verify_rsa_pkcs1v15(
    hash: HashType,
    public_key: &rsa::RsaPublicKey,
    data: &[u8],
    sig_bytes: &[u8],
) -> Result<bool, Error> {
    let sig = rsa::pkcs1v15::Signature::try_from(sig_bytes)
        .map_err(|e| Error::Crypto(format!("invalid RSA signature: {e}")))?;
    macro_rules! do_verify {
        ($hasher:ty) => {{
            let vk = rsa::pkcs1v15::VerifyingKey::<$hasher>::new(public_key.clone());
            Ok(vk.verify(data, &sig).is_ok())
        }};
    }
    match hash {
        #[cfg(feature = "legacy-sha1")]
        HashType::Sha1 => do_verify!(sha1::Sha1),
        HashType::Sha224 => do_verify!(sha2::Sha224),
        HashType::Sha256 => do_verify!(sha2::Sha256),
        HashType::Sha384 => do_verify!(sha2::Sha384),
        HashType::Sha512 => do_verify!(sha2::Sha512),
    }
}

fn verify_rsa_pss(
    hash: HashType,
    public_key: &rsa::RsaPublicKey,
    data: &[u8],
    sig_bytes: &[u8],
) -> Result<bool, Error> {
    let sig = rsa::pss::Signature::try_from(sig_bytes)
        .map_err(|e| Error::Crypto(format!("invalid RSA-PSS signature: {e}")))?;
    macro_rules! do_verify {
        ($hasher:ty) => {{
            let vk = rsa::pss::VerifyingKey::<$hasher>::new(public_key.clone());
            Ok(vk.verify(data, &sig).is_ok())
        }};
    }
    match hash {
        HashType::Sha256 => do_verify!(sha2::Sha256),
        HashType::Sha384 => do_verify!(sha2::Sha384),
        HashType::Sha512 => do_verify!(sha2::Sha512),
        other => Err(Error::UnsupportedAlgorithm(format!("RSA-PSS with {other:?}"))),
    }
}

/// Check `signature` over `data` given the `ds:SignatureMethod` URI.
pub fn verify_signature(
    data: &[u8],
    signature: &[u8],
    uri: &str,
    key: &PublicKey,
) -> Result<bool, Error> {
    SignatureMethod::from_uri(uri)?.verify(key, data, signature)
}
