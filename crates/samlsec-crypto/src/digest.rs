#![forbid(unsafe_code)]

//! Digest algorithms for `ds:Reference` verification.

use samlsec_core::{algorithm, Error};
use subtle::ConstantTimeEq;

/// A digest algorithm accepted in `ds:DigestMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestMethod {
    #[cfg(feature = "legacy-sha1")]
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl DigestMethod {
    /// Look up a digest algorithm by URI. Unknown and weak algorithms are
    /// refused.
    pub fn from_uri(uri: &str) -> Result<Self, Error> {
        match uri {
            #[cfg(feature = "legacy-sha1")]
            algorithm::SHA1 => Ok(Self::Sha1),
            algorithm::SHA224 => Ok(Self::Sha224),
            algorithm::SHA256 => Ok(Self::Sha256),
            algorithm::SHA384 => Ok(Self::Sha384),
            algorithm::SHA512 => Ok(Self::Sha512),
            algorithm::SHA3_256 => Ok(Self::Sha3_256),
            algorithm::SHA3_384 => Ok(Self::Sha3_384),
            algorithm::SHA3_512 => Ok(Self::Sha3_512),
            #[cfg(not(feature = "legacy-sha1"))]
            algorithm::SHA1 => Err(Error::UnsupportedAlgorithm(format!(
                "weak digest algorithm refused: {uri}"
            ))),
            algorithm::MD5 => Err(Error::UnsupportedAlgorithm(format!(
                "weak digest algorithm refused: {uri}"
            ))),
            _ => Err(Error::UnsupportedAlgorithm(format!(
                "digest algorithm: {uri}"
            ))),
        }
    }

    pub fn uri(&self) -> &'static str {
        match self {
            #[cfg(feature = "legacy-sha1")]
            Self::Sha1 => algorithm::SHA1,
            Self::Sha224 => algorithm::SHA224,
            Self::Sha256 => algorithm::SHA256,
            Self::Sha384 => algorithm::SHA384,
            Self::Sha512 => algorithm::SHA512,
            Self::Sha3_256 => algorithm::SHA3_256,
            Self::Sha3_384 => algorithm::SHA3_384,
            Self::Sha3_512 => algorithm::SHA3_512,
        }
    }

    /// Hash `data` in one shot.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            #[cfg(feature = "legacy-sha1")]
            Self::Sha1 => hash::<sha1::Sha1>(data),
            Self::Sha224 => hash::<sha2::Sha224>(data),
            Self::Sha256 => hash::<sha2::Sha256>(data),
            Self::Sha384 => hash::<sha2::Sha384>(data),
            Self::Sha512 => hash::<sha2::Sha512>(data),
            Self::Sha3_256 => hash::<sha3::Sha3_256>(data),
            Self::Sha3_384 => hash::<sha3::Sha3_384>(data),
            Self::Sha3_512 => hash::<sha3::Sha3_512>(data),
        }
    }
}

fn hash<D: digest::Digest>(data: &[u8]) -> Vec<u8> {
    D::digest(data).to_vec()
}

/// Compute a digest given the algorithm URI.
pub fn digest(uri: &str, data: &[u8]) -> Result<Vec<u8>, Error> {
    Ok(DigestMethod::from_uri(uri)?.digest(data))
}

/// Hash `data` and compare against `expected` in constant time.
pub fn verify_digest(data: &[u8], method: DigestMethod, expected: &[u8]) -> bool {
    let computed = method.digest(data);
    computed.as_slice().ct_eq(expected).into()
}
