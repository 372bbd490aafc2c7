#![forbid(unsafe_code)]

//! Trust anchor loading for samlsec.
//!
//! Turns a PEM (or bare base64) X.509 certificate into the public key used
//! to check assertion signatures.

pub mod anchor;
pub mod loader;

pub use anchor::TrustAnchor;
