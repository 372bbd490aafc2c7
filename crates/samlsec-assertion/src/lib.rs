#![forbid(unsafe_code)]

//! SAML2 assertion validation.
//!
//! Decides whether a SAML response carries exactly one assertion that is
//! currently within its validity window and signed by the trusted
//! identity provider. Failures are reported as one [`FailureReason`].

pub mod context;
pub mod error;
pub mod structural;
pub mod temporal;
pub mod verify;

pub use context::VerifierConfig;
pub use error::{FailureReason, ValidationError};
pub use verify::{is_valid, is_valid_at, Verifier};
