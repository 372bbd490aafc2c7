#![forbid(unsafe_code)]

//! SAML2 assertion validation in pure Rust.
//!
//! ```no_run
//! use samlsec::{Verifier, VerifierConfig, XmlDocument};
//!
//! let xml = std::fs::read_to_string("response.xml").unwrap();
//! let cert = std::fs::read_to_string("idp.pem").unwrap();
//! let document = XmlDocument::parse(xml).unwrap();
//!
//! match Verifier::new(VerifierConfig::new()).is_valid(&document, &cert) {
//!     Ok(()) => println!("OK"),
//!     Err(e) => println!("rejected: {}", e.reason()),
//! }
//! ```

pub use samlsec_assertion as assertion;
pub use samlsec_c14n as c14n;
pub use samlsec_core as core;
pub use samlsec_crypto as crypto;
pub use samlsec_keys as keys;
pub use samlsec_transforms as transforms;
pub use samlsec_xml as xml;

pub use samlsec_assertion::{
    is_valid, is_valid_at, FailureReason, ValidationError, Verifier, VerifierConfig,
};
pub use samlsec_xml::XmlDocument;
