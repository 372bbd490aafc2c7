#![forbid(unsafe_code)]

//! XML document abstraction for samlsec.
//!
//! Provides an owned document over `roxmltree`, an ID index that refuses
//! ambiguous identifiers, and the `NodeSet` type needed for
//! canonicalization and signature transforms.

pub mod document;
pub mod nodeset;
pub mod xpath;

pub use document::{IdIndex, XmlDocument};
pub use nodeset::NodeSet;

/// Return the roxmltree parsing options used for untrusted input.
///
/// DTDs are refused outright, so no entity is ever expanded.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: false,
        ..roxmltree::ParsingOptions::default()
    }
}

/// Parse XML text with [`parsing_options`].
pub fn parse(text: &str) -> Result<roxmltree::Document<'_>, samlsec_core::Error> {
    roxmltree::Document::parse_with_options(text, parsing_options())
        .map_err(|e| samlsec_core::Error::XmlParse(e.to_string()))
}
