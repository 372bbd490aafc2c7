#![forbid(unsafe_code)]

//! Minimal same-document reference syntax for XML-DSig.
//!
//! Only the forms SAML signers emit are understood:
//! - `#id-value`
//! - `#xpointer(id('id-value'))`
//! - `""` (the whole document), handled by the caller

/// Parse a same-document reference (e.g., `#foo` → `foo`).
///
/// The XPointer form is unwrapped too, so `#xpointer(id('foo'))`
/// also yields `foo`.
pub fn parse_same_document_ref(uri: &str) -> Option<&str> {
    let fragment = uri.strip_prefix('#')?;
    if fragment.starts_with("xpointer(") {
        return parse_xpointer_id(fragment);
    }
    if fragment.is_empty() {
        return None;
    }
    Some(fragment)
}

/// Parse an `xpointer(id('...'))` expression and return the ID value.
pub fn parse_xpointer_id(expr: &str) -> Option<&str> {
    let inner = expr
        .strip_prefix("xpointer(id('")
        .and_then(|s| s.strip_suffix("'))"))
        .or_else(|| {
            expr.strip_prefix("xpointer(id(\"")
                .and_then(|s| s.strip_suffix("\"))"))
        })?;
    (!inner.is_empty()).then_some(inner)
}
