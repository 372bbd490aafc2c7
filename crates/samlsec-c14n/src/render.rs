#![forbid(unsafe_code)]

//! Namespace declarations and attributes as rendered in a start tag,
//! with the orderings canonical XML mandates.

use crate::escape;
use std::cmp::Ordering;

/// A namespace declaration to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDecl {
    /// The prefix ("" for default namespace).
    pub prefix: String,
    /// The namespace URI ("" undeclares the default namespace).
    pub uri: String,
}

impl NsDecl {
    pub fn write_to(&self, out: &mut Vec<u8>) {
        if self.prefix.is_empty() {
            out.extend_from_slice(b" xmlns=\"");
        } else {
            out.extend_from_slice(b" xmlns:");
            out.extend_from_slice(self.prefix.as_bytes());
            out.extend_from_slice(b"=\"");
        }
        escape::write_attr(out, &self.uri);
        out.push(b'"');
    }
}

// Default namespace first, then by prefix.
impl Ord for NsDecl {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.prefix.is_empty(), other.prefix.is_empty()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => self.prefix.cmp(&other.prefix),
        }
    }
}

impl PartialOrd for NsDecl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An attribute to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// The namespace URI of the attribute ("" for no namespace).
    pub ns_uri: String,
    pub local_name: String,
    /// `prefix:local` or just `local`.
    pub qualified_name: String,
    pub value: String,
}

impl Attr {
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(b' ');
        out.extend_from_slice(self.qualified_name.as_bytes());
        out.extend_from_slice(b"=\"");
        escape::write_attr(out, &self.value);
        out.push(b'"');
    }
}

// Unqualified attributes first (by local name), then by
// (namespace URI, local name).
impl Ord for Attr {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.ns_uri.is_empty(), other.ns_uri.is_empty()) {
            (true, true) => self.local_name.cmp(&other.local_name),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .ns_uri
                .cmp(&other.ns_uri)
                .then(self.local_name.cmp(&other.local_name)),
        }
    }
}

impl PartialOrd for Attr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Collect an element's attributes in canonical order.
pub(crate) fn sorted_attributes(node: roxmltree::Node<'_, '_>) -> Vec<Attr> {
    let mut attrs: Vec<Attr> = node
        .attributes()
        .map(|attr| {
            let qualified_name = match samlsec_xml::document::attribute_prefix(node, &attr) {
                Some(prefix) => format!("{prefix}:{}", attr.name()),
                None => attr.name().to_owned(),
            };
            Attr {
                ns_uri: attr.namespace().unwrap_or("").to_owned(),
                local_name: attr.name().to_owned(),
                qualified_name,
                value: attr.value().to_owned(),
            }
        })
        .collect();
    attrs.sort();
    attrs
}

/// The element name as written: `prefix:local` or `local`.
pub(crate) fn qualified_element_name(node: roxmltree::Node<'_, '_>) -> String {
    match samlsec_xml::document::element_prefix(node) {
        Some(prefix) => format!("{prefix}:{}", node.tag_name().name()),
        None => node.tag_name().name().to_owned(),
    }
}

/// Write a comment or PI that sits at document level, with the line
/// breaks canonical XML puts between it and the document element.
pub(crate) fn write_top_level(
    node: roxmltree::Node<'_, '_>,
    out: &mut Vec<u8>,
    body: impl FnOnce(&mut Vec<u8>),
) {
    let at_root = node
        .parent()
        .is_some_and(|p| p.node_type() == roxmltree::NodeType::Root);
    if at_root && node.prev_siblings().any(|s| s.is_element()) {
        out.push(b'\n');
    }
    body(out);
    if at_root && node.next_siblings().any(|s| s.is_element()) {
        out.push(b'\n');
    }
}

/// Write a processing instruction.
pub(crate) fn write_pi(node: roxmltree::Node<'_, '_>, out: &mut Vec<u8>) {
    let Some(pi) = node.pi() else { return };
    write_top_level(node, out, |out| {
        out.extend_from_slice(b"<?");
        out.extend_from_slice(pi.target.as_bytes());
        if let Some(value) = pi.value.filter(|v| !v.is_empty()) {
            out.push(b' ');
            escape::write_pi(out, value);
        }
        out.extend_from_slice(b"?>");
    });
}

/// Write a comment.
pub(crate) fn write_comment(node: roxmltree::Node<'_, '_>, out: &mut Vec<u8>) {
    write_top_level(node, out, |out| {
        out.extend_from_slice(b"<!--");
        out.extend_from_slice(node.text().unwrap_or("").as_bytes());
        out.extend_from_slice(b"-->");
    });
}
