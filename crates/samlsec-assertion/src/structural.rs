#![forbid(unsafe_code)]

//! Assertion count check.
//!
//! Elements named `Assertion` are counted in every namespace, so a
//! look-alike planted in a foreign namespace also trips the check.

use roxmltree::{Document, Node};
use samlsec_core::ns;

fn assertions<'a, 'input>(
    doc: &'a Document<'input>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == ns::node::ASSERTION)
}

/// Number of `Assertion` elements anywhere in the document.
pub fn count_assertions(doc: &Document<'_>) -> usize {
    assertions(doc).count()
}

/// The document's only assertion, or `None` when there are zero or several.
pub fn single_assertion<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    let mut found = assertions(doc);
    match (found.next(), found.next()) {
        (Some(assertion), None) => Some(assertion),
        _ => None,
    }
}

/// Whether the document holds exactly one assertion.
pub fn validate_single_assertion(doc: &Document<'_>) -> bool {
    count_assertions(doc) == 1
}
