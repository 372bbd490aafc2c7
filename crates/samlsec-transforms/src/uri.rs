#![forbid(unsafe_code)]

//! URI resolution for `ds:Reference`.
//!
//! Handles:
//! - `""`: the whole document minus comments
//! - `#id`: the element carrying that identifier, comments excluded
//! - `#xpointer(id('id'))`: the same element, comments kept
//! - `#xpointer(/)`: the whole document with comments
//!
//! Anything else, external URIs included, is refused.

use crate::pipeline::TransformData;
use roxmltree::{Document, Node};
use samlsec_core::Error;
use samlsec_xml::{xpath, IdIndex, NodeSet};

/// Dereference `uri` to the node set the transform chain starts from.
pub fn resolve_reference<'a>(
    doc: &'a Document<'a>,
    index: &IdIndex,
    uri: &str,
) -> Result<TransformData<'a>, Error> {
    let apex = reference_apex(doc, index, uri)?;
    let node_set = if uri.is_empty() {
        NodeSet::all_without_comments(doc)
    } else if uri == "#xpointer(/)" {
        NodeSet::all(doc)
    } else if uri.starts_with("#xpointer(") {
        NodeSet::tree_with_comments(apex)
    } else {
        NodeSet::tree_without_comments(apex)
    };
    Ok(TransformData::Xml { doc, node_set })
}

/// The node whose subtree `uri` selects: the document root for whole
/// document references, otherwise the element carrying the identifier.
pub fn reference_apex<'a>(
    doc: &'a Document<'a>,
    index: &IdIndex,
    uri: &str,
) -> Result<Node<'a, 'a>, Error> {
    if uri.is_empty() || uri == "#xpointer(/)" {
        return Ok(doc.root());
    }
    let Some(id) = xpath::parse_same_document_ref(uri) else {
        return Err(Error::InvalidUri(format!(
            "only same-document references are supported: {uri}"
        )));
    };
    let target = index.resolve(doc, id)?;
    tracing::debug!(
        id,
        element = target.tag_name().name(),
        "resolved reference"
    );
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<r><!--top--><a ID="x"><!--in-->t</a></r>"#;

    fn bytes(data: TransformData<'_>) -> String {
        String::from_utf8(data.into_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_uri_is_whole_document_without_comments() {
        let doc = samlsec_xml::parse(XML).unwrap();
        let index = IdIndex::build(&doc, &[]);
        let data = resolve_reference(&doc, &index, "").unwrap();
        assert_eq!(bytes(data), r#"<r><a ID="x">t</a></r>"#);
    }

    #[test]
    fn test_id_reference() {
        let doc = samlsec_xml::parse(XML).unwrap();
        let index = IdIndex::build(&doc, &[]);
        let data = resolve_reference(&doc, &index, "#x").unwrap();
        assert_eq!(bytes(data), r#"<a ID="x">t</a>"#);
    }

    #[test]
    fn test_xpointer_id_keeps_comments() {
        let doc = samlsec_xml::parse(XML).unwrap();
        let index = IdIndex::build(&doc, &[]);
        let data = resolve_reference(&doc, &index, "#xpointer(id('x'))").unwrap();
        let TransformData::Xml { node_set, .. } = data else {
            panic!("expected a node set");
        };
        let comment = doc
            .descendants()
            .find(|n| n.is_comment() && n.text() == Some("in"))
            .unwrap();
        assert!(node_set.contains(&comment));
    }

    #[test]
    fn test_unknown_and_external_refused() {
        let doc = samlsec_xml::parse(XML).unwrap();
        let index = IdIndex::build(&doc, &[]);
        assert!(matches!(
            resolve_reference(&doc, &index, "#missing"),
            Err(Error::InvalidUri(_))
        ));
        assert!(matches!(
            resolve_reference(&doc, &index, "https://idp.example.org/a.xml"),
            Err(Error::InvalidUri(_))
        ));
    }

    #[test]
    fn test_reference_apex() {
        let doc = samlsec_xml::parse(XML).unwrap();
        let index = IdIndex::build(&doc, &[]);
        assert_eq!(reference_apex(&doc, &index, "").unwrap(), doc.root());
        assert_eq!(reference_apex(&doc, &index, "#xpointer(/)").unwrap(), doc.root());
        let a = reference_apex(&doc, &index, "#x").unwrap();
        assert_eq!(a.tag_name().name(), "a");
        assert_eq!(reference_apex(&doc, &index, "#xpointer(id('x'))").unwrap(), a);
    }

    #[test]
    fn test_duplicate_id_refused() {
        let doc = samlsec_xml::parse(r#"<r><a ID="x"/><b ID="x"/></r>"#).unwrap();
        let index = IdIndex::build(&doc, &[]);
        assert!(matches!(
            resolve_reference(&doc, &index, "#x"),
            Err(Error::DuplicateId(_))
        ));
    }
}
