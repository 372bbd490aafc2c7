#![forbid(unsafe_code)]

//! XML document wrapper over roxmltree with ID attribute indexing.

use samlsec_core::{ns, Error};
use std::collections::HashMap;

/// An owned, already-validated XML document.
///
/// The document only stores text. Every consumer parses its own
/// `roxmltree::Document` through [`XmlDocument::parse_doc`], so a
/// verification never shares a tree with the caller or with another
/// verification running in parallel.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    text: String,
}

impl XmlDocument {
    /// Parse and validate XML from a string, taking ownership.
    pub fn parse(text: String) -> Result<Self, Error> {
        crate::parse(&text)?;
        Ok(Self { text })
    }

    /// Get the raw XML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the document and return a private `roxmltree::Document`.
    pub fn parse_doc(&self) -> Result<roxmltree::Document<'_>, Error> {
        crate::parse(&self.text)
    }

    /// Find the first descendant element with the given local name and namespace.
    pub fn find_element<'a>(
        doc: &'a roxmltree::Document<'a>,
        ns: &str,
        local_name: &str,
    ) -> Option<roxmltree::Node<'a, 'a>> {
        doc.descendants().find(|n| is_element_named(n, ns, local_name))
    }
}

/// Find the first child element with the given local name and namespace.
pub fn find_child_element<'a>(
    parent: roxmltree::Node<'a, 'a>,
    ns_uri: &str,
    local_name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    parent
        .children()
        .find(|n| is_element_named(n, ns_uri, local_name))
}

/// Find all child elements with the given local name and namespace.
pub fn find_child_elements<'a>(
    parent: roxmltree::Node<'a, 'a>,
    ns_uri: &str,
    local_name: &str,
) -> Vec<roxmltree::Node<'a, 'a>> {
    parent
        .children()
        .filter(|n| is_element_named(n, ns_uri, local_name))
        .collect()
}

/// Find the single child element with the given name.
///
/// Zero matches is `MissingElement`, several is `XmlStructure`.
pub fn find_unique_child<'a>(
    parent: roxmltree::Node<'a, 'a>,
    ns_uri: &str,
    local_name: &str,
) -> Result<roxmltree::Node<'a, 'a>, Error> {
    let mut found = find_child_elements(parent, ns_uri, local_name).into_iter();
    match (found.next(), found.next()) {
        (Some(node), None) => Ok(node),
        (None, _) => Err(Error::MissingElement(local_name.to_owned())),
        (Some(_), Some(_)) => Err(Error::XmlStructure(format!(
            "more than one {local_name} element"
        ))),
    }
}

fn is_element_named(n: &roxmltree::Node<'_, '_>, ns_uri: &str, local_name: &str) -> bool {
    n.is_element()
        && n.tag_name().name() == local_name
        && n.tag_name().namespace().unwrap_or("") == ns_uri
}

/// The prefix an element was written with in the source document, if any.
///
/// roxmltree resolves names to (namespace, local) pairs; canonical output
/// needs the prefix as written, so it is read back from the start tag.
pub fn element_prefix<'a, 'input>(node: roxmltree::Node<'a, 'input>) -> Option<&'input str> {
    let text = node.document().input_text();
    let tag = text.get(node.range().start..)?.strip_prefix('<')?;
    let end = tag
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(tag.len());
    tag[..end].split_once(':').map(|(prefix, _)| prefix)
}

/// The prefix a namespaced attribute was written with.
///
/// Several prefixes may be bound to one namespace, so the prefix is read
/// back from the attribute's qualified name in the source.
pub fn attribute_prefix<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    attr: &roxmltree::Attribute<'a, 'input>,
) -> Option<&'input str> {
    attr.namespace()?;
    let qname = node.document().input_text().get(attr.range_qname())?;
    qname.split_once(':').map(|(prefix, _)| prefix)
}

// ── ID index ─────────────────────────────────────────────────────────

/// Map from identifier value to every element that carries it.
///
/// Unlike a plain `HashMap<String, NodeId>`, which silently keeps the
/// last writer, the index remembers all holders so a lookup can refuse
/// an identifier that names more than one element.
#[derive(Debug, Default)]
pub struct IdIndex {
    map: HashMap<String, Vec<roxmltree::NodeId>>,
}

impl IdIndex {
    /// Index `ID`, `Id`, `id` plus any `extra_attrs` on every element.
    pub fn build(doc: &roxmltree::Document<'_>, extra_attrs: &[String]) -> Self {
        let mut map: HashMap<String, Vec<roxmltree::NodeId>> = HashMap::new();
        let names = ns::attr::DEFAULT_ID_ATTRS
            .iter()
            .copied()
            .chain(extra_attrs.iter().map(String::as_str));
        let names: Vec<&str> = names.collect();

        for node in doc.descendants().filter(|n| n.is_element()) {
            for attr_name in &names {
                if let Some(val) = node.attribute(*attr_name) {
                    let holders = map.entry(val.to_owned()).or_default();
                    if !holders.contains(&node.id()) {
                        holders.push(node.id());
                    }
                }
            }
        }
        Self { map }
    }

    /// Number of elements that carry `id`.
    pub fn count(&self, id: &str) -> usize {
        self.map.get(id).map_or(0, Vec::len)
    }

    /// Resolve `id` to the single element carrying it.
    pub fn resolve<'a>(
        &self,
        doc: &'a roxmltree::Document<'a>,
        id: &str,
    ) -> Result<roxmltree::Node<'a, 'a>, Error> {
        match self.map.get(id).map(Vec::as_slice) {
            None | Some([]) => Err(Error::InvalidUri(format!("ID not found: {id}"))),
            Some([node_id]) => doc
                .get_node(*node_id)
                .ok_or_else(|| Error::InvalidUri(format!("ID not found: {id}"))),
            Some(holders) => Err(Error::DuplicateId(format!(
                "{id} is carried by {} elements",
                holders.len()
            ))),
        }
    }
}
