#![forbid(unsafe_code)]

//! Inclusive Canonical XML, versions 1.0 and 1.1.
//!
//! Every in-scope namespace of an output element is rendered unless the
//! nearest output ancestor already rendered the same binding. When only a
//! subset of the document is output, `xml:*` attributes of omitted
//! ancestors are carried down onto the subset's apex elements.

use crate::render::{self, Attr, NsDecl};
use crate::escape;
use samlsec_core::{ns, Error};
use samlsec_xml::NodeSet;
use std::collections::BTreeMap;

/// Which revision of inclusive C14N to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V1_0,
    /// 1.1 does not carry `xml:id` down to subset apexes.
    V1_1,
}

/// Canonicalize a document (or the part of it in `node_set`).
pub fn canonicalize(
    doc: &roxmltree::Document<'_>,
    version: Version,
    with_comments: bool,
    node_set: Option<&NodeSet>,
) -> Result<Vec<u8>, Error> {
    let mut output = Vec::new();
    let ctx = InclusiveC14n {
        version,
        with_comments,
        node_set,
    };
    ctx.process_node(doc.root(), &mut output, &BTreeMap::new());
    Ok(output)
}

struct InclusiveC14n<'a> {
    version: Version,
    with_comments: bool,
    node_set: Option<&'a NodeSet>,
}

impl InclusiveC14n<'_> {
    fn is_visible(&self, node: &roxmltree::Node<'_, '_>) -> bool {
        self.node_set.map_or(true, |set| set.contains(node))
    }

    fn process_node(
        &self,
        node: roxmltree::Node<'_, '_>,
        output: &mut Vec<u8>,
        rendered: &BTreeMap<String, String>,
    ) {
        match node.node_type() {
            roxmltree::NodeType::Root => {
                for child in node.children() {
                    self.process_node(child, output, rendered);
                }
            }
            roxmltree::NodeType::Element => self.process_element(node, output, rendered),
            roxmltree::NodeType::Text => {
                if self.is_visible(&node) {
                    escape::write_text(output, node.text().unwrap_or(""));
                }
            }
            roxmltree::NodeType::Comment => {
                if self.with_comments && self.is_visible(&node) {
                    render::write_comment(node, output);
                }
            }
            roxmltree::NodeType::PI => {
                if self.is_visible(&node) {
                    render::write_pi(node, output);
                }
            }
        }
    }

    fn process_element(
        &self,
        node: roxmltree::Node<'_, '_>,
        output: &mut Vec<u8>,
        rendered: &BTreeMap<String, String>,
    ) {
        if !self.is_visible(&node) {
            for child in node.children() {
                self.process_node(child, output, rendered);
            }
            return;
        }

        let in_scope = inscope_namespaces(node);
        let mut child_rendered = rendered.clone();
        let mut ns_decls: Vec<NsDecl> = Vec::new();
        for (prefix, uri) in &in_scope {
            if rendered.get(prefix) != Some(uri) {
                ns_decls.push(NsDecl {
                    prefix: prefix.clone(),
                    uri: uri.clone(),
                });
                child_rendered.insert(prefix.clone(), uri.clone());
            }
        }
        // An output ancestor put a default namespace in force that this
        // element does not have.
        if !in_scope.contains_key("") && rendered.get("").is_some_and(|u| !u.is_empty()) {
            ns_decls.push(NsDecl {
                prefix: String::new(),
                uri: String::new(),
            });
            child_rendered.insert(String::new(), String::new());
        }
        ns_decls.sort();

        let mut attrs = render::sorted_attributes(node);
        if self.node_set.is_some() {
            let parent_hidden = node
                .parent()
                .map_or(true, |p| !p.is_element() || !self.is_visible(&p));
            if parent_hidden {
                attrs.extend(self.inherited_xml_attrs(node, &attrs));
                attrs.sort();
            }
        }

        let name = render::qualified_element_name(node);
        output.push(b'<');
        output.extend_from_slice(name.as_bytes());
        for decl in &ns_decls {
            decl.write_to(output);
        }
        for attr in &attrs {
            attr.write_to(output);
        }
        output.push(b'>');

        for child in node.children() {
            self.process_node(child, output, &child_rendered);
        }

        output.extend_from_slice(b"</");
        output.extend_from_slice(name.as_bytes());
        output.push(b'>');
    }

    /// `xml:*` attributes set on ancestors and not overridden on `node`.
    /// The nearest ancestor's value wins.
    fn inherited_xml_attrs(&self, node: roxmltree::Node<'_, '_>, own: &[Attr]) -> Vec<Attr> {
        let mut inherited: BTreeMap<String, String> = BTreeMap::new();
        for ancestor in node.ancestors().skip(1).filter(|n| n.is_element()) {
            for attr in ancestor.attributes() {
                if attr.namespace() != Some(ns::XML) {
                    continue;
                }
                if self.version == Version::V1_1 && attr.name() == "id" {
                    continue;
                }
                inherited
                    .entry(attr.name().to_owned())
                    .or_insert_with(|| attr.value().to_owned());
            }
        }

        inherited
            .into_iter()
            .filter(|(name, _)| {
                !own.iter()
                    .any(|a| a.ns_uri == ns::XML && a.local_name == *name)
            })
            .map(|(name, value)| Attr {
                ns_uri: ns::XML.to_owned(),
                qualified_name: format!("xml:{name}"),
                local_name: name,
                value,
            })
            .collect()
    }
}

/// All namespace bindings in scope at `node`, excluding the implicit `xml`
/// prefix and any default namespace undeclared with `xmlns=""`.
pub(crate) fn inscope_namespaces(node: roxmltree::Node<'_, '_>) -> BTreeMap<String, String> {
    node.namespaces()
        .filter_map(|ns| {
            let prefix = ns.name().unwrap_or("");
            if prefix == "xml" || ns.uri().is_empty() {
                None
            } else {
                Some((prefix.to_owned(), ns.uri().to_owned()))
            }
        })
        .collect()
}
