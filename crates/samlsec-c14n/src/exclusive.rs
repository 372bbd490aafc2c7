#![forbid(unsafe_code)]

//! Exclusive Canonical XML 1.0 (exc-C14N).
//!
//! Only "visibly utilized" namespace declarations are output. A prefix is
//! visibly utilized by an element if:
//! 1. the element's own name uses it (the default namespace counts as ""),
//! 2. one of the element's attributes uses it, or
//! 3. it appears in the InclusiveNamespaces PrefixList.
//!
//! A declaration is rendered only when the nearest output ancestor has not
//! already rendered the same binding.

use crate::escape;
use crate::inclusive::inscope_namespaces;
use crate::render::{self, NsDecl};
use samlsec_core::Error;
use samlsec_xml::document::{attribute_prefix, element_prefix};
use samlsec_xml::NodeSet;
use std::collections::{BTreeMap, BTreeSet};

/// Canonicalize using Exclusive C14N 1.0.
///
/// `inclusive_prefixes` is the InclusiveNamespaces PrefixList, where
/// `#default` stands for the default namespace.
pub fn canonicalize(
    doc: &roxmltree::Document<'_>,
    with_comments: bool,
    node_set: Option<&NodeSet>,
    inclusive_prefixes: &[String],
) -> Result<Vec<u8>, Error> {
    let inclusive_prefixes = inclusive_prefixes
        .iter()
        .map(|p| if p == "#default" { String::new() } else { p.clone() })
        .collect();
    let ctx = ExcC14n {
        with_comments,
        node_set,
        inclusive_prefixes,
    };
    let mut output = Vec::new();
    ctx.process_node(doc.root(), &mut output, &BTreeMap::new());
    Ok(output)
}

struct ExcC14n<'a> {
    with_comments: bool,
    node_set: Option<&'a NodeSet>,
    inclusive_prefixes: BTreeSet<String>,
}

impl ExcC14n<'_> {
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
        for prefix in self.utilized_prefixes(node) {
            match in_scope.get(&prefix) {
                Some(uri) => {
                    if rendered.get(&prefix) != Some(uri) {
                        ns_decls.push(NsDecl {
                            prefix: prefix.clone(),
                            uri: uri.clone(),
                        });
                        child_rendered.insert(prefix, uri.clone());
                    }
                }
                None if prefix.is_empty() => {
                    if rendered.get("").is_some_and(|u| !u.is_empty()) {
                        ns_decls.push(NsDecl {
                            prefix: String::new(),
                            uri: String::new(),
                        });
                        child_rendered.insert(String::new(), String::new());
                    }
                }
                None => {}
            }
        }
        ns_decls.sort();

        let attrs = render::sorted_attributes(node);
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

    fn utilized_prefixes(&self, node: roxmltree::Node<'_, '_>) -> BTreeSet<String> {
        let mut prefixes = self.inclusive_prefixes.clone();
        prefixes.insert(element_prefix(node).unwrap_or("").to_owned());
        for attr in node.attributes() {
            if let Some(prefix) = attribute_prefix(node, &attr) {
                if prefix != "xml" {
                    prefixes.insert(prefix.to_owned());
                }
            }
        }
        prefixes
    }
}
