#![forbid(unsafe_code)]

//! NodeSet type for XML canonicalization and transforms.
//!
//! A `NodeSet` is the set of nodes of one parsed document that are
//! visible to canonicalization, identified by their roxmltree `NodeId`.

use roxmltree::{Document, Node, NodeId};
use std::collections::HashSet;

/// A set of XML document nodes identified by `NodeId`.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: HashSet<NodeId>,
}

impl NodeSet {
    /// Create a node set containing all nodes in the document.
    pub fn all(doc: &Document<'_>) -> Self {
        Self {
            nodes: doc.descendants().map(|n| n.id()).collect(),
        }
    }

    /// All nodes except comments. Per XML-DSig, `URI=""` selects the
    /// document without comments.
    pub fn all_without_comments(doc: &Document<'_>) -> Self {
        Self {
            nodes: doc
                .descendants()
                .filter(|n| !n.is_comment())
                .map(|n| n.id())
                .collect(),
        }
    }

    /// Subtree rooted at `root`, comments excluded.
    pub fn tree_without_comments(root: Node<'_, '_>) -> Self {
        let mut nodes = HashSet::new();
        collect_subtree(root, &mut nodes, false);
        Self { nodes }
    }

    /// Subtree rooted at `root`, comments included.
    pub fn tree_with_comments(root: Node<'_, '_>) -> Self {
        let mut nodes = HashSet::new();
        collect_subtree(root, &mut nodes, true);
        Self { nodes }
    }

    /// Check if a node is in this set.
    pub fn contains(&self, node: &Node<'_, '_>) -> bool {
        self.nodes.contains(&node.id())
    }

    /// Remove `root` and all its descendants.
    pub fn remove_subtree(&mut self, root: Node<'_, '_>) {
        for n in root.descendants() {
            self.nodes.remove(&n.id());
        }
    }

    /// Check if this set is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in the set.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

fn collect_subtree(node: Node<'_, '_>, set: &mut HashSet<NodeId>, include_comments: bool) {
    set.extend(
        node.descendants()
            .filter(|n| include_comments || !n.is_comment())
            .map(|n| n.id()),
    );
}
