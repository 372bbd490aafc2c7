#![forbid(unsafe_code)]

//! Transform pipeline and trait definitions.

use crate::enveloped::EnvelopedSignatureTransform;
use roxmltree::{Document, Node};
use samlsec_c14n::C14nMode;
use samlsec_core::{algorithm, ns, Error};
use samlsec_xml::NodeSet;

/// Data flowing through the transform pipeline.
pub enum TransformData<'a> {
    /// A node set over a parsed document.
    Xml {
        doc: &'a Document<'a>,
        node_set: NodeSet,
    },
    /// Octets, e.g. the output of canonicalization.
    Binary(Vec<u8>),
}

impl TransformData<'_> {
    /// The octets to digest. A node set still pending at the end of the
    /// chain is serialized with inclusive C14N 1.0.
    pub fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self {
            TransformData::Binary(data) => Ok(data),
            TransformData::Xml { doc, node_set } => {
                samlsec_c14n::canonicalize_doc(doc, C14nMode::Inclusive, Some(&node_set), &[])
            }
        }
    }
}

/// One step of a `ds:Transforms` chain.
pub trait Transform: Send + Sync {
    /// The algorithm URI for this transform.
    fn uri(&self) -> &str;

    /// Execute the transform on the given data.
    fn execute<'a>(&self, input: TransformData<'a>) -> Result<TransformData<'a>, Error>;
}

/// A pipeline of transforms executed in sequence.
#[derive(Default)]
pub struct TransformPipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the pipeline declared by a `ds:Reference`.
    ///
    /// `signature` is the `ds:Signature` element the reference belongs to;
    /// the enveloped-signature transform removes exactly that element.
    /// Transforms outside the supported set are refused.
    pub fn from_reference(reference: Node<'_, '_>, signature: Node<'_, '_>) -> Result<Self, Error> {
        let mut pipeline = Self::new();
        let Some(transforms) =
            samlsec_xml::document::find_child_element(reference, ns::DSIG, ns::node::TRANSFORMS)
        else {
            return Ok(pipeline);
        };

        for transform in
            samlsec_xml::document::find_child_elements(transforms, ns::DSIG, ns::node::TRANSFORM)
        {
            let uri = transform.attribute(ns::attr::ALGORITHM).ok_or_else(|| {
                Error::MissingAttribute(format!("{} on ds:Transform", ns::attr::ALGORITHM))
            })?;
            if uri == algorithm::ENVELOPED_SIGNATURE {
                pipeline.push(Box::new(EnvelopedSignatureTransform::new(signature)));
            } else if let Some(mode) = C14nMode::from_uri(uri) {
                let prefixes = if mode.is_exclusive() {
                    inclusive_prefixes(transform)
                } else {
                    Vec::new()
                };
                pipeline.push(Box::new(C14nTransform::new(mode, prefixes)));
            } else {
                return Err(Error::UnsupportedAlgorithm(format!("transform: {uri}")));
            }
        }
        Ok(pipeline)
    }

    /// Add a transform to the pipeline.
    pub fn push(&mut self, transform: Box<dyn Transform>) {
        self.transforms.push(transform);
    }

    /// Execute all transforms in order.
    pub fn execute<'a>(&self, input: TransformData<'a>) -> Result<TransformData<'a>, Error> {
        let mut data = input;
        for transform in &self.transforms {
            tracing::trace!(transform = transform.uri(), "applying transform");
            data = transform.execute(data)?;
        }
        Ok(data)
    }

    /// Number of transforms in the pipeline.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// The whitespace-separated PrefixList of an `ec:InclusiveNamespaces`
/// child, if any.
pub fn inclusive_prefixes(method: Node<'_, '_>) -> Vec<String> {
    samlsec_xml::document::find_child_element(method, ns::EXC_C14N, ns::node::INCLUSIVE_NAMESPACES)
        .and_then(|n| n.attribute(ns::attr::PREFIX_LIST))
        .map(|list| list.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default()
}

// ── C14N Transform ───────────────────────────────────────────────────

/// A canonicalization transform.
pub struct C14nTransform {
    mode: C14nMode,
    inclusive_prefixes: Vec<String>,
}

impl C14nTransform {
    pub fn new(mode: C14nMode, inclusive_prefixes: Vec<String>) -> Self {
        Self {
            mode,
            inclusive_prefixes,
        }
    }
}

impl Transform for C14nTransform {
    fn uri(&self) -> &str {
        self.mode.uri()
    }

    fn execute<'a>(&self, input: TransformData<'a>) -> Result<TransformData<'a>, Error> {
        let bytes = match input {
            TransformData::Xml { doc, node_set } => samlsec_c14n::canonicalize_doc(
                doc,
                self.mode,
                Some(&node_set),
                &self.inclusive_prefixes,
            )?,
            TransformData::Binary(data) => {
                let text = std::str::from_utf8(&data)
                    .map_err(|e| Error::Transform(format!("invalid UTF-8: {e}")))?;
                samlsec_c14n::canonicalize(text, self.mode, &self.inclusive_prefixes)?
            }
        };
        Ok(TransformData::Binary(bytes))
    }
}
