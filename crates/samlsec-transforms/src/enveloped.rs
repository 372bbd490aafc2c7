#![forbid(unsafe_code)]

//! Enveloped signature transform.
//!
//! Removes the `<ds:Signature>` element that owns the reference, with all
//! its descendants, from the node set.

use crate::pipeline::{Transform, TransformData};
use roxmltree::NodeId;
use samlsec_core::{algorithm, Error};

pub struct EnvelopedSignatureTransform {
    signature: NodeId,
}

impl EnvelopedSignatureTransform {
    pub fn new(signature: roxmltree::Node<'_, '_>) -> Self {
        Self {
            signature: signature.id(),
        }
    }
}

impl Transform for EnvelopedSignatureTransform {
    fn uri(&self) -> &str {
        algorithm::ENVELOPED_SIGNATURE
    }

    fn execute<'a>(&self, input: TransformData<'a>) -> Result<TransformData<'a>, Error> {
        match input {
            TransformData::Xml { doc, mut node_set } => {
                let signature = doc.get_node(self.signature).ok_or_else(|| {
                    Error::Transform("signature element not found in document".into())
                })?;
                node_set.remove_subtree(signature);
                Ok(TransformData::Xml { doc, node_set })
            }
            TransformData::Binary(_) => Err(Error::Transform(
                "enveloped-signature transform requires XML input".into(),
            )),
        }
    }
}
