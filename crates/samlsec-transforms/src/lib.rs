#![forbid(unsafe_code)]

//! Reference resolution and transform chains for samlsec.
//!
//! A `ds:Reference` is dereferenced to a node set, run through its
//! declared transforms, and reduced to the octets that get digested.

pub mod enveloped;
pub mod pipeline;
pub mod uri;

pub use pipeline::{C14nTransform, Transform, TransformData, TransformPipeline};
pub use uri::{reference_apex, resolve_reference};
