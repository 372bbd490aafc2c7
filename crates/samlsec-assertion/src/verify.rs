#![forbid(unsafe_code)]

//! Assertion validation engine.
//!
//! Processing order:
//! 1. Exactly one assertion in the document
//! 2. Every `Conditions` window contains `now`
//! 3. Locate the first `ds:Signature`
//! 4. Canonicalize `ds:SignedInfo` per its `CanonicalizationMethod`
//! 5. Build the trust anchor from the caller's certificate
//! 6. For each `ds:Reference`: resolve, transform, digest, compare. At
//!    least one reference must cover both the assertion and the signature.
//! 7. Verify `ds:SignatureValue` over the canonical `SignedInfo`
//!
//! The first failing step decides the [`FailureReason`].

use crate::context::VerifierConfig;
use crate::error::{FailureReason, ValidationError};
use crate::{structural, temporal};
use chrono::{DateTime, Utc};
use roxmltree::{Document, Node};
use samlsec_c14n::C14nMode;
use samlsec_core::{ns, Error};
use samlsec_crypto::DigestMethod;
use samlsec_keys::TrustAnchor;
use samlsec_transforms::{reference_apex, resolve_reference, TransformPipeline};
use samlsec_xml::document::{find_child_elements, find_unique_child};
use samlsec_xml::{IdIndex, XmlDocument};

/// Validates SAML2 assertions against one trusted certificate.
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: VerifierConfig,
}

impl Verifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// Validate `document` against the PEM (or bare base64) `certificate`
    /// at the configured time, or the wall clock when none is set.
    pub fn is_valid(
        &self,
        document: &XmlDocument,
        certificate: &str,
    ) -> Result<(), ValidationError> {
        let now = self.config.now.unwrap_or_else(Utc::now);
        self.is_valid_at(document, certificate, now)
    }

    /// Validate `document` against `certificate` at `now`.
    pub fn is_valid_at(
        &self,
        document: &XmlDocument,
        certificate: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let result = self.run(document, certificate, now);
        match &result {
            Ok(()) => tracing::debug!(state = "PASS", "assertion accepted"),
            Err(err) => tracing::warn!(
                reason = err.reason().as_str(),
                detail = err.detail(),
                "assertion rejected"
            ),
        }
        result
    }

    fn run(
        &self,
        document: &XmlDocument,
        certificate: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let doc = document.parse_doc().map_err(|e| {
            ValidationError::MultipleAssertions(format!("no readable assertion: {e}"))
        })?;

        let assertion = structural::single_assertion(&doc).ok_or_else(|| {
            ValidationError::MultipleAssertions(format!(
                "expected exactly one assertion, found {}",
                structural::count_assertions(&doc)
            ))
        })?;
        tracing::debug!(state = "STRUCTURAL_OK");

        temporal::check_timestamps(&doc, now).map_err(ValidationError::InvalidTimestamp)?;
        tracing::debug!(state = "TEMPORAL_OK", now = %now.to_rfc3339());

        let signature = XmlDocument::find_element(&doc, ns::DSIG, ns::node::SIGNATURE)
            .ok_or_else(|| {
                ValidationError::SignatureNotFound("no ds:Signature element in document".into())
            })?;
        tracing::debug!(state = "SIGNATURE_LOCATED");

        let signed_info = SignedInfo::parse(signature).map_err(signature_invalid)?;
        let canonical_signed_info = samlsec_c14n::canonicalize_subtree(
            signed_info.node,
            signed_info.c14n_mode,
            &signed_info.inclusive_prefixes,
        )
        .map_err(signature_invalid)?;
        tracing::debug!(
            state = "SIGNED_INFO_CANONICALIZED",
            c14n = signed_info.c14n_mode.uri(),
            bytes = canonical_signed_info.len()
        );

        let anchor = TrustAnchor::from_pem(certificate)
            .map_err(|e| ValidationError::KeyResolutionFailed(e.to_string()))?;
        tracing::debug!(state = "KEY_RESOLVED", subject = anchor.subject());

        if signed_info.references.is_empty() {
            return Err(ValidationError::ReferenceValidationFailed(
                "ds:SignedInfo has no ds:Reference".into(),
            ));
        }
        let index = IdIndex::build(&doc, &self.config.id_attrs);
        let mut covered = false;
        for reference in &signed_info.references {
            let apex = verify_reference(&doc, &index, signature, *reference)
                .map_err(|e| ValidationError::ReferenceValidationFailed(e.to_string()))?;
            covered |= contains(apex, assertion) && contains(apex, signature);
        }
        if !covered {
            return Err(ValidationError::ReferenceValidationFailed(
                "no reference covers both the assertion and its signature".into(),
            ));
        }
        tracing::debug!(
            state = "REFERENCES_VERIFIED",
            count = signed_info.references.len()
        );

        let value_node = find_unique_child(signature, ns::DSIG, ns::node::SIGNATURE_VALUE)
            .map_err(signature_invalid)?;
        let value =
            samlsec_crypto::decode_base64(&text_content(value_node)).map_err(signature_invalid)?;
        let verified = samlsec_crypto::verify_signature(
            &canonical_signed_info,
            &value,
            signed_info.signature_method,
            anchor.public_key(),
        )
        .map_err(signature_invalid)?;
        if !verified {
            return Err(ValidationError::SignatureInvalid(
                "signature value does not verify against the trusted certificate".into(),
            ));
        }
        tracing::debug!(state = "SIGNATURE_VERIFIED");
        Ok(())
    }
}

fn signature_invalid(e: Error) -> ValidationError {
    ValidationError::SignatureInvalid(e.to_string())
}

/// The parts of `ds:SignedInfo` the engine acts on.
struct SignedInfo<'a> {
    node: Node<'a, 'a>,
    c14n_mode: C14nMode,
    inclusive_prefixes: Vec<String>,
    signature_method: &'a str,
    references: Vec<Node<'a, 'a>>,
}

impl<'a> SignedInfo<'a> {
    fn parse(signature: Node<'a, 'a>) -> Result<Self, Error> {
        let node = find_unique_child(signature, ns::DSIG, ns::node::SIGNED_INFO)?;

        let c14n_method = find_unique_child(node, ns::DSIG, ns::node::CANONICALIZATION_METHOD)?;
        let c14n_uri = algorithm_of(c14n_method)?;
        let c14n_mode = C14nMode::from_uri(c14n_uri)
            .ok_or_else(|| Error::UnsupportedAlgorithm(format!("C14N: {c14n_uri}")))?;
        let inclusive_prefixes = if c14n_mode.is_exclusive() {
            samlsec_transforms::pipeline::inclusive_prefixes(c14n_method)
        } else {
            Vec::new()
        };

        let signature_method = algorithm_of(find_unique_child(
            node,
            ns::DSIG,
            ns::node::SIGNATURE_METHOD,
        )?)?;

        Ok(Self {
            node,
            c14n_mode,
            inclusive_prefixes,
            signature_method,
            references: find_child_elements(node, ns::DSIG, ns::node::REFERENCE),
        })
    }
}

fn algorithm_of<'a>(node: Node<'a, 'a>) -> Result<&'a str, Error> {
    node.attribute(ns::attr::ALGORITHM).ok_or_else(|| {
        Error::MissingAttribute(format!("Algorithm on {}", node.tag_name().name()))
    })
}

/// Whether `node` is `ancestor` or lies inside it.
fn contains<'a>(ancestor: Node<'a, 'a>, node: Node<'a, 'a>) -> bool {
    node.ancestors().any(|n| n == ancestor)
}

/// All text below `node`, comments and markup skipped.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Verify a single `ds:Reference` and return the node its URI selects.
fn verify_reference<'a>(
    doc: &'a Document<'a>,
    index: &IdIndex,
    signature: Node<'a, 'a>,
    reference: Node<'a, 'a>,
) -> Result<Node<'a, 'a>, Error> {
    let uri = reference
        .attribute(ns::attr::URI)
        .ok_or_else(|| Error::MissingAttribute("URI on ds:Reference".into()))?;

    let method = DigestMethod::from_uri(algorithm_of(find_unique_child(
        reference,
        ns::DSIG,
        ns::node::DIGEST_METHOD,
    )?)?)?;
    let expected = samlsec_crypto::decode_base64(&text_content(find_unique_child(
        reference,
        ns::DSIG,
        ns::node::DIGEST_VALUE,
    )?))?;

    let pipeline = TransformPipeline::from_reference(reference, signature)?;
    let bytes = pipeline
        .execute(resolve_reference(doc, index, uri)?)?
        .into_bytes()?;

    if !samlsec_crypto::verify_digest(&bytes, method, &expected) {
        return Err(Error::DigestMismatch(uri.to_owned()));
    }
    tracing::debug!(uri, digest = method.uri(), "reference verified");
    reference_apex(doc, index, uri)
}

/// Validate `document` against `certificate` with default settings.
pub fn is_valid(document: &XmlDocument, certificate: &str) -> Result<(), ValidationError> {
    Verifier::default().is_valid(document, certificate)
}

/// Validate `document` against `certificate` at `now`.
pub fn is_valid_at(
    document: &XmlDocument,
    certificate: &str,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    Verifier::default().is_valid_at(document, certificate, now)
}

/// Map a validation outcome to its reason code, `None` meaning PASS.
pub fn failure_reason(result: &Result<(), ValidationError>) -> Option<FailureReason> {
    result.as_ref().err().map(ValidationError::reason)
}
