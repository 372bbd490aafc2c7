#![forbid(unsafe_code)]
#![allow(dead_code)]

//! Test-only SAML response builder and template signer.
//!
//! A template carries empty `ds:DigestValue` / `ds:SignatureValue`
//! elements. Digests are computed with the workspace's own reference
//! pipeline, then `ds:SignedInfo` is canonicalized and signed.

use base64::Engine;
use chrono::{DateTime, Utc};
use pkcs8::DecodePrivateKey;
use samlsec::c14n::C14nMode;
use samlsec::core::{algorithm, ns};
use samlsec::transforms::{pipeline, resolve_reference, TransformPipeline};
use samlsec::xml::document::{find_child_element, find_child_elements};
use samlsec::xml::{IdIndex, XmlDocument};
use signature::{SignatureEncoding, Signer};

pub const IDP_CERT: &str = include_str!("../data/idp-cert.pem");
pub const IDP_EC_CERT: &str = include_str!("../data/idp-ec-cert.pem");
pub const ATTACKER_CERT: &str = include_str!("../data/attacker-cert.pem");

pub const NOT_BEFORE: &str = "2024-01-01T09:55:00Z";
pub const NOT_ON_OR_AFTER: &str = "2024-01-01T10:05:00Z";

pub fn at(s: &str) -> DateTime<Utc> {
    samlsec::assertion::temporal::parse_datetime(s).unwrap()
}

/// Inside the validity window of the default template.
pub fn now() -> DateTime<Utc> {
    at("2024-01-01T10:00:00Z")
}

pub enum TestKey {
    Rsa(rsa::RsaPrivateKey),
    EcP256(p256::ecdsa::SigningKey),
}

impl TestKey {
    pub fn idp() -> Self {
        Self::Rsa(rsa::RsaPrivateKey::from_pkcs8_pem(include_str!("../data/idp-key.pem")).unwrap())
    }

    pub fn attacker() -> Self {
        Self::Rsa(
            rsa::RsaPrivateKey::from_pkcs8_pem(include_str!("../data/attacker-key.pem")).unwrap(),
        )
    }

    pub fn idp_ec() -> Self {
        Self::EcP256(
            p256::ecdsa::SigningKey::from_pkcs8_pem(include_str!("../data/idp-ec-key.pem"))
                .unwrap(),
        )
    }

    fn sign(&self, method: &str, data: &[u8]) -> Vec<u8> {
        match (self, method) {
            (Self::Rsa(k), algorithm::RSA_SHA256) => {
                rsa::pkcs1v15::SigningKey::<sha2::Sha256>::new(k.clone())
                    .sign(data)
                    .to_vec()
            }
            (Self::Rsa(k), algorithm::RSA_SHA512) => {
                rsa::pkcs1v15::SigningKey::<sha2::Sha512>::new(k.clone())
                    .sign(data)
                    .to_vec()
            }
            (Self::EcP256(k), algorithm::ECDSA_SHA256) => {
                let sig: p256::ecdsa::Signature = k.sign(data);
                sig.to_bytes().to_vec()
            }
            (_, other) => panic!("test signer cannot produce {other}"),
        }
    }
}

/// Knobs for [`response_template`].
pub struct Template {
    pub assertion_id: String,
    /// Name of the identifier attribute on the assertion.
    pub id_attr: String,
    pub reference_uri: String,
    pub c14n_method: String,
    pub signature_method: String,
    pub digest_method: String,
    pub key_info: String,
    pub not_before: String,
    pub not_on_or_after: String,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            assertion_id: "_a7f3c9d2e1".into(),
            id_attr: "ID".into(),
            reference_uri: "#_a7f3c9d2e1".into(),
            c14n_method: algorithm::EXC_C14N.into(),
            signature_method: algorithm::RSA_SHA256.into(),
            digest_method: algorithm::SHA256.into(),
            key_info: String::new(),
            not_before: NOT_BEFORE.into(),
            not_on_or_after: NOT_ON_OR_AFTER.into(),
        }
    }
}

/// A SAML response whose assertion carries an enveloped signature
/// template.
pub fn response_template(t: &Template) -> String {
    format!(
        r##"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" ID="_r81b5e" Version="2.0" IssueInstant="2024-01-01T09:59:58Z" Destination="https://sp.example.org/acs">
  <saml:Issuer xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">https://idp.example.org</saml:Issuer>
  <samlp:Status><samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Success"/></samlp:Status>
  <saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" xmlns:xs="http://www.w3.org/2001/XMLSchema" {id_attr}="{assertion_id}" Version="2.0" IssueInstant="2024-01-01T09:59:58Z">
    <saml:Issuer>https://idp.example.org</saml:Issuer>
    <ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#">
      <ds:SignedInfo>
        <ds:CanonicalizationMethod Algorithm="{c14n}"/>
        <ds:SignatureMethod Algorithm="{sig}"/>
        <ds:Reference URI="{uri}">
          <ds:Transforms>
            <ds:Transform Algorithm="http://www.w3.org/2000/09/xmldsig#enveloped-signature"/>
            <ds:Transform Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"><ec:InclusiveNamespaces xmlns:ec="http://www.w3.org/2001/10/xml-exc-c14n#" PrefixList="xs"/></ds:Transform>
          </ds:Transforms>
          <ds:DigestMethod Algorithm="{digest}"/>
          <ds:DigestValue></ds:DigestValue>
        </ds:Reference>
      </ds:SignedInfo>
      <ds:SignatureValue></ds:SignatureValue>{key_info}
    </ds:Signature>
    <saml:Subject>
      <saml:NameID Format="urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress">alice@example.org</saml:NameID>
      <saml:SubjectConfirmation Method="urn:oasis:names:tc:SAML:2.0:cm:bearer">
        <saml:SubjectConfirmationData NotOnOrAfter="{noa}" Recipient="https://sp.example.org/acs"/>
      </saml:SubjectConfirmation>
    </saml:Subject>
    <saml:Conditions NotBefore="{nb}" NotOnOrAfter="{noa}">
      <saml:AudienceRestriction><saml:Audience>https://sp.example.org</saml:Audience></saml:AudienceRestriction>
    </saml:Conditions>
    <saml:AttributeStatement>
      <saml:Attribute Name="role"><saml:AttributeValue xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="xs:string">user &amp; reader</saml:AttributeValue></saml:Attribute>
    </saml:AttributeStatement>
  </saml:Assertion>
</samlp:Response>
"##,
        id_attr = t.id_attr,
        assertion_id = t.assertion_id,
        c14n = t.c14n_method,
        sig = t.signature_method,
        uri = t.reference_uri,
        digest = t.digest_method,
        key_info = t.key_info,
        nb = t.not_before,
        noa = t.not_on_or_after,
    )
}

/// An IdP error response (no assertion) with an enveloped signature
/// template over the whole response.
pub fn error_response_template() -> String {
    r##"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" ID="_e4419b" Version="2.0" IssueInstant="2024-01-01T09:59:58Z">
  <saml:Issuer xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion">https://idp.example.org</saml:Issuer>
  <ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#">
    <ds:SignedInfo>
      <ds:CanonicalizationMethod Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"/>
      <ds:SignatureMethod Algorithm="http://www.w3.org/2001/04/xmldsig-more#rsa-sha256"/>
      <ds:Reference URI="#_e4419b">
        <ds:Transforms>
          <ds:Transform Algorithm="http://www.w3.org/2000/09/xmldsig#enveloped-signature"/>
          <ds:Transform Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"/>
        </ds:Transforms>
        <ds:DigestMethod Algorithm="http://www.w3.org/2001/04/xmlenc#sha256"/>
        <ds:DigestValue></ds:DigestValue>
      </ds:Reference>
    </ds:SignedInfo>
    <ds:SignatureValue></ds:SignatureValue>
  </ds:Signature>
  <samlp:Status><samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Requester"/></samlp:Status>
</samlp:Response>"##
        .to_owned()
}

/// An unsigned assertion for `name_id`, valid at [`now`].
pub fn forged_assertion(name_id: &str, advice: &str) -> String {
    format!(
        r#"<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="_f0a9" Version="2.0" IssueInstant="2024-01-01T09:59:58Z"><saml:Issuer>https://idp.example.org</saml:Issuer><saml:Subject><saml:NameID>{name_id}</saml:NameID></saml:Subject><saml:Conditions NotBefore="{NOT_BEFORE}" NotOnOrAfter="{NOT_ON_OR_AFTER}"/><saml:Advice>{advice}</saml:Advice></saml:Assertion>"#
    )
}

/// `ds:KeyInfo` carrying `cert` as an X509Certificate.
pub fn key_info_for(cert: &str) -> String {
    let body: String = cert.lines().filter(|l| !l.starts_with("-----")).collect();
    format!(
        "\n      <ds:KeyInfo><ds:X509Data><ds:X509Certificate>{body}</ds:X509Certificate></ds:X509Data></ds:KeyInfo>"
    )
}

fn b64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Fill in the digest and signature values of `template`.
pub fn sign_template(template: &str, key: &TestKey) -> String {
    sign_template_with_ids(template, key, &[])
}

pub fn sign_template_with_ids(template: &str, key: &TestKey, id_attrs: &[String]) -> String {
    let mut xml = template.to_owned();

    let doc = samlsec::xml::parse(template).unwrap();
    let index = IdIndex::build(&doc, id_attrs);
    let signature = XmlDocument::find_element(&doc, ns::DSIG, ns::node::SIGNATURE).unwrap();
    let signed_info = find_child_element(signature, ns::DSIG, ns::node::SIGNED_INFO).unwrap();
    for reference in find_child_elements(signed_info, ns::DSIG, ns::node::REFERENCE) {
        let uri = reference.attribute(ns::attr::URI).unwrap();
        let digest_uri = find_child_element(reference, ns::DSIG, ns::node::DIGEST_METHOD)
            .and_then(|n| n.attribute(ns::attr::ALGORITHM))
            .unwrap();
        let bytes = TransformPipeline::from_reference(reference, signature)
            .unwrap()
            .execute(resolve_reference(&doc, &index, uri).unwrap())
            .unwrap()
            .into_bytes()
            .unwrap();
        let digest = samlsec::crypto::digest::digest(digest_uri, &bytes).unwrap();
        xml = xml.replacen(
            "<ds:DigestValue></ds:DigestValue>",
            &format!("<ds:DigestValue>{}</ds:DigestValue>", b64(&digest)),
            1,
        );
    }

    let signature_value = {
        let doc = samlsec::xml::parse(&xml).unwrap();
        let signature = XmlDocument::find_element(&doc, ns::DSIG, ns::node::SIGNATURE).unwrap();
        let signed_info = find_child_element(signature, ns::DSIG, ns::node::SIGNED_INFO).unwrap();
        let c14n_method =
            find_child_element(signed_info, ns::DSIG, ns::node::CANONICALIZATION_METHOD).unwrap();
        let mode = C14nMode::from_uri(c14n_method.attribute(ns::attr::ALGORITHM).unwrap()).unwrap();
        let canonical = samlsec::c14n::canonicalize_subtree(
            signed_info,
            mode,
            &pipeline::inclusive_prefixes(c14n_method),
        )
        .unwrap();
        let method = find_child_element(signed_info, ns::DSIG, ns::node::SIGNATURE_METHOD)
            .and_then(|n| n.attribute(ns::attr::ALGORITHM))
            .unwrap();
        b64(&key.sign(method, &canonical))
    };

    xml.replacen(
        "<ds:SignatureValue></ds:SignatureValue>",
        &format!("<ds:SignatureValue>{signature_value}</ds:SignatureValue>"),
        1,
    )
}

/// A response signed by the IdP's RSA key with default settings.
pub fn signed_response() -> String {
    sign_template(&response_template(&Template::default()), &TestKey::idp())
}

pub fn document(xml: &str) -> XmlDocument {
    XmlDocument::parse(xml.to_owned()).unwrap()
}
