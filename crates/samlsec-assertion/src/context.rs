#![forbid(unsafe_code)]

//! Verifier configuration.

use chrono::{DateTime, Utc};

/// Settings for a [`crate::Verifier`].
#[derive(Debug, Clone, Default)]
pub struct VerifierConfig {
    /// Attribute names treated as element identifiers in addition to
    /// `ID`, `Id` and `id`.
    pub id_attrs: Vec<String>,
    /// Fixed verification time. The wall clock is read when unset.
    pub now: Option<DateTime<Utc>>,
}

impl VerifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ID attribute name to register during processing.
    pub fn add_id_attr(&mut self, name: &str) {
        self.id_attrs.push(name.to_owned());
    }

    /// Pin the verification time.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}
