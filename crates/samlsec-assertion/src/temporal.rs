#![forbid(unsafe_code)]

//! Validity window check over every `Conditions` element.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use roxmltree::Document;
use samlsec_core::ns;

/// Parse an `xs:dateTime`. A value without zone designator is UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Check every `Conditions` element against `now`.
///
/// `NotBefore` must not be after `now` and `NotOnOrAfter` must be after
/// it. The error names the first offending bound.
pub fn check_timestamps(doc: &Document<'_>, now: DateTime<Utc>) -> Result<(), String> {
    let conditions = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == ns::node::CONDITIONS);

    for cond in conditions {
        if let Some(raw) = cond.attribute(ns::attr::NOT_BEFORE) {
            let not_before =
                parse_datetime(raw).ok_or_else(|| format!("unparseable NotBefore: {raw}"))?;
            if not_before > now {
                return Err(format!("not yet valid: NotBefore {raw}, now {}", now.to_rfc3339()));
            }
        }
        if let Some(raw) = cond.attribute(ns::attr::NOT_ON_OR_AFTER) {
            let not_on_or_after =
                parse_datetime(raw).ok_or_else(|| format!("unparseable NotOnOrAfter: {raw}"))?;
            if not_on_or_after <= now {
                return Err(format!("expired: NotOnOrAfter {raw}, now {}", now.to_rfc3339()));
            }
        }
    }
    Ok(())
}

/// Whether every `Conditions` window contains `now`.
pub fn validate_timestamps(doc: &Document<'_>, now: DateTime<Utc>) -> bool {
    check_timestamps(doc, now).is_ok()
}
