// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Notes interpretation.
//!
//! A notes field is prose unless it starts with the YAML document marker
//! `---`, in which case it is structured data.  The same rule applies to
//! group notes, entry notes and the vault description that carries the
//! embedded configuration.

use crate::error::NotesError;
use crate::types::{value_kind, Value, Vars};

/// Leading token that marks a notes field as structured data.
pub const STRUCTURED_MARKER: &str = "---";

/// Parse a notes field.
///
/// * `None` or prose → `Ok(None)`
/// * marker followed by nothing (or a null document) → an empty mapping
/// * marker followed by a YAML mapping → that mapping, in document order
///
/// # Errors
///
/// Marked text that is not valid YAML, or whose top level is not a mapping,
/// is an error.  It signals deliberate but broken data and must not be
/// mistaken for "no data".
///
/// # Examples
///
/// ```rust
/// use keepass_inventory_core::notes::parse_notes;
///
/// assert!(parse_notes(Some("just a reminder")).unwrap().is_none());
///
/// let vars = parse_notes(Some("---\nport: 2222\nuser: deploy")).unwrap().unwrap();
/// assert_eq!(vars["port"], 2222);
/// assert_eq!(vars["user"], "deploy");
///
/// assert!(parse_notes(Some("---\n[unclosed")).is_err());
/// ```
pub fn parse_notes(text: Option<&str>) -> Result<Option<Vars>, NotesError> {
    let Some(text) = text else {
        return Ok(None);
    };
    if !text.starts_with(STRUCTURED_MARKER) {
        return Ok(None);
    }
    if text[STRUCTURED_MARKER.len()..].trim().is_empty() {
        return Ok(Some(Vars::new()));
    }

    match serde_yaml::from_str::<Value>(text)? {
        Value::Null => Ok(Some(Vars::new())),
        Value::Object(map) => Ok(Some(map)),
        other => Err(NotesError::NotAMapping {
            found: value_kind(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_notes() {
        assert!(parse_notes(None).expect("absent notes parse").is_none());
    }

    #[test]
    fn test_prose_is_not_data() {
        let parsed = parse_notes(Some("port: 22\nbut no marker")).expect("prose parses");
        assert!(parsed.is_none());
    }

    #[test]
    fn test_marker_must_lead() {
        let parsed = parse_notes(Some(" ---\nport: 22")).expect("prose parses");
        assert!(parsed.is_none());
    }

    #[test]
    fn test_empty_document_is_empty_mapping() {
        assert_eq!(parse_notes(Some("---")).expect("parses"), Some(Vars::new()));
        assert_eq!(parse_notes(Some("---\n\n")).expect("parses"), Some(Vars::new()));
        assert_eq!(parse_notes(Some("---\n~\n")).expect("parses"), Some(Vars::new()));
    }

    #[test]
    fn test_nested_values_keep_types_and_order() {
        let vars = parse_notes(Some(
            "---\nzeta: true\nalpha:\n  ports: [80, 443]\n  name: web\nratio: 0.5\n",
        ))
        .expect("parses")
        .expect("structured");

        let keys: Vec<_> = vars.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "ratio"]);
        assert_eq!(
            Value::Object(vars),
            json!({"zeta": true, "alpha": {"ports": [80, 443], "name": "web"}, "ratio": 0.5})
        );
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let error = parse_notes(Some("---\nkey: [1, 2\nother: x")).unwrap_err();
        assert!(matches!(error, NotesError::Yaml(_)));
    }

    #[test]
    fn test_sequence_document_is_an_error() {
        let error = parse_notes(Some("---\n- a\n- b")).unwrap_err();
        assert!(matches!(error, NotesError::NotAMapping { found: "a sequence" }));
    }
}
