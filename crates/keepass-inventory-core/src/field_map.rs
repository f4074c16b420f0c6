// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Flat entry fields to nested variables.
//!
//! An entry is a flat list of `(Key, Value)` strings.  A [`FieldMap`] says
//! where each key goes:
//!
//! | Map entry for the key     | Result                                  |
//! |---------------------------|-----------------------------------------|
//! | none                      | stored under the key itself, flat       |
//! | `null` (or `""`)          | dropped                                 |
//! | `"login.password"`        | stored at `login` → `password`          |
//!
//! Values are never converted: every field value lands as a string.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::tree::StringField;
use crate::types::{Value, Vars};

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// The string fields of one entry, keyed case-insensitively.
///
/// Keys are stored lowercased in first-seen order.  A later field whose key
/// differs only in case replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect an entry's string fields, silently dropping any field that
    /// lacks its key or its value.
    pub fn from_strings(strings: &[StringField]) -> Self {
        let mut fields = Self::new();
        for field in strings {
            if let (Some(key), Some(value)) = (&field.key, &field.value) {
                fields.insert(key, value.as_str());
            }
        }
        fields
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let key = key.to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// A copy without the given keys.
    pub fn without(&self, keys: &[&str]) -> Self {
        let excluded: Vec<String> = keys.iter().map(|key| key.to_lowercase()).collect();
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(key, _)| !excluded.contains(key))
                .cloned()
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key.as_ref(), value);
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// FieldMap
// ---------------------------------------------------------------------------

/// Where a single field goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<'a> {
    /// No map entry: the field keeps its own (lowercased) name.
    Identity,
    /// Explicitly excluded.
    Dropped,
    /// Dot-separated path into the nested output.
    Path(&'a str),
}

/// Field name → destination path table.
///
/// Field names are matched case-insensitively.  `None` and the empty string
/// both mean "drop this field"; the latter exists because TOML has no null.
///
/// ```rust
/// use keepass_inventory_core::field_map::{Destination, FieldMap};
///
/// let map = FieldMap::new()
///     .with("Password", Some("login.password"))
///     .with("title", None);
/// assert_eq!(map.destination("password"), Destination::Path("login.password"));
/// assert_eq!(map.destination("TITLE"), Destination::Dropped);
/// assert_eq!(map.destination("url"), Destination::Identity);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldMap {
    entries: BTreeMap<String, Option<String>>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, destination: Option<&str>) -> Self {
        self.insert(field, destination.map(str::to_owned));
        self
    }

    pub fn insert(&mut self, field: &str, destination: Option<String>) {
        self.entries.insert(field.to_lowercase(), destination);
    }

    pub fn destination(&self, field: &str) -> Destination<'_> {
        match self.entries.get(&field.to_lowercase()) {
            None => Destination::Identity,
            Some(None) => Destination::Dropped,
            Some(Some(path)) if path.is_empty() => Destination::Dropped,
            Some(Some(path)) => Destination::Path(path),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, Option<String>>> for FieldMap {
    fn from(entries: BTreeMap<String, Option<String>>) -> Self {
        let mut map = Self::new();
        for (field, destination) in entries {
            map.insert(&field, destination);
        }
        map
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, Option<String>>::deserialize(deserializer).map(Self::from)
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Expand `fields` into a nested mapping according to `map`.
///
/// Path segments are applied left to right, creating mappings as needed.
/// When an intermediate segment already holds a scalar it is replaced by a
/// fresh mapping and a [`Diagnostic::StructuralOverwrite`] is recorded; when
/// the final segment is already set the later field wins and a
/// [`Diagnostic::FieldCollision`] is recorded.
///
/// # Examples
///
/// ```rust
/// use keepass_inventory_core::diagnostics::Diagnostics;
/// use keepass_inventory_core::field_map::{map_fields, FieldMap, Fields};
/// use serde_json::json;
///
/// let fields: Fields = [("password", "p"), ("title", "x")].into_iter().collect();
/// let map = FieldMap::new()
///     .with("password", Some("login.password"))
///     .with("title", None);
///
/// let mut diagnostics = Diagnostics::new();
/// let vars = map_fields(&fields, &map, &mut diagnostics);
/// assert_eq!(serde_json::Value::Object(vars), json!({"login": {"password": "p"}}));
/// assert!(diagnostics.is_empty());
/// ```
pub fn map_fields(fields: &Fields, map: &FieldMap, diagnostics: &mut Diagnostics) -> Vars {
    let mut vars = Vars::new();
    for (field, value) in fields.iter() {
        let segments: Vec<&str> = match map.destination(field) {
            Destination::Dropped => continue,
            Destination::Identity => vec![field],
            Destination::Path(path) => path.split('.').collect(),
        };
        insert_at(&mut vars, &segments, field, value, diagnostics);
    }
    vars
}

fn insert_at(
    vars: &mut Vars,
    segments: &[&str],
    field: &str,
    value: &str,
    diagnostics: &mut Diagnostics,
) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = vars;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = current
            .entry(*segment)
            .or_insert_with(|| Value::Object(Vars::new()));
        if !slot.is_object() {
            diagnostics.record(Diagnostic::StructuralOverwrite {
                path: segments[..=depth].join("."),
                field: field.to_owned(),
            });
            *slot = Value::Object(Vars::new());
        }
        current = match slot {
            Value::Object(next) => next,
            _ => return,
        };
    }

    if current
        .insert((*last).to_owned(), Value::String(value.to_owned()))
        .is_some()
    {
        diagnostics.record(Diagnostic::FieldCollision {
            path: segments.join("."),
            field: field.to_owned(),
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
