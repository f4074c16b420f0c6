// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Recoverable problems found while building an inventory.
//!
//! [`Diagnostics`] exposes two operations only:
//!
//! * [`record`](Diagnostics::record): keep a [`Diagnostic`] and emit it as a
//!   `tracing` warning
//! * [`iter`](Diagnostics::iter): read back everything recorded so far
//!
//! Diagnostics are advisory.  Nothing recorded here stops a walk; fatal
//! conditions are [`InventoryError`](crate::error::InventoryError)s.

use core::fmt;

use serde::Serialize;
use tracing::warn;

use crate::types::Role;

/// One recoverable problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An entry has no `title` field and was ignored.
    MissingTitle { group: Option<String> },

    /// A prefixed entry has nothing after its marker and was ignored.
    MissingName { role: Role, title: String },

    /// Two fields were mapped to the same destination; the later one won.
    FieldCollision { path: String, field: String },

    /// A scalar sat where a mapping was needed and was replaced.
    StructuralOverwrite { path: String, field: String },

    /// Notes and mapped fields both defined a key; the notes value won.
    NotesFieldCollision { target: String, key: String },

    /// The embedded vault configuration contains a key the resolver does
    /// not know.
    UnknownConfigKey { key: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingTitle { group: Some(group) } => {
                write!(f, "entry without a title in group '{group}' ignored")
            }
            Diagnostic::MissingTitle { group: None } => {
                write!(f, "entry without a title at the document root ignored")
            }
            Diagnostic::MissingName { role, title } => {
                write!(f, "{role} entry '{title}' has no name after '{}', ignored", role.marker())
            }
            Diagnostic::FieldCollision { path, field } => {
                write!(f, "field '{field}' overwrites an earlier value at '{path}'")
            }
            Diagnostic::StructuralOverwrite { path, field } => write!(
                f,
                "field '{field}' replaces the scalar at '{path}' with a mapping"
            ),
            Diagnostic::NotesFieldCollision { target, key } => write!(
                f,
                "'{key}' on {target} is set by both notes and fields; using the notes value"
            ),
            Diagnostic::UnknownConfigKey { key } => {
                write!(f, "unknown key '{key}' in the vault configuration")
            }
        }
    }
}

/// Ordered collector of [`Diagnostic`]s.
///
/// # Examples
///
/// ```rust
/// use keepass_inventory_core::diagnostics::{Diagnostic, Diagnostics};
///
/// let mut diagnostics = Diagnostics::new();
/// diagnostics.record(Diagnostic::UnknownConfigKey { key: "colour".into() });
/// assert_eq!(diagnostics.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `diagnostic` and log it at `WARN`.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.records.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.record(diagnostic);
        }
    }
}
