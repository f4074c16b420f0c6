// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Fatal error types.
//!
//! Anything that can be reported and skipped is a
//! [`Diagnostic`](crate::diagnostics::Diagnostic) instead.

use thiserror::Error;

use crate::config::ConfigError;

/// Failure while interpreting a notes field.
#[derive(Error, Debug)]
pub enum NotesError {
    /// The text starts with the `---` marker but is not valid YAML.
    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The text is valid YAML but its top level is not a mapping.
    #[error("expected a mapping at the top level, found {found}")]
    NotAMapping { found: &'static str },
}

/// Errors that abort a walk or a configuration resolution.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// A group node has no `Name`.
    #[error("group without a name (inside {})", .parent.as_deref().unwrap_or("the document root"))]
    MissingGroupName { parent: Option<String> },

    /// Notes marked as structured data could not be parsed.
    #[error("invalid notes on {owner}: {source}")]
    Notes {
        owner: String,
        #[source]
        source: NotesError,
    },

    /// The effective configuration could not be built.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, InventoryError>;
