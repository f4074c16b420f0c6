// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Engine configuration and its resolution.
//!
//! [`EffectiveConfig`] is the single value the walker reads.  It is built
//! once by [`resolve`] from three layers, lowest precedence first:
//!
//! 1. compiled-in defaults ([`EffectiveConfig::default`])
//! 2. the structured notes of the vault description, which only become
//!    readable after decryption
//! 3. explicit caller overrides ([`ConfigOverrides`])
//!
//! A key set by a higher layer replaces the lower layer's value for that
//! key as a whole.  Nothing mutates the configuration once a walk starts.
//!
//! # Embedded configuration
//!
//! ```yaml
//! ---
//! ignore_groups: [Recycle Bin, Personal]
//! default_group: ungrouped
//! host_field_map:
//!   username: ansible_user
//!   password: ansible_password
//!   url: ~
//! vars_field_map: {}
//! symgroup_field_map: {}
//! candidate_credential_sources: [KEEPASS_PW]
//! ```

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{InventoryError, Result};
use crate::field_map::FieldMap;
use crate::notes::parse_notes;
use crate::types::{value_kind, Value};

/// Environment variables consulted for the vault password, in order.
pub const DEFAULT_CREDENTIAL_SOURCES: [&str; 2] = ["RD_OPTION_KEEPASS_PW", "KEEPASS_PW"];

/// Group that stands in for the document root.
pub const DEFAULT_GROUP: &str = "ungrouped";

// ---------------------------------------------------------------------------
// EffectiveConfig
// ---------------------------------------------------------------------------

/// The resolved configuration a walk runs with.
///
/// # Examples
///
/// ```rust
/// use keepass_inventory_core::config::EffectiveConfig;
///
/// let config = EffectiveConfig {
///     default_group: "all".into(),
///     ..EffectiveConfig::default()
/// };
/// assert!(!config.is_ignored("web"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Group names whose whole subtree is left out.  Matched exactly.
    pub ignore_groups: BTreeSet<String>,

    /// Field map for `@host` entries.
    pub host_field_map: FieldMap,

    /// Field map for `:vars` entries.
    pub vars_field_map: FieldMap,

    /// Field map for `%group` entries.
    pub symgroup_field_map: FieldMap,

    /// Environment variable names holding candidate vault passwords,
    /// highest priority first.
    pub candidate_credential_sources: Vec<String>,

    /// Group used where an entry has no enclosing group: root-level `:vars`
    /// entries store their bundle here and renderers list group-less hosts
    /// under it.
    pub default_group: String,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        let excluded = FieldMap::new().with("title", None).with("notes", None);
        Self {
            ignore_groups: BTreeSet::new(),
            host_field_map: excluded
                .clone()
                .with("username", Some("ansible_user"))
                .with("password", Some("ansible_password")),
            vars_field_map: excluded.clone(),
            symgroup_field_map: excluded,
            candidate_credential_sources: DEFAULT_CREDENTIAL_SOURCES
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
            default_group: DEFAULT_GROUP.to_owned(),
        }
    }
}

impl EffectiveConfig {
    pub fn is_ignored(&self, group: &str) -> bool {
        self.ignore_groups.contains(group)
    }

    /// Apply every override that is set.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(ignore_groups) = &overrides.ignore_groups {
            self.ignore_groups = ignore_groups.clone();
        }
        if let Some(map) = &overrides.host_field_map {
            self.host_field_map = map.clone();
        }
        if let Some(map) = &overrides.vars_field_map {
            self.vars_field_map = map.clone();
        }
        if let Some(map) = &overrides.symgroup_field_map {
            self.symgroup_field_map = map.clone();
        }
        if let Some(sources) = &overrides.candidate_credential_sources {
            self.candidate_credential_sources = sources.clone();
        }
        if let Some(group) = &overrides.default_group {
            self.default_group = group.clone();
        }
        self
    }

    /// Apply one key of the embedded vault configuration.
    ///
    /// Returns `Ok(false)` for keys this version does not know.
    fn apply_document_key(&mut self, key: &str, value: Value) -> std::result::Result<bool, ConfigError> {
        match key {
            "ignore_groups" => self.ignore_groups = typed(key, value)?,
            "host_field_map" => self.host_field_map = typed(key, value)?,
            "vars_field_map" => self.vars_field_map = typed(key, value)?,
            "symgroup_field_map" => self.symgroup_field_map = typed(key, value)?,
            "candidate_credential_sources" => self.candidate_credential_sources = typed(key, value)?,
            "default_group" => self.default_group = typed(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn typed<T: DeserializeOwned>(key: &str, value: Value) -> std::result::Result<T, ConfigError> {
    let found = value_kind(&value);
    serde_json::from_value(value).map_err(|error| ConfigError::InvalidValue {
        key: key.to_owned(),
        reason: format!("{error} (found {found})"),
    })
}

// ---------------------------------------------------------------------------
// ConfigOverrides
// ---------------------------------------------------------------------------

/// Caller-supplied configuration.  Every field is optional; a `Some`
/// replaces whatever the lower layers produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub ignore_groups: Option<BTreeSet<String>>,
    pub host_field_map: Option<FieldMap>,
    pub vars_field_map: Option<FieldMap>,
    pub symgroup_field_map: Option<FieldMap>,
    pub candidate_credential_sources: Option<Vec<String>>,
    pub default_group: Option<String>,
}

impl ConfigOverrides {
    /// Combine two override sets; fields set in `higher` win.
    pub fn merge(self, higher: ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            ignore_groups: higher.ignore_groups.or(self.ignore_groups),
            host_field_map: higher.host_field_map.or(self.host_field_map),
            vars_field_map: higher.vars_field_map.or(self.vars_field_map),
            symgroup_field_map: higher.symgroup_field_map.or(self.symgroup_field_map),
            candidate_credential_sources: higher
                .candidate_credential_sources
                .or(self.candidate_credential_sources),
            default_group: higher.default_group.or(self.default_group),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A configuration value that cannot be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A known key of the embedded vault configuration has the wrong shape.
    #[error("vault configuration key '{key}' is invalid: {reason}")]
    InvalidValue { key: String, reason: String },
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Output of [`resolve`].
#[derive(Debug, Clone)]
pub struct Resolution {
    pub config: EffectiveConfig,
    /// Warnings such as unknown embedded keys.
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the [`EffectiveConfig`] for a walk.
///
/// `document_notes` is the vault description; it only contributes when it
/// carries the structured-notes marker.
///
/// # Errors
///
/// * [`InventoryError::Notes`]: the description is marked as structured
///   but is not a YAML mapping
/// * [`InventoryError::Config`]: a known key has a value of the wrong shape
///
/// Unknown keys are not errors; each one yields a
/// [`Diagnostic::UnknownConfigKey`].
///
/// # Examples
///
/// ```rust
/// use keepass_inventory_core::config::{resolve, ConfigOverrides, EffectiveConfig};
///
/// let overrides = ConfigOverrides {
///     default_group: Some("all".into()),
///     ..ConfigOverrides::default()
/// };
/// let resolution = resolve(
///     EffectiveConfig::default(),
///     Some("---\nignore_groups: [Recycle Bin]\ndefault_group: misc"),
///     &overrides,
/// )
/// .unwrap();
///
/// assert!(resolution.config.is_ignored("Recycle Bin"));
/// assert_eq!(resolution.config.default_group, "all");
/// ```
pub fn resolve(
    defaults: EffectiveConfig,
    document_notes: Option<&str>,
    overrides: &ConfigOverrides,
) -> Result<Resolution> {
    let mut config = defaults;
    let mut diagnostics = Diagnostics::new();

    let embedded = parse_notes(document_notes).map_err(|source| InventoryError::Notes {
        owner: "the vault description".into(),
        source,
    })?;

    if let Some(embedded) = embedded {
        debug!(keys = embedded.len(), "applying embedded vault configuration");
        for (key, value) in embedded {
            if !config.apply_document_key(&key, value)? {
                diagnostics.record(Diagnostic::UnknownConfigKey { key });
            }
        }
    }

    let config = config.with_overrides(overrides);
    debug!(?config, "resolved configuration");

    Ok(Resolution {
        config,
        diagnostics: diagnostics.into_vec(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
