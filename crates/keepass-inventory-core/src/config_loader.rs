// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Loading [`ConfigOverrides`] from outside the vault.
//!
//! Supports two load strategies:
//!
//! 1. **TOML file**: [`load_overrides`] reads and deserialises a TOML file.
//! 2. **Environment variables**: [`load_overrides_from_env`] reads
//!    `KEEPASS_INVENTORY_`-prefixed variables.
//!
//! Both are only available with the `config-loader` feature.
//!
//! # File format
//!
//! ```toml
//! ignore_groups = ["Recycle Bin"]
//! default_group = "ungrouped"
//! candidate_credential_sources = ["KEEPASS_PW"]
//!
//! [host_field_map]
//! username = "ansible_user"
//! password = "ansible_password"
//! url      = ""        # TOML has no null: an empty path drops the field
//! ```
//!
//! # Environment variables
//!
//! | Variable                            | Meaning                          |
//! |-------------------------------------|----------------------------------|
//! | `KEEPASS_INVENTORY_IGNORE_GROUPS`   | comma-separated group names      |
//! | `KEEPASS_INVENTORY_DEFAULT_GROUP`   | default group name               |
//! | `KEEPASS_INVENTORY_PASSWORD_ENV`    | comma-separated variable names   |

// "config-loader" gates this whole module.
#![cfg(feature = "config-loader")]

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::ConfigOverrides;

pub const ENV_IGNORE_GROUPS: &str = "KEEPASS_INVENTORY_IGNORE_GROUPS";
pub const ENV_DEFAULT_GROUP: &str = "KEEPASS_INVENTORY_DEFAULT_GROUP";
pub const ENV_PASSWORD_ENV: &str = "KEEPASS_INVENTORY_PASSWORD_ENV";

/// Errors that can occur while loading overrides.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read config file \"{}\": {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content does not match the override schema.
    #[error("failed to parse TOML config \"{}\": {source}", .path.display())]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An environment variable is set but unusable.
    #[error("environment variable {field}: cannot use \"{value}\": {reason}")]
    ParseField {
        field: String,
        value: String,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// TOML loader
// ---------------------------------------------------------------------------

/// Load [`ConfigOverrides`] from a TOML file.
///
/// Unknown keys are rejected so that typos do not go unnoticed.
///
/// # Example
///
/// ```rust,no_run
/// use keepass_inventory_core::config_loader::load_overrides;
///
/// let overrides = load_overrides("/etc/keepass-inventory.toml").unwrap();
/// println!("default group: {:?}", overrides.default_group);
/// ```
pub fn load_overrides<P: AsRef<Path>>(path: P) -> Result<ConfigOverrides, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let overrides = toml::from_str::<ConfigOverrides>(&content).map_err(|source| {
        LoadError::TomlParse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), "loaded configuration overrides");
    Ok(overrides)
}

// ---------------------------------------------------------------------------
// Environment variable loader
// ---------------------------------------------------------------------------

/// Load [`ConfigOverrides`] from the process environment.
///
/// Unset variables leave the corresponding override unset.
pub fn load_overrides_from_env() -> Result<ConfigOverrides, LoadError> {
    load_overrides_with(|key| std::env::var(key).ok())
}

/// Load [`ConfigOverrides`] through an arbitrary variable lookup.
///
/// ```rust
/// use keepass_inventory_core::config_loader::load_overrides_with;
///
/// let overrides = load_overrides_with(|key| match key {
///     "KEEPASS_INVENTORY_IGNORE_GROUPS" => Some("Recycle Bin, Personal".into()),
///     _ => None,
/// })
/// .unwrap();
/// let ignored = overrides.ignore_groups.unwrap();
/// assert!(ignored.contains("Recycle Bin") && ignored.contains("Personal"));
/// ```
pub fn load_overrides_with<F>(lookup: F) -> Result<ConfigOverrides, LoadError>
where
    F: Fn(&str) -> Option<String>,
{
    let ignore_groups = read_list(&lookup, ENV_IGNORE_GROUPS)?.map(|names| names.into_iter().collect());
    let candidate_credential_sources = read_list(&lookup, ENV_PASSWORD_ENV)?;
    let default_group = match lookup(ENV_DEFAULT_GROUP) {
        Some(value) if value.trim().is_empty() => {
            return Err(LoadError::ParseField {
                field: ENV_DEFAULT_GROUP.into(),
                value,
                reason: "group name must not be empty".into(),
            })
        }
        Some(value) => Some(value.trim().to_owned()),
        None => None,
    };

    Ok(ConfigOverrides {
        ignore_groups,
        candidate_credential_sources,
        default_group,
        ..ConfigOverrides::default()
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn read_list<F>(lookup: &F, key: &str) -> Result<Option<Vec<String>>, LoadError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect();
    if items.is_empty() {
        return Err(LoadError::ParseField {
            field: key.to_owned(),
            value: raw,
            reason: "expected a comma-separated list with at least one item".into(),
        });
    }
    Ok(Some(items))
}
