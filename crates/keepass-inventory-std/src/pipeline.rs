// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! From a vault path to a finished inventory.
//!
//! Configuration is resolved twice.  The credential candidates must be
//! known before decryption, so they come from the compiled-in defaults and
//! the caller's overrides only.  Once the vault is open its description can
//! contribute, and the full [`resolve`] runs.

use std::path::Path;

use keepass_inventory_core::{
    resolve, walk, ConfigOverrides, Diagnostic, EffectiveConfig, Inventory, InventoryError,
};
use thiserror::Error;
use tracing::info;

use crate::credentials::{CredentialSource, EnvCredentialSource};
use crate::vault::{open_vault, verify_file, VaultError, VaultReader};

/// Any fatal failure of [`load_inventory`].
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Result of a successful load.
#[derive(Debug)]
pub struct LoadedInventory {
    pub inventory: Inventory,
    pub config: EffectiveConfig,
    /// Configuration warnings first, then walk warnings.
    pub diagnostics: Vec<Diagnostic>,
}

/// The configuration available before the vault is decrypted.
pub fn pre_decryption_config(overrides: &ConfigOverrides) -> EffectiveConfig {
    EffectiveConfig::default().with_overrides(overrides)
}

/// Environment credential source for the given overrides.
pub fn credential_source(overrides: &ConfigOverrides) -> EnvCredentialSource {
    EnvCredentialSource::from_config(&pre_decryption_config(overrides))
}

/// Open, resolve and walk the vault at `path`.
///
/// # Errors
///
/// [`PipelineError::Vault`] when the file cannot be opened,
/// [`PipelineError::Inventory`] when its content is unusable.
pub fn load_inventory<R, C>(
    reader: &R,
    path: &Path,
    credentials: &C,
    overrides: &ConfigOverrides,
) -> Result<LoadedInventory, PipelineError>
where
    R: VaultReader + ?Sized,
    C: CredentialSource + ?Sized,
{
    verify_file(path)?;
    let tree = open_vault(reader, path, credentials)?;

    let resolution = resolve(EffectiveConfig::default(), tree.description(), overrides)?;
    let walked = walk(&tree, &resolution.config)?;

    let mut diagnostics = resolution.diagnostics;
    diagnostics.extend(walked.diagnostics);
    info!(
        path = %path.display(),
        warnings = diagnostics.len(),
        "inventory loaded"
    );

    Ok(LoadedInventory {
        inventory: walked.inventory,
        config: resolution.config,
        diagnostics,
    })
}
