// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! # keepass-inventory-std
//!
//! The `std` side of `keepass-inventory-core`: opening vault files,
//! collecting candidate passwords, rendering Ansible JSON, and the
//! `keepass-inventory` command-line tool.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use keepass_inventory_core::ConfigOverrides;
//! use keepass_inventory_std::{load_inventory, render_inventory, EnvCredentialSource, XmlVaultReader};
//!
//! let overrides = ConfigOverrides::default();
//! let loaded = load_inventory(
//!     &XmlVaultReader::new(),
//!     Path::new("/srv/ops/vault.xml"),
//!     &EnvCredentialSource::default(),
//!     &overrides,
//! )
//! .expect("vault should load");
//!
//! let json = render_inventory(&loaded.inventory, &loaded.config.default_group);
//! println!("{json:#}");
//! ```

pub mod credentials;
pub mod pipeline;
pub mod render;
pub mod vault;

pub use credentials::{CredentialSource, EnvCredentialSource};
pub use pipeline::{load_inventory, LoadedInventory, PipelineError};
pub use render::{render_host, render_inventory};
pub use vault::{open_vault, verify_file, Secret, VaultError, VaultReader, XmlVaultReader};
