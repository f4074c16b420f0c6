// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! # keepass-inventory-core
//!
//! Turns a decrypted KeePass document into an inventory graph: named
//! groups, parent/child edges between them, hosts, and nested variables on
//! both.
//!
//! The crate never decrypts, reads environment variables (outside the
//! optional `config-loader` feature) or prints.  It takes a [`Tree`] and an
//! [`EffectiveConfig`] and returns an [`Inventory`] plus the
//! [`Diagnostic`]s recorded on the way.
//!
//! ## Architecture
//!
//! ```text
//! resolve(defaults, vault description, overrides) -> EffectiveConfig
//! walk(Tree, EffectiveConfig)
//!   ├── classify    : entry title prefix -> host / group vars / symbolic group
//!   ├── parse_notes : "---" notes -> YAML mapping
//!   ├── map_fields  : flat fields -> nested vars via dotted paths
//!   └── Inventory   : name-keyed groups and hosts, idempotent inserts
//! ```
//!
//! ## Entry titles
//!
//! | Title      | Meaning                                                      |
//! |------------|--------------------------------------------------------------|
//! | `@web01`   | host `web01`, member of the enclosing group                  |
//! | `:ntp`     | variable `ntp` on the enclosing group                        |
//! | `%backup`  | group `backup` linked under the enclosing group              |
//! | other      | not inventory data                                           |
//!
//! ## Quick Start
//!
//! ```rust
//! use keepass_inventory_core::{
//!     config::{resolve, ConfigOverrides, EffectiveConfig},
//!     tree::{Element, EntryNode, GroupNode, Tag, Tree},
//!     walker::walk,
//! };
//!
//! let tree = Tree::new(
//!     Element::new(Tag::Root).with_child(
//!         GroupNode::new("web")
//!             .with_notes("---\nhttp_port: 8080")
//!             .with_child(EntryNode::titled("@web01").with_field("UserName", "deploy")),
//!     ),
//! );
//!
//! let resolution = resolve(
//!     EffectiveConfig::default(),
//!     tree.description(),
//!     &ConfigOverrides::default(),
//! )
//! .unwrap();
//! let walk = walk(&tree, &resolution.config).unwrap();
//!
//! let web = walk.inventory.group("web").unwrap();
//! assert_eq!(web.hosts, vec!["web01"]);
//! assert_eq!(web.vars["http_port"], 8080);
//! ```

pub mod classify;
pub mod config;
pub mod config_loader;
pub mod diagnostics;
pub mod error;
pub mod field_map;
pub mod inventory;
pub mod notes;
pub mod tree;
pub mod types;
pub mod walker;

// Re-export the most commonly used items at the crate root so consumers can
// write `use keepass_inventory_core::walk;` instead of the fully qualified
// path.
pub use config::{resolve, ConfigOverrides, EffectiveConfig, Resolution};
pub use diagnostics::Diagnostic;
pub use error::{InventoryError, NotesError};
pub use inventory::{Group, Host, Inventory};
pub use tree::Tree;
pub use types::{Role, Value, Vars};
pub use walker::{walk, Walk};
