// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! `keepass-inventory`: print an Ansible dynamic inventory read from a
//! KeePass vault.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use keepass_inventory_core::config_loader::{load_overrides, load_overrides_from_env};
use keepass_inventory_core::ConfigOverrides;
use keepass_inventory_std::pipeline::credential_source;
use keepass_inventory_std::{load_inventory, render_host, render_inventory, XmlVaultReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keepass-inventory")]
#[command(version, about = "Ansible dynamic inventory backed by a KeePass vault")]
struct Cli {
    /// Print the whole inventory (the default)
    #[arg(long, conflicts_with = "host")]
    list: bool,

    /// Print the variables of a single host
    #[arg(long, value_name = "NAME")]
    host: Option<String>,

    /// TOML file with configuration overrides
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Group to skip together with everything below it (repeatable)
    #[arg(long = "ignore-group", value_name = "GROUP")]
    ignore_groups: Vec<String>,

    /// Group that receives hosts and variables found outside any group
    #[arg(long, value_name = "GROUP")]
    default_group: Option<String>,

    /// Environment variable holding the vault password (repeatable, tried in order)
    #[arg(long = "password-env", value_name = "VAR")]
    password_env: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Vault file (.kdb, .kdbx or a decrypted .xml export)
    vault: PathBuf,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            ignore_groups: (!self.ignore_groups.is_empty())
                .then(|| self.ignore_groups.iter().cloned().collect()),
            candidate_credential_sources: (!self.password_env.is_empty())
                .then(|| self.password_env.clone()),
            default_group: self.default_group.clone(),
            ..ConfigOverrides::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut overrides = match &cli.config {
        Some(path) => load_overrides(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ConfigOverrides::default(),
    };
    overrides = overrides
        .merge(load_overrides_from_env().context("reading configuration from the environment")?)
        .merge(cli.overrides());

    let credentials = credential_source(&overrides);
    let loaded = load_inventory(&XmlVaultReader::new(), &cli.vault, &credentials, &overrides)
        .with_context(|| format!("building inventory from {}", cli.vault.display()))?;

    let output = match &cli.host {
        Some(name) => render_host(&loaded.inventory, name),
        None => render_inventory(&loaded.inventory, &loaded.config.default_group),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("serialising inventory")?
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
