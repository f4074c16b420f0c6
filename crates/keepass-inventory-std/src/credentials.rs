// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Where vault passwords come from.

use keepass_inventory_core::EffectiveConfig;
use tracing::debug;

use crate::vault::Secret;

/// An ordered supply of candidate vault passwords.
pub trait CredentialSource {
    /// Candidate secrets, highest priority first.
    fn candidates(&self) -> Vec<Secret>;

    /// Human-readable names of the places that were consulted.
    fn describe(&self) -> Vec<String>;
}

/// A fixed list of secrets, tried in order.
impl CredentialSource for Vec<Secret> {
    fn candidates(&self) -> Vec<Secret> {
        self.clone()
    }

    fn describe(&self) -> Vec<String> {
        self.iter().map(|secret| secret.origin().to_owned()).collect()
    }
}

/// Reads passwords from environment variables.
///
/// Unset and empty variables are skipped.
///
/// ```rust
/// use keepass_inventory_std::credentials::EnvCredentialSource;
///
/// let source = EnvCredentialSource::new(["VAULT_PW", "KEEPASS_PW"]);
/// let secrets = source.candidates_with(|name| match name {
///     "VAULT_PW" => Some(String::new()),
///     "KEEPASS_PW" => Some("hunter2".into()),
///     _ => None,
/// });
/// assert_eq!(secrets.len(), 1);
/// assert_eq!(secrets[0].origin(), "KEEPASS_PW");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvCredentialSource {
    variables: Vec<String>,
}

impl EnvCredentialSource {
    pub fn new<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }

    /// Use the configured `candidate_credential_sources`.
    pub fn from_config(config: &EffectiveConfig) -> Self {
        Self::new(config.candidate_credential_sources.iter().cloned())
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Resolve candidates through an arbitrary variable lookup.
    pub fn candidates_with<F>(&self, lookup: F) -> Vec<Secret>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.variables
            .iter()
            .filter_map(|name| match lookup(name) {
                Some(value) if !value.is_empty() => Some(Secret::new(name.as_str(), value)),
                Some(_) => {
                    debug!(variable = %name, "credential variable is empty, skipping");
                    None
                }
                None => {
                    debug!(variable = %name, "credential variable is unset, skipping");
                    None
                }
            })
            .collect()
    }
}

impl Default for EnvCredentialSource {
    fn default() -> Self {
        Self::from_config(&EffectiveConfig::default())
    }
}

impl CredentialSource for EnvCredentialSource {
    fn candidates(&self) -> Vec<Secret> {
        self.candidates_with(|name| std::env::var(name).ok())
    }

    fn describe(&self) -> Vec<String> {
        self.variables.clone()
    }
}
