// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Opening vault documents.
//!
//! A [`VaultReader`] turns a file on disk into a decrypted
//! [`Tree`].  [`open_vault`] drives a reader through the candidate secrets
//! of a [`CredentialSource`] until one of them unlocks the document.
//!
//! ```text
//! verify_file(path)
//! open_vault(reader, path, credentials)
//!   for secret in credentials.candidates():
//!     reader.read(path, secret)
//!       Ok(tree)                -> done
//!       Err(InvalidCredential)  -> next secret
//!       Err(other)              -> fail
//! ```

pub mod xml;

use std::fmt;
use std::path::{Path, PathBuf};

use keepass_inventory_core::Tree;
use thiserror::Error;
use tracing::{debug, info};

use crate::credentials::CredentialSource;

pub use xml::{XmlParseError, XmlVaultReader};

/// File extensions accepted by [`verify_file`].
pub const VAULT_EXTENSIONS: [&str; 3] = ["kdb", "kdbx", "xml"];

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// A candidate vault password together with where it came from.
///
/// The value never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    origin: String,
    value: String,
}

impl Secret {
    pub fn new(origin: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            value: value.into(),
        }
    }

    /// The secret used for readers that need no password.
    pub fn empty() -> Self {
        Self::new("none", "")
    }

    /// Name of the source this secret was read from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("origin", &self.origin)
            .field("value", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while locating, unlocking or reading a vault.
///
/// Only [`VaultError::InvalidCredential`] is retryable.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("\"{}\" is not a KeePass vault (expected one of .kdb, .kdbx, .xml)", .path.display())]
    UnsupportedFile { path: PathBuf },

    /// The file is a vault, but no available reader understands it.
    #[error("no reader available for \"{}\"; export the vault to KeePass XML first", .path.display())]
    NoReader { path: PathBuf },

    #[error("vault \"{}\" does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read vault \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("vault \"{}\" is not well-formed XML: {source}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("vault \"{}\" is malformed: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// The secret did not unlock the vault.
    #[error("the credential from {origin} does not unlock \"{}\"", .path.display())]
    InvalidCredential { path: PathBuf, origin: String },

    #[error("could not get a KeePass password: none of {} is set", .sources.join(", "))]
    NoCredential { sources: Vec<String> },

    #[error("none of the {tried} candidate credential(s) unlocks \"{}\"", .path.display())]
    CredentialsExhausted { path: PathBuf, tried: usize },
}

impl VaultError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, VaultError::InvalidCredential { .. })
    }
}

// ---------------------------------------------------------------------------
// Reader trait
// ---------------------------------------------------------------------------

/// Something that can decrypt a vault file into a [`Tree`].
pub trait VaultReader {
    /// Whether [`VaultReader::read`] uses the secret at all.
    ///
    /// Readers that return `false` are called once with
    /// [`Secret::empty`].
    fn needs_credential(&self) -> bool {
        true
    }

    /// Whether this reader understands the file at `path`.
    fn accepts(&self, path: &Path) -> bool;

    /// Decrypt and parse the vault.
    ///
    /// # Errors
    ///
    /// [`VaultError::InvalidCredential`] when `secret` is wrong; any other
    /// variant when the file itself is unusable.
    fn read(&self, path: &Path, secret: &Secret) -> Result<Tree, VaultError>;
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Check that `path` exists and carries a vault extension.
///
/// ```rust
/// use keepass_inventory_std::vault::{verify_file, VaultError};
///
/// let error = verify_file("inventory.yml").unwrap_err();
/// assert!(matches!(error, VaultError::UnsupportedFile { .. }));
/// ```
pub fn verify_file<P: AsRef<Path>>(path: P) -> Result<(), VaultError> {
    let path = path.as_ref();
    if !has_vault_extension(path) {
        return Err(VaultError::UnsupportedFile {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(VaultError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Open the vault at `path`, trying each candidate secret in order.
///
/// # Errors
///
/// - [`VaultError::NoCredential`] when the reader needs a password and the
///   source has none.
/// - [`VaultError::CredentialsExhausted`] when every candidate was rejected.
/// - Any non-retryable reader error, as soon as it happens.
pub fn open_vault<R, C>(reader: &R, path: &Path, credentials: &C) -> Result<Tree, VaultError>
where
    R: VaultReader + ?Sized,
    C: CredentialSource + ?Sized,
{
    if !reader.accepts(path) {
        return Err(VaultError::NoReader {
            path: path.to_path_buf(),
        });
    }

    if !reader.needs_credential() {
        debug!(path = %path.display(), "reading vault without a credential");
        return reader.read(path, &Secret::empty());
    }

    let candidates = credentials.candidates();
    if candidates.is_empty() {
        return Err(VaultError::NoCredential {
            sources: credentials.describe(),
        });
    }

    let tried = candidates.len();
    for secret in &candidates {
        match reader.read(path, secret) {
            Ok(tree) => {
                info!(path = %path.display(), origin = secret.origin(), "vault opened");
                return Ok(tree);
            }
            Err(error) if error.is_retryable() => {
                debug!(origin = secret.origin(), "credential rejected, trying the next one");
            }
            Err(error) => return Err(error),
        }
    }

    Err(VaultError::CredentialsExhausted {
        path: path.to_path_buf(),
        tried,
    })
}

fn has_vault_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            VAULT_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
