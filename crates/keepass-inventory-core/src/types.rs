// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Shared data types used across the engine.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A nested variable value: string, number, bool, null, ordered sequence or
/// ordered string-keyed map.
pub use serde_json::Value;

/// An ordered string-keyed variable mapping.
///
/// Insertion order is preserved so rendered inventories follow document
/// order.
pub type Vars = serde_json::Map<String, Value>;

/// The inventory role an entry plays, decided by the first character of
/// its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// `@name`: declares a host.
    Host,
    /// `:name`: a bundle of variables stored on the enclosing group.
    GroupVars,
    /// `%name`: links a group into the enclosing group without
    /// overriding its own definition.
    SymbolicGroup,
}

impl Role {
    /// Title prefix that selects this role.
    pub fn marker(self) -> char {
        match self {
            Role::Host => '@',
            Role::GroupVars => ':',
            Role::SymbolicGroup => '%',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => write!(f, "host"),
            Role::GroupVars => write!(f, "group variables"),
            Role::SymbolicGroup => write!(f, "symbolic group"),
        }
    }
}

/// Short name of a value's type, for messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
