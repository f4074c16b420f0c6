// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! The inventory graph produced by a walk.
//!
//! Groups and hosts are identified by name only.  Every insertion is
//! idempotent: adding a group, host, child edge or group membership that
//! already exists changes nothing.  Variables are last-write-wins unless
//! set through [`Inventory::set_group_var_if_absent`].
//!
//! Iteration follows first-insertion order.

use hashbrown::HashMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::types::{Value, Vars};

/// One inventory group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Group {
    #[serde(skip)]
    pub name: String,
    /// Child group names, first-seen order, no duplicates.
    pub children: Vec<String>,
    /// Member host names, first-seen order, no duplicates.
    pub hosts: Vec<String>,
    pub vars: Vars,
}

impl Group {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }
}

/// One inventory host.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Host {
    #[serde(skip)]
    pub name: String,
    pub vars: Vars,
}

/// Name-indexed groups and hosts.
///
/// Records live in insertion-ordered vectors; a
/// [`hashbrown::HashMap`] maps each name to its slot.
///
/// # Examples
///
/// ```rust
/// use keepass_inventory_core::inventory::Inventory;
///
/// let mut inventory = Inventory::new();
/// inventory.add_child("web", "frontend");
/// inventory.add_child("web", "frontend");
/// inventory.add_host_to_group("frontend", "web01");
///
/// assert_eq!(inventory.group("web").unwrap().children, vec!["frontend"]);
/// assert_eq!(inventory.group("frontend").unwrap().hosts, vec!["web01"]);
/// assert!(inventory.host("web01").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    groups: Vec<Group>,
    group_index: HashMap<String, usize>,
    hosts: Vec<Host>,
    host_index: HashMap<String, usize>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Return the group called `name`, creating it if needed.
    pub fn add_group(&mut self, name: &str) -> &mut Group {
        let index = match self.group_index.get(name).copied() {
            Some(index) => index,
            None => {
                self.groups.push(Group::new(name));
                self.group_index.insert(name.to_owned(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.group_index.get(name).map(|&index| &self.groups[index])
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.group_index.contains_key(name)
    }

    /// Record a `parent → child` edge, creating either group if needed.
    ///
    /// Cycles are not rejected.
    pub fn add_child(&mut self, parent: &str, child: &str) {
        self.add_group(child);
        push_unique(&mut self.add_group(parent).children, child);
    }

    /// Overwrite (or set) a group variable.
    pub fn set_group_var(&mut self, group: &str, key: &str, value: Value) {
        self.add_group(group).vars.insert(key.to_owned(), value);
    }

    /// Set a group variable only if the group does not hold `key` yet.
    ///
    /// Returns whether the value was written.
    pub fn set_group_var_if_absent(&mut self, group: &str, key: &str, value: Value) -> bool {
        let vars = &mut self.add_group(group).vars;
        if vars.contains_key(key) {
            return false;
        }
        vars.insert(key.to_owned(), value);
        true
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    // ------------------------------------------------------------------
    // Hosts
    // ------------------------------------------------------------------

    /// Return the host called `name`, creating it if needed.
    pub fn add_host(&mut self, name: &str) -> &mut Host {
        let index = match self.host_index.get(name).copied() {
            Some(index) => index,
            None => {
                self.hosts.push(Host {
                    name: name.to_owned(),
                    vars: Vars::new(),
                });
                self.host_index.insert(name.to_owned(), self.hosts.len() - 1);
                self.hosts.len() - 1
            }
        };
        &mut self.hosts[index]
    }

    pub fn host(&self, name: &str) -> Option<&Host> {
        self.host_index.get(name).map(|&index| &self.hosts[index])
    }

    /// Make `host` a member of `group`, creating either if needed.
    pub fn add_host_to_group(&mut self, group: &str, host: &str) {
        self.add_host(host);
        push_unique(&mut self.add_group(group).hosts, host);
    }

    /// Overwrite (or set) a host variable.
    pub fn set_host_var(&mut self, host: &str, key: &str, value: Value) {
        self.add_host(host).vars.insert(key.to_owned(), value);
    }

    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.hosts.iter()
    }

    /// Hosts that belong to no group.
    pub fn ungrouped_hosts(&self) -> impl Iterator<Item = &Host> {
        self.hosts.iter().filter(move |host| {
            !self
                .groups
                .iter()
                .any(|group| group.hosts.iter().any(|member| *member == host.name))
        })
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_owned());
    }
}

trait Named {
    fn name(&self) -> &str;
}

impl Named for Group {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Host {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A record slice serialised as a name-keyed map.
struct ByName<'a, T>(&'a [T]);

impl<T: Named + Serialize> Serialize for ByName<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for item in self.0 {
            map.serialize_entry(item.name(), item)?;
        }
        map.end()
    }
}

/// Serialises as `{"groups": {name: group}, "hosts": {name: host}}`.
impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("groups", &ByName(&self.groups))?;
        map.serialize_entry("hosts", &ByName(&self.hosts))?;
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
