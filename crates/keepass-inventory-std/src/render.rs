// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Rendering an [`Inventory`] as Ansible dynamic-inventory JSON.
//!
//! `--list` output has the shape:
//!
//! ```json
//! {
//!   "web":       { "hosts": ["web01"], "children": ["db"], "vars": { ... } },
//!   "ungrouped": { "hosts": ["lonely"] },
//!   "_meta":     { "hostvars": { "web01": { ... } } }
//! }
//! ```
//!
//! Empty `hosts`, `children` and `vars` are left out.

use keepass_inventory_core::{Group, Inventory, Value, Vars};
use serde_json::Map;

/// Key of the host variables section.
pub const META_KEY: &str = "_meta";

/// Render the whole inventory for `--list`.
///
/// Hosts that belong to no group are listed under `default_group`.
///
/// ```rust
/// use keepass_inventory_core::Inventory;
/// use keepass_inventory_std::render::render_inventory;
/// use serde_json::json;
///
/// let mut inventory = Inventory::new();
/// inventory.add_host_to_group("web", "web01");
/// inventory.add_host("lonely");
///
/// let rendered = render_inventory(&inventory, "ungrouped");
/// assert_eq!(rendered["web"], json!({"hosts": ["web01"]}));
/// assert_eq!(rendered["ungrouped"], json!({"hosts": ["lonely"]}));
/// assert_eq!(rendered["_meta"]["hostvars"]["web01"], json!({}));
/// ```
pub fn render_inventory(inventory: &Inventory, default_group: &str) -> Value {
    let mut output = Map::new();
    for group in inventory.groups() {
        output.insert(group.name.clone(), render_group(group, &[]));
    }

    let ungrouped: Vec<String> = inventory
        .ungrouped_hosts()
        .map(|host| host.name.clone())
        .collect();
    if !ungrouped.is_empty() {
        let rendered = match inventory.group(default_group) {
            Some(group) => render_group(group, &ungrouped),
            None => render_group(&Group::default(), &ungrouped),
        };
        output.insert(default_group.to_owned(), rendered);
    }

    let hostvars: Map<String, Value> = inventory
        .hosts()
        .map(|host| (host.name.clone(), Value::Object(host.vars.clone())))
        .collect();
    let mut meta = Map::new();
    meta.insert("hostvars".to_owned(), Value::Object(hostvars));
    output.insert(META_KEY.to_owned(), Value::Object(meta));

    Value::Object(output)
}

/// Render one host's variables for `--host NAME`.
///
/// Unknown hosts render as an empty object.
pub fn render_host(inventory: &Inventory, name: &str) -> Value {
    Value::Object(
        inventory
            .host(name)
            .map(|host| host.vars.clone())
            .unwrap_or_default(),
    )
}

fn render_group(group: &Group, extra_hosts: &[String]) -> Value {
    let mut rendered = Vars::new();

    let mut hosts = group.hosts.clone();
    for host in extra_hosts {
        if !hosts.contains(host) {
            hosts.push(host.clone());
        }
    }
    if !hosts.is_empty() {
        rendered.insert("hosts".to_owned(), strings(hosts));
    }
    if !group.children.is_empty() {
        rendered.insert("children".to_owned(), strings(group.children.clone()));
    }
    if !group.vars.is_empty() {
        rendered.insert("vars".to_owned(), Value::Object(group.vars.clone()));
    }
    Value::Object(rendered)
}

fn strings(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}
