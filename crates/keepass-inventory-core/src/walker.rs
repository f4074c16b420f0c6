// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Tree-to-inventory traversal.
//!
//! [`walk`] visits the decrypted tree depth-first in document order, a node
//! before its descendants.  Every node handler decides whether the walk
//! descends into the node:
//!
//! | Node                                   | Handling                         | Descend |
//! |----------------------------------------|----------------------------------|---------|
//! | group, not ignored                     | create, link, apply notes        | yes     |
//! | group, ignored                         | nothing                          | no      |
//! | entry                                  | classify by title and apply      | no      |
//! | `Meta`, `Times`, `DeletedObjects`, `History` | nothing                    | no      |
//! | anything else                          | nothing                          | yes     |
//!
//! The enclosing group's name is passed down the recursion, so "the
//! entry's immediate parent group" is simply the nearest group above it;
//! wrapper elements in between are transparent.

use tracing::{debug, info, trace};

use crate::classify::classify;
use crate::config::EffectiveConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{InventoryError, Result};
use crate::field_map::{map_fields, FieldMap, Fields};
use crate::inventory::Inventory;
use crate::notes::parse_notes;
use crate::tree::{EntryNode, GroupNode, Node, Tree};
use crate::types::{Role, Value, Vars};

/// Fields that never take part in field mapping.
const RESERVED_FIELDS: [&str; 2] = ["title", "notes"];

/// Result of a successful walk.
#[derive(Debug, Clone)]
pub struct Walk {
    pub inventory: Inventory,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the inventory for `tree`.
///
/// # Errors
///
/// * [`InventoryError::MissingGroupName`]: a group without a name
/// * [`InventoryError::Notes`]: notes marked as structured data that do not
///   parse to a mapping
///
/// # Examples
///
/// ```rust
/// use keepass_inventory_core::config::EffectiveConfig;
/// use keepass_inventory_core::tree::{Element, EntryNode, GroupNode, Tag, Tree};
/// use keepass_inventory_core::walker::walk;
///
/// let tree = Tree::new(
///     Element::new(Tag::Root).with_child(
///         GroupNode::new("web")
///             .with_child(EntryNode::titled("@web01").with_field("UserName", "deploy")),
///     ),
/// );
///
/// let walk = walk(&tree, &EffectiveConfig::default()).unwrap();
/// assert_eq!(walk.inventory.group("web").unwrap().hosts, vec!["web01"]);
/// assert_eq!(walk.inventory.host("web01").unwrap().vars["ansible_user"], "deploy");
/// ```
pub fn walk(tree: &Tree, config: &EffectiveConfig) -> Result<Walk> {
    TreeWalker::new(config).walk(tree)
}

/// Single-use traversal state: the configuration, the inventory under
/// construction and the diagnostics recorded so far.
pub struct TreeWalker<'c> {
    config: &'c EffectiveConfig,
    inventory: Inventory,
    diagnostics: Diagnostics,
}

impl<'c> TreeWalker<'c> {
    pub fn new(config: &'c EffectiveConfig) -> Self {
        Self {
            config,
            inventory: Inventory::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Consume the walker and produce the inventory.
    pub fn walk(mut self, tree: &Tree) -> Result<Walk> {
        self.visit(tree.root(), None)?;
        info!(
            groups = self.inventory.groups().count(),
            hosts = self.inventory.hosts().count(),
            warnings = self.diagnostics.len(),
            "inventory built"
        );
        Ok(Walk {
            inventory: self.inventory,
            diagnostics: self.diagnostics.into_vec(),
        })
    }

    fn visit(&mut self, node: &Node, parent: Option<&str>) -> Result<()> {
        match node {
            Node::Group(group) => {
                if let Some(name) = self.handle_group(group, parent)? {
                    for child in &group.children {
                        self.visit(child, Some(name))?;
                    }
                }
            }
            Node::Entry(entry) => self.handle_entry(entry, parent)?,
            Node::Element(element) if element.tag.is_reserved() => {
                trace!(tag = element.tag.name(), "skipping reserved subtree");
            }
            Node::Element(element) => {
                for child in &element.children {
                    self.visit(child, parent)?;
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Returns the group's name when the walk should descend into it.
    fn handle_group<'t>(
        &mut self,
        group: &'t GroupNode,
        parent: Option<&str>,
    ) -> Result<Option<&'t str>> {
        let name = group
            .name
            .as_deref()
            .ok_or_else(|| InventoryError::MissingGroupName {
                parent: parent.map(str::to_owned),
            })?;

        if self.config.is_ignored(name) {
            debug!(group = name, "ignoring group and its subtree");
            return Ok(None);
        }

        debug!(group = name, parent, "group");
        self.inventory.add_group(name);
        if let Some(parent) = parent {
            self.inventory.add_child(parent, name);
        }

        let owner = || format!("group '{name}'");
        if let Some(vars) = parse_notes_for(group.notes.as_deref(), owner)? {
            for (key, value) in vars {
                self.inventory.set_group_var(name, &key, value);
            }
        }

        Ok(Some(name))
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    fn handle_entry(&mut self, entry: &EntryNode, parent: Option<&str>) -> Result<()> {
        let fields = Fields::from_strings(&entry.strings);
        let Some(title) = fields.get("title") else {
            self.diagnostics.record(Diagnostic::MissingTitle {
                group: parent.map(str::to_owned),
            });
            return Ok(());
        };

        let Some((role, name)) = classify(title) else {
            trace!(title, "entry is not inventory data");
            return Ok(());
        };
        if name.is_empty() {
            self.diagnostics.record(Diagnostic::MissingName {
                role,
                title: title.to_owned(),
            });
            return Ok(());
        }

        debug!(%role, name, parent, "entry");
        match role {
            Role::Host => self.apply_host(name, &fields, parent),
            Role::GroupVars => self.apply_group_vars(name, &fields, parent),
            Role::SymbolicGroup => self.apply_symbolic_group(name, &fields, parent),
        }
    }

    /// `@name`: declare a host in the enclosing group.
    fn apply_host(&mut self, host: &str, fields: &Fields, parent: Option<&str>) -> Result<()> {
        match parent {
            Some(group) => self.inventory.add_host_to_group(group, host),
            None => {
                self.inventory.add_host(host);
            }
        }

        let config = self.config;
        let target = format!("host '{host}'");
        let vars = self.entry_vars(&target, fields, &config.host_field_map)?;
        for (key, value) in vars {
            self.inventory.set_host_var(host, &key, value);
        }
        Ok(())
    }

    /// `:name`: store the entry's data as one variable on the enclosing
    /// group.
    fn apply_group_vars(&mut self, var: &str, fields: &Fields, parent: Option<&str>) -> Result<()> {
        let config = self.config;
        let group = parent.unwrap_or(config.default_group.as_str());
        let target = format!("variable '{var}' of group '{group}'");
        let vars = self.entry_vars(&target, fields, &config.vars_field_map)?;
        self.inventory.set_group_var(group, var, Value::Object(vars));
        Ok(())
    }

    /// `%name`: link a group into the enclosing group and add variables it
    /// does not define itself.
    fn apply_symbolic_group(
        &mut self,
        group: &str,
        fields: &Fields,
        parent: Option<&str>,
    ) -> Result<()> {
        if self.config.is_ignored(group) {
            trace!(group, "symbolic link to an ignored group");
            return Ok(());
        }

        match parent {
            Some(parent) => self.inventory.add_child(parent, group),
            None => {
                self.inventory.add_group(group);
            }
        }

        let config = self.config;
        let target = format!("symbolic group '{group}'");
        let vars = self.entry_vars(&target, fields, &config.symgroup_field_map)?;
        for (key, value) in vars {
            if !self.inventory.set_group_var_if_absent(group, &key, value) {
                trace!(group, key = %key, "keeping the group's own value");
            }
        }
        Ok(())
    }

    /// Mapped fields overlaid with the entry's structured notes.
    ///
    /// Notes win every collision; each collision is recorded.
    fn entry_vars(&mut self, target: &str, fields: &Fields, map: &FieldMap) -> Result<Vars> {
        let mut vars = map_fields(&fields.without(&RESERVED_FIELDS), map, &mut self.diagnostics);

        let owner = || target.to_owned();
        if let Some(notes) = parse_notes_for(fields.get("notes"), owner)? {
            for (key, value) in notes {
                if vars.contains_key(&key) {
                    self.diagnostics.record(Diagnostic::NotesFieldCollision {
                        target: target.to_owned(),
                        key: key.clone(),
                    });
                }
                vars.insert(key, value);
            }
        }
        Ok(vars)
    }
}

fn parse_notes_for(notes: Option<&str>, owner: impl FnOnce() -> String) -> Result<Option<Vars>> {
    parse_notes(notes).map_err(|source| InventoryError::Notes {
        owner: owner(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;
    use crate::tree::{Element, StringField, Tag};
    use serde_json::json;

    fn root(children: Vec<Node>) -> Tree {
        let mut element = Element::new(Tag::Root);
        element.children = children;
        Tree::new(element)
    }

    fn run(tree: &Tree) -> Walk {
        walk(tree, &EffectiveConfig::default()).expect("walk should succeed")
    }

    #[test]
    fn test_single_host_in_group() {
        let tree = root(vec![GroupNode::new("Aa").with_child(EntryNode::titled("@h1")).into()]);
        let walk = run(&tree);
        assert_eq!(
            serde_json::to_value(&walk.inventory).expect("serialises"),
            json!({
                "groups": {"Aa": {"hosts": ["h1"], "children": [], "vars": {}}},
                "hosts": {"h1": {"vars": {}}}
            })
        );
        assert!(walk.diagnostics.is_empty());
    }

    #[test]
    fn test_nested_groups_link_to_nearest_group() {
        let tree = root(vec![GroupNode::new("outer")
            .with_child(Element::new(Tag::Other("Wrapper".into())).with_child(GroupNode::new("inner")))
            .into()]);
        let walk = run(&tree);
        assert_eq!(walk.inventory.group("outer").unwrap().children, vec!["inner"]);
    }

    #[test]
    fn test_top_level_groups_have_no_parent() {
        let tree = root(vec![GroupNode::new("a").into(), GroupNode::new("b").into()]);
        let walk = run(&tree);
        assert!(walk.inventory.groups().all(|group| group.children.is_empty()));
        assert_eq!(walk.inventory.groups().count(), 2);
    }

    #[test]
    fn test_unnamed_group_is_fatal() {
        let tree = root(vec![GroupNode::new("a").with_child(GroupNode::unnamed()).into()]);
        let error = walk(&tree, &EffectiveConfig::default()).unwrap_err();
        assert!(matches!(
            error,
            InventoryError::MissingGroupName { parent: Some(ref parent) } if parent == "a"
        ));
    }

    #[test]
    fn test_ignored_group_subtree_contributes_nothing() {
        let tree = root(vec![GroupNode::new("keep")
            .with_child(
                GroupNode::new("Recycle Bin")
                    .with_notes("---\nx: 1")
                    .with_child(EntryNode::titled("@deleted"))
                    .with_child(GroupNode::new("nested").with_child(EntryNode::titled(":v"))),
            )
            .with_child(EntryNode::titled("@kept"))
            .into()]);
        let config = EffectiveConfig {
            ignore_groups: ["Recycle Bin".to_owned()].into_iter().collect(),
            ..EffectiveConfig::default()
        };
        let walk = walk(&tree, &config).expect("walk should succeed");

        assert!(walk.inventory.group("Recycle Bin").is_none());
        assert!(walk.inventory.group("nested").is_none());
        assert!(walk.inventory.host("deleted").is_none());
        let keep = walk.inventory.group("keep").unwrap();
        assert!(keep.children.is_empty());
        assert_eq!(keep.hosts, vec!["kept"]);
    }

    #[test]
    fn test_ignored_group_skips_unnamed_descendants() {
        let tree = root(vec![GroupNode::new("skip").with_child(GroupNode::unnamed()).into()]);
        let config = EffectiveConfig {
            ignore_groups: ["skip".to_owned()].into_iter().collect(),
            ..EffectiveConfig::default()
        };
        assert!(walk(&tree, &config).is_ok());
    }

    #[test]
    fn test_reserved_subtrees_are_skipped() {
        let tree = root(vec![
            Element::new(Tag::Meta).with_child(GroupNode::new("meta-group")).into(),
            Element::new(Tag::DeletedObjects).with_child(EntryNode::titled("@gone")).into(),
            GroupNode::new("live")
                .with_child(Element::new(Tag::Times).with_child(GroupNode::unnamed()))
                .with_child(Element::new(Tag::History).with_child(EntryNode::titled("@old")))
                .into(),
        ]);
        let walk = run(&tree);
        let names: Vec<_> = walk.inventory.groups().map(|group| group.name.as_str()).collect();
        assert_eq!(names, vec!["live"]);
        assert_eq!(walk.inventory.hosts().count(), 0);
    }

    #[test]
    fn test_group_notes_become_vars() {
        let tree = root(vec![GroupNode::new("web")
            .with_notes("---\nhttp_port: 80\nmodules: [ssl]")
            .into()]);
        let walk = run(&tree);
        assert_eq!(
            Value::Object(walk.inventory.group("web").unwrap().vars.clone()),
            json!({"http_port": 80, "modules": ["ssl"]})
        );
    }

    #[test]
    fn test_group_prose_notes_are_ignored() {
        let tree = root(vec![GroupNode::new("web").with_notes("front door servers").into()]);
        let walk = run(&tree);
        assert!(walk.inventory.group("web").unwrap().vars.is_empty());
    }

    #[test]
    fn test_malformed_group_notes_are_fatal() {
        let tree = root(vec![GroupNode::new("web").with_notes("---\nport: [80").into()]);
        let error = walk(&tree, &EffectiveConfig::default()).unwrap_err();
        assert!(matches!(error, InventoryError::Notes { ref owner, .. } if owner == "group 'web'"));
    }

    #[test]
    fn test_merge_by_name_accumulates() {
        let tree = root(vec![
            GroupNode::new("site-a")
                .with_child(
                    GroupNode::new("db")
                        .with_notes("---\nengine: postgres")
                        .with_child(EntryNode::titled("@db-a")),
                )
                .into(),
            GroupNode::new("site-b")
                .with_child(
                    GroupNode::new("db")
                        .with_notes("---\nport: 5432")
                        .with_child(EntryNode::titled("@db-b")),
                )
                .into(),
        ]);
        let walk = run(&tree);

        assert_eq!(walk.inventory.groups().filter(|group| group.name == "db").count(), 1);
        let db = walk.inventory.group("db").unwrap();
        assert_eq!(db.hosts, vec!["db-a", "db-b"]);
        assert_eq!(Value::Object(db.vars.clone()), json!({"engine": "postgres", "port": 5432}));
        assert_eq!(walk.inventory.group("site-a").unwrap().children, vec!["db"]);
        assert_eq!(walk.inventory.group("site-b").unwrap().children, vec!["db"]);
    }

    #[test]
    fn test_entry_without_title_warns() {
        let tree = root(vec![GroupNode::new("g")
            .with_child(EntryNode::new().with_field("UserName", "x"))
            .into()]);
        let walk = run(&tree);
        assert_eq!(walk.inventory.hosts().count(), 0);
        assert_eq!(
            walk.diagnostics,
            vec![Diagnostic::MissingTitle { group: Some("g".into()) }]
        );
    }

    #[test]
    fn test_title_with_missing_value_counts_as_missing() {
        let entry = EntryNode::new().with_string(StringField {
            key: Some("Title".into()),
            value: None,
        });
        let walk = run(&root(vec![entry.into()]));
        assert_eq!(walk.diagnostics, vec![Diagnostic::MissingTitle { group: None }]);
    }

    #[test]
    fn test_plain_entries_are_silent() {
        let tree = root(vec![GroupNode::new("g").with_child(EntryNode::titled("Mail login")).into()]);
        let walk = run(&tree);
        assert_eq!(walk.inventory.hosts().count(), 0);
        assert!(walk.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_names_warn() {
        let tree = root(vec![GroupNode::new("g")
            .with_child(EntryNode::titled("@"))
            .with_child(EntryNode::titled(":  "))
            .with_child(EntryNode::titled("%"))
            .into()]);
        let walk = run(&tree);
        let roles: Vec<_> = walk
            .diagnostics
            .iter()
            .map(|diagnostic| match diagnostic {
                Diagnostic::MissingName { role, .. } => *role,
                other => panic!("unexpected diagnostic {other:?}"),
            })
            .collect();
        assert_eq!(roles, vec![Role::Host, Role::GroupVars, Role::SymbolicGroup]);
        assert!(walk.inventory.group("g").unwrap().vars.is_empty());
    }

    #[test]
    fn test_host_prefix_wins_over_other_fields() {
        let entry = EntryNode::titled("@web01")
            .with_field("Notes", "---\nrole: vars")
            .with_field("Role", ":vars");
        let walk = run(&root(vec![GroupNode::new("g").with_child(entry).into()]));
        assert!(walk.inventory.host("web01").is_some());
        assert!(walk.inventory.group("g").unwrap().vars.is_empty());
        assert_eq!(walk.inventory.groups().count(), 1);
    }

    #[test]
    fn test_host_vars_from_fields_and_notes() {
        let entry = EntryNode::titled("@web01")
            .with_field("UserName", "deploy")
            .with_field("Password", "s3cret")
            .with_field("URL", "https://web01")
            .with_field("Notes", "---\nansible_port: 2222");
        let walk = run(&root(vec![GroupNode::new("g").with_child(entry).into()]));
        assert_eq!(
            Value::Object(walk.inventory.host("web01").unwrap().vars.clone()),
            json!({
                "ansible_user": "deploy",
                "ansible_password": "s3cret",
                "url": "https://web01",
                "ansible_port": 2222
            })
        );
    }

    #[test]
    fn test_host_notes_beat_fields_with_warning() {
        let entry = EntryNode::titled("@h")
            .with_field("UserName", "b")
            .with_field("Notes", "---\nansible_user: a");
        let walk = run(&root(vec![GroupNode::new("g").with_child(entry).into()]));
        assert_eq!(walk.inventory.host("h").unwrap().vars["ansible_user"], "a");
        assert_eq!(
            walk.diagnostics,
            vec![Diagnostic::NotesFieldCollision {
                target: "host 'h'".into(),
                key: "ansible_user".into(),
            }]
        );
    }

    #[test]
    fn test_host_notes_replace_whole_nested_key() {
        let config = EffectiveConfig {
            host_field_map: FieldMap::new().with("username", Some("login.username")),
            ..EffectiveConfig::default()
        };
        let entry = EntryNode::titled("@h")
            .with_field("UserName", "b")
            .with_field("Notes", "---\nlogin: {username: a}");
        let walk = walk(&root(vec![entry.into()]), &config).expect("walk should succeed");
        assert_eq!(walk.inventory.host("h").unwrap().vars["login"], json!({"username": "a"}));
        assert_eq!(walk.diagnostics.len(), 1);
    }

    #[test]
    fn test_host_at_root_is_ungrouped() {
        let walk = run(&root(vec![EntryNode::titled("@lonely").into()]));
        assert!(walk.inventory.host("lonely").is_some());
        assert_eq!(walk.inventory.groups().count(), 0);
    }

    #[test]
    fn test_host_in_several_groups_accumulates_vars() {
        let tree = root(vec![
            GroupNode::new("a")
                .with_child(EntryNode::titled("@h").with_field("Port", "22"))
                .into(),
            GroupNode::new("b")
                .with_child(EntryNode::titled("@h").with_field("Port", "2222").with_field("Os", "linux"))
                .into(),
        ]);
        let walk = run(&tree);
        assert_eq!(walk.inventory.hosts().count(), 1);
        assert_eq!(
            Value::Object(walk.inventory.host("h").unwrap().vars.clone()),
            json!({"port": "2222", "os": "linux"})
        );
    }

    #[test]
    fn test_group_vars_bundle_on_parent() {
        let entry = EntryNode::titled(":ntp")
            .with_field("Server", "pool.ntp.org")
            .with_field("Notes", "---\niburst: true");
        let walk = run(&root(vec![GroupNode::new("linux").with_child(entry).into()]));
        assert_eq!(
            walk.inventory.group("linux").unwrap().vars["ntp"],
            json!({"server": "pool.ntp.org", "iburst": true})
        );
    }

    #[test]
    fn test_group_vars_bundle_at_root_uses_default_group() {
        let entry = EntryNode::titled(":cfgvar")
            .with_field("x", "1")
            .with_field("Notes", "---\ny: 2");
        let walk = run(&root(vec![entry.into()]));
        assert_eq!(
            walk.inventory.group("ungrouped").unwrap().vars["cfgvar"],
            json!({"x": "1", "y": 2})
        );
    }

    #[test]
    fn test_group_vars_bundle_notes_win_with_warning() {
        let entry = EntryNode::titled(":db")
            .with_field("port", "5432")
            .with_field("Notes", "---\nport: 6432");
        let walk = run(&root(vec![GroupNode::new("g").with_child(entry).into()]));
        assert_eq!(walk.inventory.group("g").unwrap().vars["db"], json!({"port": 6432}));
        assert_eq!(walk.diagnostics.len(), 1);
    }

    #[test]
    fn test_group_vars_bundle_overwrites_previous_bundle() {
        let tree = root(vec![GroupNode::new("g")
            .with_child(EntryNode::titled(":v").with_field("a", "1"))
            .with_child(EntryNode::titled(":v").with_field("b", "2"))
            .into()]);
        let walk = run(&tree);
        assert_eq!(walk.inventory.group("g").unwrap().vars["v"], json!({"b": "2"}));
    }

    #[test]
    fn test_symbolic_group_links_and_creates() {
        let tree = root(vec![GroupNode::new("prod")
            .with_child(EntryNode::titled("%monitoring"))
            .into()]);
        let walk = run(&tree);
        assert_eq!(walk.inventory.group("prod").unwrap().children, vec!["monitoring"]);
        assert!(walk.inventory.group("monitoring").is_some());
    }

    #[test]
    fn test_symbolic_group_does_not_override_real_definition() {
        let tree = root(vec![
            GroupNode::new("db").with_notes("---\nk: v1").into(),
            GroupNode::new("prod")
                .with_child(
                    EntryNode::titled("%db")
                        .with_field("Notes", "---\nk: v2\nextra: true"),
                )
                .into(),
        ]);
        let walk = run(&tree);
        assert_eq!(
            Value::Object(walk.inventory.group("db").unwrap().vars.clone()),
            json!({"k": "v1", "extra": true})
        );
    }

    #[test]
    fn test_real_definition_after_symbolic_link_overrides() {
        let tree = root(vec![
            GroupNode::new("prod")
                .with_child(EntryNode::titled("%db").with_field("k", "from-link"))
                .into(),
            GroupNode::new("db").with_notes("---\nk: real").into(),
        ]);
        let walk = run(&tree);
        assert_eq!(walk.inventory.group("db").unwrap().vars["k"], "real");
    }

    #[test]
    fn test_symbolic_group_edge_before_group_exists() {
        let tree = root(vec![
            GroupNode::new("prod").with_child(EntryNode::titled("%web")).into(),
            GroupNode::new("web").with_child(EntryNode::titled("@w1")).into(),
        ]);
        let walk = run(&tree);
        assert_eq!(walk.inventory.group("prod").unwrap().children, vec!["web"]);
        assert_eq!(walk.inventory.group("web").unwrap().hosts, vec!["w1"]);
    }

    #[test]
    fn test_symbolic_link_to_ignored_group_is_skipped() {
        let config = EffectiveConfig::default().with_overrides(&ConfigOverrides {
            ignore_groups: Some(["Recycle Bin".to_owned()].into_iter().collect()),
            ..ConfigOverrides::default()
        });
        let tree = root(vec![GroupNode::new("prod")
            .with_child(EntryNode::titled("%Recycle Bin").with_field("Notes", "---\nx: 1"))
            .into()]);
        let walk = walk(&tree, &config).expect("walk should succeed");
        assert!(!walk.inventory.contains_group("Recycle Bin"));
        assert!(walk.inventory.group("prod").unwrap().children.is_empty());
        assert!(walk.diagnostics.is_empty());
    }

    #[test]
    fn test_symbolic_group_at_root_has_no_parent() {
        let walk = run(&root(vec![EntryNode::titled("%orphan").into()]));
        assert!(walk.inventory.group("orphan").is_some());
        assert_eq!(walk.inventory.groups().count(), 1);
    }

    #[test]
    fn test_entry_notes_errors_name_the_entry() {
        let entry = EntryNode::titled(":v").with_field("Notes", "---\n- a");
        let error = walk(&root(vec![GroupNode::new("g").with_child(entry).into()]), &EffectiveConfig::default())
            .unwrap_err();
        assert!(matches!(
            error,
            InventoryError::Notes { ref owner, .. } if owner == "variable 'v' of group 'g'"
        ));
    }
}
