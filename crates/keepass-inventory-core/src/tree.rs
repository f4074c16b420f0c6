// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! The decrypted vault tree consumed by the walker.
//!
//! A [`Tree`] is produced once by a vault reader and is read-only from then
//! on.  Only two node kinds carry inventory data:
//!
//! * [`GroupNode`]: a named container with optional notes
//! * [`EntryNode`]: a record made of `(Key, Value)` string fields
//!
//! Everything else is an [`Element`] with a [`Tag`]: document wrappers such
//! as `Root`, the reserved structural tags (`Meta`, `Times`,
//! `DeletedObjects`, `History`) and any element the reader did not
//! recognise.
//!
//! The builder methods make it cheap to assemble trees by hand:
//!
//! ```rust
//! use keepass_inventory_core::tree::{Element, EntryNode, GroupNode, Tag, Tree};
//!
//! let tree = Tree::new(
//!     Element::new(Tag::Root).with_child(
//!         GroupNode::new("web").with_child(EntryNode::titled("@web01")),
//!     ),
//! );
//! assert_eq!(tree.root().children().len(), 1);
//! ```

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Tag of a generic [`Element`].
///
/// `Group` and `Entry` are not listed because they have their own node
/// types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// The artificial document root.  Never a group.
    Root,
    /// Database metadata (name, description, icons, ...).
    Meta,
    /// Creation / modification timestamps.
    Times,
    /// Tombstones for deleted groups and entries.
    DeletedObjects,
    /// Previous revisions of an entry.
    History,
    /// Any other element, identified by its tag name.
    Other(String),
}

impl Tag {
    /// Map an element name onto a tag.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Root" => Tag::Root,
            "Meta" => Tag::Meta,
            "Times" => Tag::Times,
            "DeletedObjects" => Tag::DeletedObjects,
            "History" => Tag::History,
            other => Tag::Other(other.to_owned()),
        }
    }

    /// Whether the subtree under this tag must never be walked.
    ///
    /// Reserved subtrees carry no inventory data and may contain groups or
    /// entries (deleted objects, old revisions) that would otherwise be
    /// picked up.
    pub fn is_reserved(&self) -> bool {
        matches!(
            self,
            Tag::Meta | Tag::Times | Tag::DeletedObjects | Tag::History
        )
    }

    /// Element name of this tag.
    pub fn name(&self) -> &str {
        match self {
            Tag::Root => "Root",
            Tag::Meta => "Meta",
            Tag::Times => "Times",
            Tag::DeletedObjects => "DeletedObjects",
            Tag::History => "History",
            Tag::Other(name) => name,
        }
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A single node of the decrypted tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Group(GroupNode),
    Entry(EntryNode),
    Element(Element),
}

impl Node {
    /// Ordered children of this node.  Entries expose none: their fields
    /// are not tree nodes.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Group(group) => &group.children,
            Node::Entry(_) => &[],
            Node::Element(element) => &element.children,
        }
    }
}

impl From<GroupNode> for Node {
    fn from(group: GroupNode) -> Self {
        Node::Group(group)
    }
}

impl From<EntryNode> for Node {
    fn from(entry: EntryNode) -> Self {
        Node::Entry(entry)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A vault group.
///
/// `name` is optional only because malformed documents exist; the walker
/// rejects unnamed groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub children: Vec<Node>,
}

impl GroupNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A group without a `Name`.
    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// One `String` field of an entry.  Either half may be missing in a
/// malformed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringField {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl StringField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }
}

/// A vault entry: an ordered list of string fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryNode {
    pub strings: Vec<StringField>,
}

impl EntryNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// An entry with a single `Title` field.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new().with_field("Title", title)
    }

    pub fn with_field(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_string(StringField::new(key, value))
    }

    pub fn with_string(mut self, field: StringField) -> Self {
        self.strings.push(field);
        self
    }
}

/// Any element that is neither a group nor an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: Tag,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// A decrypted vault document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    root: Node,
}

impl Tree {
    pub fn new(root: impl Into<Node>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Text of the first `Meta/DatabaseDescription` element, if any.
    ///
    /// The description is where a vault embeds its own configuration.
    ///
    /// ```rust
    /// use keepass_inventory_core::tree::{Element, Tag, Tree};
    ///
    /// let tree = Tree::new(
    ///     Element::new(Tag::Other("KeePassFile".into())).with_child(
    ///         Element::new(Tag::Meta).with_child(
    ///             Element::new(Tag::Other("DatabaseDescription".into()))
    ///                 .with_text("---\nignore_groups: [Recycle Bin]"),
    ///         ),
    ///     ),
    /// );
    /// assert!(tree.description().unwrap().starts_with("---"));
    /// ```
    pub fn description(&self) -> Option<&str> {
        find_meta(&self.root)?
            .children
            .iter()
            .find_map(|child| match child {
                Node::Element(element) if element.tag.name() == "DatabaseDescription" => {
                    element.text.as_deref()
                }
                _ => None,
            })
    }
}

fn find_meta(node: &Node) -> Option<&Element> {
    match node {
        Node::Element(element) if element.tag == Tag::Meta => Some(element),
        Node::Element(element) => element.children.iter().find_map(find_meta),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_from_name_round_trips_known_tags() {
        for name in ["Root", "Meta", "Times", "DeletedObjects", "History"] {
            assert_eq!(Tag::from_name(name).name(), name);
        }
        assert_eq!(Tag::from_name("UUID"), Tag::Other("UUID".into()));
    }

    #[test]
    fn test_reserved_tags() {
        assert!(Tag::Meta.is_reserved());
        assert!(Tag::History.is_reserved());
        assert!(!Tag::Root.is_reserved());
        assert!(!Tag::Other("KeePassFile".into()).is_reserved());
    }

    #[test]
    fn test_entry_has_no_child_nodes() {
        let node: Node = EntryNode::titled("@host").into();
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_description_missing_without_meta() {
        let tree = Tree::new(Element::new(Tag::Root).with_child(GroupNode::new("a")));
        assert_eq!(tree.description(), None);
    }

    #[test]
    fn test_description_ignores_groups() {
        // A group named like the meta element must not be mistaken for it.
        let tree = Tree::new(
            Element::new(Tag::Root).with_child(
                GroupNode::new("Meta").with_child(
                    Element::new(Tag::Other("DatabaseDescription".into())).with_text("x"),
                ),
            ),
        );
        assert_eq!(tree.description(), None);
    }
}
