// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Reader for decrypted KeePass XML exports.
//!
//! The export has the shape:
//!
//! ```xml
//! <KeePassFile>
//!   <Meta><DatabaseDescription>...</DatabaseDescription></Meta>
//!   <Root>
//!     <Group>
//!       <Name>web</Name>
//!       <Notes>---
//! http_port: 8080</Notes>
//!       <Entry>
//!         <String><Key>Title</Key><Value>@web01</Value></String>
//!       </Entry>
//!     </Group>
//!   </Root>
//! </KeePassFile>
//! ```
//!
//! Parsing happens in two passes: `quick-xml` events are folded into a
//! plain element tree, which is then lowered into a [`Tree`].

use std::path::Path;

use keepass_inventory_core::tree::{Element, EntryNode, GroupNode, Node, StringField, Tag, Tree};
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

use super::{Secret, VaultError, VaultReader};

/// Why an export could not be turned into a [`Tree`].
#[derive(Error, Debug)]
pub enum XmlParseError {
    #[error(transparent)]
    Syntax(#[from] quick_xml::Error),

    #[error("the document has no root element")]
    Empty,

    /// The input ended while elements were still open.
    #[error("the document ends inside <{open}>")]
    Truncated { open: String },

    #[error("root element is <{name}>, expected <KeePassFile>")]
    UnexpectedRoot { name: String },
}

/// Reads `.xml` exports.  No password is involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlVaultReader;

impl XmlVaultReader {
    pub fn new() -> Self {
        Self
    }

    /// Parse an export held in memory.
    ///
    /// ```rust
    /// use keepass_inventory_std::vault::XmlVaultReader;
    ///
    /// let tree = XmlVaultReader::new()
    ///     .parse_str("<KeePassFile><Meta><DatabaseDescription>hello</DatabaseDescription></Meta></KeePassFile>")
    ///     .unwrap();
    /// assert_eq!(tree.description(), Some("hello"));
    /// ```
    ///
    /// # Errors
    ///
    /// Malformed, truncated or empty documents, and documents whose root is
    /// not `<KeePassFile>`.
    pub fn parse_str(&self, document: &str) -> Result<Tree, XmlParseError> {
        let raw = read_raw(document)?;
        if raw.name != "KeePassFile" {
            return Err(XmlParseError::UnexpectedRoot { name: raw.name });
        }
        Ok(Tree::new(lower(raw)))
    }
}

impl VaultReader for XmlVaultReader {
    fn needs_credential(&self) -> bool {
        false
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.eq_ignore_ascii_case("xml"))
            .unwrap_or(false)
    }

    fn read(&self, path: &Path, _secret: &Secret) -> Result<Tree, VaultError> {
        let document = std::fs::read_to_string(path).map_err(|source| VaultError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = self.parse_str(&document).map_err(|error| match error {
            XmlParseError::Syntax(source) => VaultError::Xml {
                path: path.to_path_buf(),
                source,
            },
            other => VaultError::Malformed {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;
        debug!(path = %path.display(), bytes = document.len(), "parsed XML vault");
        Ok(tree)
    }
}

// ---------------------------------------------------------------------------
// Pass 1: events -> raw elements
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct RawElement {
    name: String,
    text: String,
    children: Vec<RawElement>,
}

impl RawElement {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Text of a structural element, or `None` when it is only
    /// indentation.
    fn text(&self) -> Option<String> {
        if self.text.trim().is_empty() {
            None
        } else {
            Some(self.text.clone())
        }
    }

    /// Text of a leaf value such as `<Name>` or `<Value>`, kept verbatim.
    /// `None` only when the element has no content at all.
    fn value_text(&self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.clone())
        }
    }

    fn child_text(&self, name: &str) -> Option<String> {
        self.children
            .iter()
            .find(|child| child.name == name)
            .and_then(RawElement::value_text)
    }
}

fn read_raw(document: &str) -> Result<RawElement, XmlParseError> {
    let mut reader = Reader::from_str(document);
    // Synthetic holder for the document element.
    let mut stack = vec![RawElement::default()];

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(RawElement::named(name));
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(RawElement::named(name));
                }
            }
            Event::End(_) => {
                // quick-xml checks that end tags match, so the stack always
                // holds the element being closed above the holder.
                if stack.len() > 1 {
                    if let Some(element) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(element);
                        }
                    }
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => {
                if stack.len() > 1 {
                    let open = stack
                        .last()
                        .map(|element| element.name.clone())
                        .unwrap_or_default();
                    return Err(XmlParseError::Truncated { open });
                }
                break;
            }
            _ => {}
        }
    }

    let holder = stack.swap_remove(0);
    holder.children.into_iter().next().ok_or(XmlParseError::Empty)
}

// ---------------------------------------------------------------------------
// Pass 2: raw elements -> tree nodes
// ---------------------------------------------------------------------------

fn lower(raw: RawElement) -> Node {
    match raw.name.as_str() {
        "Group" => Node::Group(lower_group(raw)),
        "Entry" => Node::Entry(lower_entry(&raw)),
        _ => {
            let text = raw.text();
            Node::Element(Element {
                tag: Tag::from_name(&raw.name),
                text,
                children: raw.children.into_iter().map(lower).collect(),
            })
        }
    }
}

fn lower_group(raw: RawElement) -> GroupNode {
    let name = raw.child_text("Name");
    let notes = raw.child_text("Notes");
    let children = raw
        .children
        .into_iter()
        .filter(|child| child.name != "Name" && child.name != "Notes")
        .map(lower)
        .collect();
    GroupNode {
        name,
        notes,
        children,
    }
}

fn lower_entry(raw: &RawElement) -> EntryNode {
    let strings = raw
        .children
        .iter()
        .filter(|child| child.name == "String")
        .map(|string| StringField {
            key: string.child_text("Key"),
            value: string.child_text("Value"),
        })
        .collect();
    EntryNode { strings }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>
<KeePassFile>
    <Meta>
        <DatabaseName>ops</DatabaseName>
        <DatabaseDescription>---
ignore_groups: [Recycle Bin]</DatabaseDescription>
    </Meta>
    <Root>
        <Group>
            <UUID>AAAA</UUID>
            <Name>web</Name>
            <Notes>---
http_port: 8080</Notes>
            <Times><LastModificationTime>2026-01-01T00:00:00Z</LastModificationTime></Times>
            <Entry>
                <String><Key>Title</Key><Value>@web01</Value></String>
                <String><Key>UserName</Key><Value>deploy &amp; co</Value></String>
                <String><Key>Password</Key><Value ProtectInMemory="True"><![CDATA[s3<cr>t]]></Value></String>
                <String><Key>URL</Key><Value /></String>
                <History>
                    <Entry>
                        <String><Key>Title</Key><Value>@old</Value></String>
                    </Entry>
                </History>
            </Entry>
        </Group>
        <DeletedObjects />
    </Root>
</KeePassFile>"#;

    fn parse() -> Tree {
        XmlVaultReader::new().parse_str(EXPORT).expect("export should parse")
    }

    fn root_group(tree: &Tree) -> &GroupNode {
        let keepass_file = tree.root();
        let root = keepass_file
            .children()
            .iter()
            .find(|node| matches!(node, Node::Element(element) if element.tag == Tag::Root))
            .expect("Root element");
        match &root.children()[0] {
            Node::Group(group) => group,
            other => panic!("expected a group, got {other:?}"),
        }
    }

    #[test]
    fn test_description_is_exposed() {
        let tree = parse();
        assert_eq!(tree.description(), Some("---\nignore_groups: [Recycle Bin]"));
    }

    #[test]
    fn test_group_name_and_notes_are_attributes() {
        let tree = parse();
        let group = root_group(&tree);
        assert_eq!(group.name.as_deref(), Some("web"));
        assert_eq!(group.notes.as_deref(), Some("---\nhttp_port: 8080"));
        assert!(group.children.iter().all(|child| !matches!(
            child,
            Node::Element(element) if element.tag.name() == "Name" || element.tag.name() == "Notes"
        )));
        assert!(group
            .children
            .iter()
            .any(|child| matches!(child, Node::Element(element) if element.tag == Tag::Times)));
    }

    #[test]
    fn test_entry_strings() {
        let tree = parse();
        let entry = root_group(&tree)
            .children
            .iter()
            .find_map(|child| match child {
                Node::Entry(entry) => Some(entry),
                _ => None,
            })
            .expect("entry");
        assert_eq!(
            entry.strings,
            vec![
                StringField::new("Title", "@web01"),
                StringField::new("UserName", "deploy & co"),
                StringField::new("Password", "s3<cr>t"),
                StringField {
                    key: Some("URL".into()),
                    value: None
                },
            ]
        );
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(matches!(
            XmlVaultReader::new().parse_str("<KeePassFile><Root></KeePassFile>"),
            Err(XmlParseError::Syntax(_))
        ));
    }

    #[test]
    fn test_unclosed_document_is_truncated() {
        let error = XmlVaultReader::new()
            .parse_str(
                "<KeePassFile><Meta></Meta><Root><Group><Name>web</Name><Entry>\
                 <String><Key>Title</Key><Value>@web01</Value></String>",
            )
            .unwrap_err();
        assert!(matches!(error, XmlParseError::Truncated { ref open } if open == "Entry"));
    }

    #[test]
    fn test_empty_and_blank_documents_are_rejected() {
        let reader = XmlVaultReader::new();
        for document in ["", "   \n", "<?xml version=\"1.0\"?>\n"] {
            assert!(
                matches!(reader.parse_str(document), Err(XmlParseError::Empty)),
                "{document:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_whitespace_values_are_kept() {
        let tree = XmlVaultReader::new()
            .parse_str(
                "<KeePassFile><Root><Group><Name> </Name><Entry>\
                 <String><Key>Title</Key><Value>@h</Value></String>\
                 <String><Key>Padding</Key><Value> </Value></String>\
                 <String><Key>Empty</Key><Value></Value></String>\
                 </Entry></Group></Root></KeePassFile>",
            )
            .expect("export should parse");
        let group = root_group(&tree);
        assert_eq!(group.name.as_deref(), Some(" "));
        let Node::Entry(entry) = &group.children[0] else {
            panic!("expected an entry");
        };
        assert_eq!(entry.strings[1], StringField::new("Padding", " "));
        assert_eq!(
            entry.strings[2],
            StringField {
                key: Some("Empty".into()),
                value: None
            }
        );
    }

    #[test]
    fn test_reader_accepts_only_xml() {
        let reader = XmlVaultReader::new();
        assert!(reader.accepts(Path::new("vault.xml")));
        assert!(!reader.accepts(Path::new("vault.kdbx")));
        assert!(!reader.needs_credential());
    }

    #[test]
    fn test_read_rejects_zero_byte_file() {
        let file = tempfile::Builder::new()
            .suffix(".xml")
            .tempfile()
            .expect("temp file");
        let error = XmlVaultReader::new()
            .read(file.path(), &Secret::empty())
            .unwrap_err();
        assert!(matches!(error, VaultError::Malformed { .. }));
    }

    #[test]
    fn test_read_rejects_foreign_root() {
        let mut file = tempfile::Builder::new()
            .suffix(".xml")
            .tempfile()
            .expect("temp file");
        std::io::Write::write_all(&mut file, b"<rss><channel/></rss>").expect("write");
        let error = XmlVaultReader::new()
            .read(file.path(), &Secret::empty())
            .unwrap_err();
        assert!(matches!(error, VaultError::Malformed { .. }));
    }
}
