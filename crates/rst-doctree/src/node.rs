//! Document tree node types
//!
//! This module defines the node model of a reStructuredText doctree as handed
//! over by an external parser (for example docutils).
//! Reference: https://docutils.sourceforge.io/docs/ref/doctree.html

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A complete document tree
///
/// The root is normally a node of kind [`NodeKind::Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub root: Node,
}

/// One element of the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node kind (e.g., "paragraph", "section", "image")
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Source line the node was parsed from, when the parser knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Raw content of text nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Kind-specific attributes (image uri/alt/width/height/align, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

/// Known doctree node kinds
///
/// Kinds that are not listed here are kept as [`NodeKind::Unknown`] so that
/// consumers can report them by name instead of failing to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    // Structural
    Document,
    Section,
    Title,
    Subtitle,
    Decoration,
    Footer,
    Target,

    // Body elements
    Paragraph,
    BulletList,
    EnumeratedList,
    ListItem,
    BlockQuote,
    LiteralBlock,
    Note,
    Warning,
    Image,

    // Field lists
    FieldList,
    Field,
    FieldName,
    FieldBody,

    // Tables
    Table,
    Tgroup,
    Colspec,
    Thead,
    Tbody,
    Row,
    Entry,

    // Inline elements
    Text,
    Emphasis,
    Strong,
    Reference,
    Literal,

    // Anything else the parser produced (comment, footnote, citation, ...)
    Unknown(String),
}

impl NodeKind {
    /// Parse a node kind from its doctree name
    pub fn parse(s: &str) -> Self {
        match s {
            "document" => Self::Document,
            "section" => Self::Section,
            "title" => Self::Title,
            "subtitle" => Self::Subtitle,
            "decoration" => Self::Decoration,
            "footer" => Self::Footer,
            "target" => Self::Target,
            "paragraph" => Self::Paragraph,
            "bullet_list" => Self::BulletList,
            "enumerated_list" => Self::EnumeratedList,
            "list_item" => Self::ListItem,
            "block_quote" => Self::BlockQuote,
            "literal_block" => Self::LiteralBlock,
            "note" => Self::Note,
            "warning" => Self::Warning,
            "image" => Self::Image,
            "field_list" => Self::FieldList,
            "field" => Self::Field,
            "field_name" => Self::FieldName,
            "field_body" => Self::FieldBody,
            "table" => Self::Table,
            "tgroup" => Self::Tgroup,
            "colspec" => Self::Colspec,
            "thead" => Self::Thead,
            "tbody" => Self::Tbody,
            "row" => Self::Row,
            "entry" => Self::Entry,
            // docutils names its text node class `Text`
            "text" | "Text" | "#text" => Self::Text,
            "emphasis" => Self::Emphasis,
            "strong" => Self::Strong,
            "reference" => Self::Reference,
            "literal" => Self::Literal,
            _ => Self::Unknown(s.to_string()),
        }
    }

    /// Get the doctree name of this kind
    pub fn as_str(&self) -> &str {
        match self {
            Self::Document => "document",
            Self::Section => "section",
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Decoration => "decoration",
            Self::Footer => "footer",
            Self::Target => "target",
            Self::Paragraph => "paragraph",
            Self::BulletList => "bullet_list",
            Self::EnumeratedList => "enumerated_list",
            Self::ListItem => "list_item",
            Self::BlockQuote => "block_quote",
            Self::LiteralBlock => "literal_block",
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Image => "image",
            Self::FieldList => "field_list",
            Self::Field => "field",
            Self::FieldName => "field_name",
            Self::FieldBody => "field_body",
            Self::Table => "table",
            Self::Tgroup => "tgroup",
            Self::Colspec => "colspec",
            Self::Thead => "thead",
            Self::Tbody => "tbody",
            Self::Row => "row",
            Self::Entry => "entry",
            Self::Text => "text",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Reference => "reference",
            Self::Literal => "literal",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Unknown(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Convenience constructors
impl Node {
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            line: None,
            value: None,
            attributes: BTreeMap::new(),
            children,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self {
            value: Some(s.into()),
            ..Self::new(NodeKind::Text, Vec::new())
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph, children)
    }

    pub fn section(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Section, children)
    }

    pub fn title(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Title, children)
    }

    pub fn subtitle(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Subtitle, children)
    }

    pub fn bullet_list(items: Vec<Node>) -> Self {
        Self::new(NodeKind::BulletList, items)
    }

    pub fn enumerated_list(items: Vec<Node>) -> Self {
        Self::new(NodeKind::EnumeratedList, items)
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Self::new(NodeKind::ListItem, children)
    }

    pub fn emphasis(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Emphasis, children)
    }

    pub fn strong(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Strong, children)
    }

    pub fn literal(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Literal, children)
    }

    pub fn literal_block(children: Vec<Node>) -> Self {
        Self::new(NodeKind::LiteralBlock, children)
    }

    pub fn reference(refuri: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Reference, children).with_attribute("refuri", refuri)
    }

    pub fn note(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Note, children)
    }

    pub fn warning(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Warning, children)
    }

    pub fn image(uri: impl Into<String>) -> Self {
        Self::new(NodeKind::Image, Vec::new()).with_attribute("uri", uri)
    }

    /// Set an attribute, replacing any previous value for `key`
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Record the source line of this node
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Look up an attribute by name
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Concatenated text content of this node and its descendants
    pub fn astext(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(value) = &self.value {
            out.push_str(value);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

impl Document {
    /// Create a document whose root holds `children`
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Node::new(NodeKind::Document, children),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_parse() {
        assert_eq!(NodeKind::parse("bullet_list"), NodeKind::BulletList);
        assert_eq!(NodeKind::parse("Text"), NodeKind::Text);
        assert_eq!(NodeKind::parse("#text"), NodeKind::Text);
        assert_eq!(
            NodeKind::parse("comment"),
            NodeKind::Unknown("comment".to_string())
        );
    }

    #[test]
    fn test_node_kind_as_str_roundtrip() {
        let kinds = [
            NodeKind::Document,
            NodeKind::Subtitle,
            NodeKind::EnumeratedList,
            NodeKind::FieldBody,
            NodeKind::Colspec,
            NodeKind::LiteralBlock,
        ];
        for kind in kinds {
            assert_eq!(NodeKind::parse(kind.as_str()), kind);
        }
        assert_eq!(NodeKind::Unknown("footnote".into()).as_str(), "footnote");
    }

    #[test]
    fn test_node_constructors() {
        let text = Node::text("hello");
        assert_eq!(text.kind, NodeKind::Text);
        assert_eq!(text.value.as_deref(), Some("hello"));

        let img = Node::image("pic.png").with_attribute("alt", "A pic").at_line(7);
        assert_eq!(img.attribute("uri"), Some("pic.png"));
        assert_eq!(img.attribute("alt"), Some("A pic"));
        assert_eq!(img.attribute("width"), None);
        assert_eq!(img.line, Some(7));

        let link = Node::reference("https://example.com", vec![Node::text("site")]);
        assert_eq!(link.attribute("refuri"), Some("https://example.com"));
    }

    #[test]
    fn test_astext() {
        let para = Node::paragraph(vec![
            Node::text("Hello "),
            Node::emphasis(vec![Node::text("big")]),
            Node::text(" world"),
        ]);
        assert_eq!(para.astext(), "Hello big world");
    }

    #[test]
    fn test_document_root_kind() {
        let doc = Document::new(vec![Node::paragraph(vec![Node::text("x")])]);
        assert_eq!(doc.root.kind, NodeKind::Document);
        assert_eq!(doc.root.children.len(), 1);
    }
}
