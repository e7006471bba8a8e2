//! JSON interchange form of the document tree
//!
//! An external parser writes the doctree as JSON; the top level is the
//! document node itself.

use crate::node::Document;
use thiserror::Error;

/// Errors reading or writing the interchange form
#[derive(Debug, Error)]
pub enum DoctreeError {
    #[error("Invalid document tree JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for interchange operations
pub type DoctreeResult<T> = Result<T, DoctreeError>;

impl Document {
    /// Read a document from its JSON form
    pub fn from_json(source: &str) -> DoctreeResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Write this document as pretty-printed JSON
    pub fn to_json_pretty(&self) -> DoctreeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{Document, Node, NodeKind};

    #[test]
    fn test_from_json_minimal_fields() {
        let doc = Document::from_json(
            r##"{
                "type": "document",
                "children": [
                    {"type": "paragraph", "line": 3, "children": [
                        {"type": "#text", "value": "Hello"}
                    ]}
                ]
            }"##,
        )
        .unwrap();

        let para = &doc.root.children[0];
        assert_eq!(para.kind, NodeKind::Paragraph);
        assert_eq!(para.line, Some(3));
        assert!(para.attributes.is_empty());
        assert_eq!(para.children[0].kind, NodeKind::Text);
        assert_eq!(para.children[0].value.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let doc = Document::from_json(
            r#"{"type": "document", "children": [{"type": "comment", "line": 12}]}"#,
        )
        .unwrap();

        let comment = &doc.root.children[0];
        assert_eq!(comment.kind, NodeKind::Unknown("comment".to_string()));
        assert_eq!(comment.line, Some(12));
    }

    #[test]
    fn test_image_attributes() {
        let doc = Document::from_json(
            r#"{"type": "document", "children": [
                {"type": "image", "attributes": {"uri": "pic.png", "width": "200"}}
            ]}"#,
        )
        .unwrap();

        let image = &doc.root.children[0];
        assert_eq!(image.attribute("uri"), Some("pic.png"));
        assert_eq!(image.attribute("width"), Some("200"));
    }

    #[test]
    fn test_missing_type_is_an_error() {
        let err = Document::from_json(r#"{"children": []}"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid document tree JSON"));
    }

    #[test]
    fn test_serialized_shape() {
        let doc = Document::new(vec![Node::bullet_list(vec![Node::list_item(vec![
            Node::paragraph(vec![Node::text("One")]),
        ])])]);

        insta::assert_snapshot!(doc.to_json_pretty().unwrap(), @r#"
        {
          "type": "document",
          "children": [
            {
              "type": "bullet_list",
              "children": [
                {
                  "type": "list_item",
                  "children": [
                    {
                      "type": "paragraph",
                      "children": [
                        {
                          "type": "text",
                          "value": "One"
                        }
                      ]
                    }
                  ]
                }
              ]
            }
          ]
        }
        "#);
    }
}
