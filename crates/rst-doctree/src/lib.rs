//! rst-doctree: Document tree types for reStructuredText doctrees
//!
//! This crate provides:
//! - Doctree node types
//! - JSON interchange form (for trees produced by an external parser)
//! - Depth-first enter/exit walk driver
//!
//! # Example
//!
//! ```
//! use rst_doctree::{Document, Node};
//!
//! let source = r#"{
//!     "type": "document",
//!     "children": [
//!         {"type": "paragraph", "children": [{"type": "text", "value": "Hello"}]}
//!     ]
//! }"#;
//!
//! let doc = Document::from_json(source).unwrap();
//! assert_eq!(doc.root.children.len(), 1);
//! assert_eq!(doc.root.astext(), "Hello");
//! ```

pub mod json;
pub mod node;
pub mod walk;

// Re-export main types for convenient access
pub use json::{DoctreeError, DoctreeResult};
pub use node::{Document, Node, NodeKind};
pub use walk::{Visitor, walk};
