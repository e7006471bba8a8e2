//! rst2confluence-core: Core library for converting reStructuredText doctrees
//! to Confluence Wiki markup
//!
//! This crate provides:
//! - The Confluence translator (an enter/exit visitor over the doctree)
//! - A one-call conversion from a document to wiki markup

pub mod translator;

pub use rst_doctree::{Document, DoctreeError, Node, NodeKind, Visitor, walk};
pub use translator::{
    Phase, TranslateError, TranslateResult, Translator, TranslatorOptions, doctree_to_confluence,
};
