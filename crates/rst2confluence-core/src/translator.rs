//! Doctree to Confluence Wiki markup translation
//!
//! The [`Translator`] is a stateful visitor: the walk driver calls
//! [`Visitor::enter`] and [`Visitor::exit`] for every node and the translator
//! appends markup fragments to its output buffer as it goes.
//! Reference: https://confluence.atlassian.com/doc/confluence-wiki-markup-251003035.html

use rst_doctree::{Document, Node, NodeKind, Visitor};
use std::fmt;
use thiserror::Error;

/// Image attributes rendered after the URI, in this order
const IMAGE_ATTRIBUTES: [&str; 4] = ["alt", "width", "height", "align"];

/// Options for the translator
#[derive(Debug, Clone, Default)]
pub struct TranslatorOptions {
    /// Run the whole walk (including unknown-kind checks) but emit nothing
    pub suppress_output: bool,
}

/// Which half of a node visit failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Enter,
    Exit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Enter => f.write_str("enter"),
            Phase::Exit => f.write_str("exit"),
        }
    }
}

/// Translation errors
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Unrecognized node kind `{kind}` on {phase} at line {}", line_label(.line))]
    UnrecognizedNodeKind {
        kind: String,
        line: Option<u32>,
        phase: Phase,
    },
}

fn line_label(line: &Option<u32>) -> String {
    match line {
        Some(line) => line.to_string(),
        None => "?".to_string(),
    }
}

/// Translation result type
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Convert a document tree to Confluence Wiki markup
pub fn doctree_to_confluence(
    doc: &Document,
    options: &TranslatorOptions,
) -> TranslateResult<String> {
    let mut translator = Translator::new(options);
    doc.walk(&mut translator)?;
    Ok(translator.into_text())
}

/// Translator state, one instance per document
#[derive(Debug)]
pub struct Translator {
    output: String,
    /// Whether the next paragraph or title starts a block (no leading break)
    first: bool,
    list_depth: usize,
    /// One marker per open list, outermost first
    list_markers: Vec<char>,
    /// Set while an enumerated list is open; numbering is left to Confluence
    list_counter: Option<u32>,
    section_depth: usize,
    suppress_output: bool,
}

impl Translator {
    pub fn new(options: &TranslatorOptions) -> Self {
        Self {
            output: String::new(),
            first: true,
            list_depth: 0,
            list_markers: Vec::new(),
            list_counter: None,
            section_depth: 0,
            suppress_output: options.suppress_output,
        }
    }

    /// The markup emitted so far
    pub fn rendered_text(&self) -> &str {
        &self.output
    }

    pub fn into_text(self) -> String {
        self.output
    }

    /// Number of currently open sections
    pub fn section_depth(&self) -> usize {
        self.section_depth
    }

    /// Number of currently open lists
    pub fn list_depth(&self) -> usize {
        self.list_depth
    }

    /// Markers of the open lists, outermost first
    pub fn list_markers(&self) -> &[char] {
        &self.list_markers
    }

    pub fn list_counter(&self) -> Option<u32> {
        self.list_counter
    }

    fn push(&mut self, s: &str) {
        if !self.suppress_output {
            self.output.push_str(s);
        }
    }

    fn newline(&mut self, count: usize) {
        if !self.suppress_output {
            for _ in 0..count {
                self.output.push('\n');
            }
        }
    }

    fn heading(&mut self) {
        let marker = format!("h{}.", self.section_depth);
        self.push(&marker);
    }

    fn open_list(&mut self, marker: char) {
        self.list_markers.push(marker);
        self.list_depth += 1;
    }

    fn close_list(&mut self) {
        self.list_markers.pop();
        self.list_depth = self.list_depth.saturating_sub(1);
    }

    fn write_list_item(&mut self) {
        let mut prefix: String = self.list_markers.iter().collect();
        prefix.push(' ');
        self.push(&prefix);
        self.first = true;
    }

    fn write_image(&mut self, node: &Node) {
        let attributes: Vec<String> = IMAGE_ATTRIBUTES
            .iter()
            .filter_map(|key| node.attribute(key).map(|value| format!("{key}={value}")))
            .collect();

        self.push("!");
        self.push(node.attribute("uri").unwrap_or_default());
        if !attributes.is_empty() {
            self.push("|");
            self.push(&attributes.join(","));
        }
        self.push("!");
    }
}

fn unrecognized(node: &Node, name: &str, phase: Phase) -> TranslateError {
    TranslateError::UnrecognizedNodeKind {
        kind: name.to_string(),
        line: node.line,
        phase,
    }
}

impl Visitor for Translator {
    type Error = TranslateError;

    fn enter(&mut self, node: &Node) -> TranslateResult<()> {
        match &node.kind {
            NodeKind::Document
            | NodeKind::Target
            | NodeKind::Decoration
            | NodeKind::Footer
            | NodeKind::BlockQuote
            | NodeKind::FieldList
            | NodeKind::Field
            | NodeKind::FieldName
            | NodeKind::FieldBody
            | NodeKind::Tgroup
            | NodeKind::Colspec
            | NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Reference
            | NodeKind::Literal
            | NodeKind::LiteralBlock => {}
            NodeKind::Paragraph => {
                if !self.first {
                    self.newline(1);
                }
            }
            NodeKind::Text => {
                if let Some(value) = &node.value {
                    self.push(value);
                }
            }
            NodeKind::Section => self.section_depth += 1,
            NodeKind::Title => {
                if !self.first {
                    self.newline(1);
                }
                self.heading();
            }
            NodeKind::Subtitle => self.heading(),
            NodeKind::BulletList => self.open_list('*'),
            NodeKind::EnumeratedList => {
                self.open_list('#');
                self.list_counter = Some(1);
                tracing::debug!(depth = self.list_depth, "start enumerated list");
            }
            NodeKind::ListItem => self.write_list_item(),
            NodeKind::Note => {
                self.push("{note}");
                self.newline(1);
            }
            NodeKind::Warning => self.push("{warning}"),
            NodeKind::Image => self.write_image(node),
            NodeKind::Table => tracing::debug!(line = ?node.line, "start table"),
            NodeKind::Thead => self.push("||"),
            NodeKind::Tbody | NodeKind::Entry => {
                tracing::trace!(kind = %node.kind, "enter table part");
            }
            NodeKind::Row => self.push("|"),
            NodeKind::Unknown(name) => return Err(unrecognized(node, name, Phase::Enter)),
        }
        Ok(())
    }

    fn exit(&mut self, node: &Node) -> TranslateResult<()> {
        match &node.kind {
            NodeKind::Document
            | NodeKind::Text
            | NodeKind::ListItem
            | NodeKind::Target
            | NodeKind::Decoration
            | NodeKind::Footer
            | NodeKind::BlockQuote
            | NodeKind::FieldList
            | NodeKind::Field
            | NodeKind::FieldName
            | NodeKind::FieldBody
            | NodeKind::Tgroup
            | NodeKind::Colspec
            | NodeKind::Image
            | NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Reference
            | NodeKind::Literal
            | NodeKind::LiteralBlock => {}
            NodeKind::Paragraph => {
                self.newline(1);
                self.first = false;
            }
            NodeKind::Section => self.section_depth = self.section_depth.saturating_sub(1),
            NodeKind::Title => {
                self.newline(2);
                self.first = true;
            }
            NodeKind::Subtitle => self.newline(2),
            NodeKind::BulletList => self.close_list(),
            NodeKind::EnumeratedList => {
                self.list_counter = None;
                self.close_list();
            }
            NodeKind::Note => {
                self.push("{note}");
                self.newline(2);
            }
            NodeKind::Warning => {
                self.push("{warning}");
                self.newline(2);
            }
            NodeKind::Table => tracing::debug!(line = ?node.line, "end table"),
            NodeKind::Thead => self.push("||"),
            NodeKind::Tbody | NodeKind::Entry => {
                tracing::trace!(kind = %node.kind, "exit table part");
            }
            NodeKind::Row => self.push("|"),
            NodeKind::Unknown(name) => return Err(unrecognized(node, name, Phase::Exit)),
        }
        Ok(())
    }
}
