//! Depth-first walk driver
//!
//! Calls [`Visitor::enter`] when a node is first reached and [`Visitor::exit`]
//! once its whole subtree has been processed, so every enter is matched by
//! exactly one exit in strict nesting order.

use crate::node::{Document, Node};

/// Callbacks invoked by [`walk`]
pub trait Visitor {
    type Error;

    /// Called before the children of `node` are visited
    fn enter(&mut self, node: &Node) -> Result<(), Self::Error>;

    /// Called after the children of `node` are visited
    fn exit(&mut self, node: &Node) -> Result<(), Self::Error>;
}

/// Walk `node` and its descendants, stopping at the first error
pub fn walk<V: Visitor + ?Sized>(node: &Node, visitor: &mut V) -> Result<(), V::Error> {
    visitor.enter(node)?;
    for child in &node.children {
        walk(child, visitor)?;
    }
    visitor.exit(node)
}

impl Document {
    /// Walk the whole document starting at its root
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        walk(&self.root, visitor)
    }
}
