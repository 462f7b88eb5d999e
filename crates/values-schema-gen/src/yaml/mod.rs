//! Comment-preserving YAML facade.
//!
//! Wraps the event parser in an owned tree that keeps head, inline and foot
//! comments on every node, records anchors, and leaves aliases unresolved
//! for the walker to look up.

mod comments;
mod loader;
mod node;

pub use loader::{Document, parse};
pub use node::{MappingEntry, Node, NodeKind};
