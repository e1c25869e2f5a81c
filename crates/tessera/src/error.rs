use std::{io, result::Result as StdResult, sync::mpsc};

use thiserror::Error;

use crate::id::NodeId;

/// Result alias used throughout tessera.
pub type Result<T> = StdResult<T, Error>;

/// Everything that can go wrong in tree, layout and rendering operations.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The node does not exist in this screen's arena, or has been destroyed.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A node belonging to one screen was used with another.
    #[error("node {0:?} belongs to a different screen")]
    ForeignScreen(NodeId),

    /// The operation would make a node its own ancestor.
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },

    /// A sibling-relative insert named a node that has no parent.
    #[error("node {0:?} has no parent")]
    NoParent(NodeId),

    /// The screen root cannot be moved, removed or destroyed through the tree.
    #[error("the root node cannot be reparented or removed")]
    RootImmovable,

    /// A percentage was resolved against a parent with no rectangle.
    #[error("cannot resolve a percentage of the unresolved parent of {0:?}")]
    UnresolvedParent(NodeId),

    /// A position or size specification could not be parsed.
    #[error("invalid specification: {0}")]
    InvalidSpec(String),

    /// Terminal output failed. The in-memory model is unaffected.
    #[error("render: {0}")]
    Render(String),

    /// Configuration could not be loaded.
    #[error("config: {0}")]
    Config(String),

    /// Run loop failure.
    #[error("runloop: {0}")]
    RunLoop(String),
}

impl From<mpsc::RecvError> for Error {
    fn from(e: mpsc::RecvError) -> Self {
        Self::RunLoop(e.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Render(e.to_string())
    }
}
