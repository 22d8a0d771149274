//! Error types for orrery_scene

use crate::NodeId;
use thiserror::Error;

/// Errors raised by hierarchy edits
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Attaching would make a node its own ancestor
    #[error("cannot attach {child:?} under {parent:?}: parent is the node itself or one of its descendants")]
    InvalidHierarchy { child: NodeId, parent: NodeId },

    /// The handle does not refer to a live node
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),
}

/// Result type for orrery_scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
