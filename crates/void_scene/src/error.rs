//! Error types for scene snapshots

use crate::id::{ComponentKind, PublishToken};
use thiserror::Error;

/// Structural problems in a scene snapshot
///
/// These are programmer errors. Builders assert them in debug builds; the
/// checked constructors and [`SceneNode::validate`](crate::SceneNode::validate)
/// report them for callers that want to reject a frame explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Two siblings share a name
    #[error("Scene children must have unique names: '{name}' under '{parent}'")]
    DuplicateChild { parent: String, name: String },

    /// Two components of the same kind on one node
    #[error("Duplicate component kind '{kind}' on '{node}'")]
    DuplicateComponent { node: String, kind: ComponentKind },

    /// Two nodes publish the same token
    #[error("Publish token {token} is published by both '{first}' and '{second}'")]
    DuplicateToken {
        token: PublishToken,
        first: String,
        second: String,
    },
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
