//! # void_scene - Scene Tree Snapshots
//!
//! Value types describing what a producer wants presented, frame by frame:
//! - Named nodes with ordered children and typed component facets
//! - Identity keys and publish tokens for lookup and cross-references
//! - An ordered three-way merge used to diff two snapshots
//!
//! Snapshots carry no behavior. The component payload type is a parameter so
//! that the presenter can plug in its own reference-counted component records.
//!
//! ## Example
//!
//! ```ignore
//! use void_scene::prelude::*;
//!
//! let scene = SceneNode::new("root")
//!     .with_child(SceneNode::new("cube").with_component(Transform::default()))
//!     .with_child(SceneNode::new("light").with_inactive(true));
//! ```

pub mod error;
pub mod id;
pub mod merge;
pub mod node;

pub use error::{Result, SceneError};
pub use id::{ComponentKind, IdentityKey, PublishToken, TokenAllocator};
pub use merge::merge;
pub use node::{HasKind, SceneNode};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::id::{ComponentKind, IdentityKey, PublishToken, TokenAllocator};
    pub use crate::merge::merge;
    pub use crate::node::{HasKind, SceneNode};
}
