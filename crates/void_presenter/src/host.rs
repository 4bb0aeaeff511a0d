//! Host adapter - the live presentation tree
//!
//! The presenter never owns host nodes. It drives them through a
//! [`HostAdapter`], which exposes the generic node operations every kind
//! needs. Facet-specific mutators live on per-kind traits next to the
//! components that use them (see [`crate::components`]).

use std::fmt::Debug;
use std::hash::Hash;
use void_scene::IdentityKey;

/// Mutation primitives of the externally-owned node tree
pub trait HostAdapter: 'static {
    /// Handle to a live host node
    type Node: Copy + Eq + Hash + Debug + 'static;
    /// Handle to a loaded resource
    type Resource: Clone + 'static;

    /// Create a child node under `parent`
    fn create_node(&mut self, parent: Self::Node, name: &str) -> Self::Node;

    /// Destroy a node and its whole subtree
    fn destroy_node(&mut self, node: Self::Node);

    /// Look up a live child by name
    fn child(&self, parent: Self::Node, name: &str) -> Option<Self::Node>;

    /// Check if a node still exists
    ///
    /// Load callbacks may fire after their requester was destroyed and must
    /// check this before touching it.
    fn is_alive(&self, node: Self::Node) -> bool;

    /// Set the active flag
    fn set_active(&mut self, node: Self::Node, active: bool);

    /// Rename a node
    fn set_name(&mut self, node: Self::Node, name: &str);

    /// Set the static flag
    fn set_static(&mut self, node: Self::Node, is_static: bool);

    /// Attach or clear the identity key
    fn set_identity_key(&mut self, node: Self::Node, key: Option<&IdentityKey>);
}
