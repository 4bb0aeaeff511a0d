//! Scene nodes - immutable tree snapshots
//!
//! A [`SceneNode`] describes one node of the tree a producer wants on screen:
//! its name, ordered children, component facets and a few flags. Snapshots
//! are assembled with consuming builder methods and never mutated once they
//! are handed to a presenter, so the retained copy stays a valid diff baseline.
//!
//! Children are keyed by name and components by [`ComponentKind`]. Both maps
//! are ordered, which keeps diffs deterministic and linear.

use crate::error::{Result, SceneError};
use crate::id::{ComponentKind, IdentityKey, PublishToken};
use std::collections::{BTreeMap, HashMap};

/// Implemented by component payloads so nodes can key them by kind
pub trait HasKind {
    /// The category this payload belongs to
    fn kind(&self) -> ComponentKind;
}

/// One node of a scene snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode<C> {
    name: String,
    children: BTreeMap<String, SceneNode<C>>,
    components: BTreeMap<ComponentKind, C>,
    inactive: bool,
    is_static: bool,
    identity_key: Option<IdentityKey>,
    publish_token: Option<PublishToken>,
}

impl<C> SceneNode<C> {
    /// Create a node with no children and no components
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: BTreeMap::new(),
            components: BTreeMap::new(),
            inactive: false,
            is_static: false,
            identity_key: None,
            publish_token: None,
        }
    }

    /// Create an unnamed empty node
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Add a child
    ///
    /// An empty child name is replaced by its position (`#0`, `#1`, ...).
    /// Sibling names must be unique; this is asserted in debug builds and the
    /// later child silently wins in release builds.
    pub fn with_child(mut self, child: SceneNode<C>) -> Self {
        let child = self.positional(child);
        debug_assert!(
            !self.children.contains_key(&child.name),
            "Scene children must have unique names ({})",
            child.name
        );
        self.children.insert(child.name.clone(), child);
        self
    }

    /// Add several children in order
    pub fn with_children(self, children: impl IntoIterator<Item = SceneNode<C>>) -> Self {
        children.into_iter().fold(self, Self::with_child)
    }

    /// Add a child, rejecting duplicate names
    pub fn try_with_child(mut self, child: SceneNode<C>) -> Result<Self> {
        let child = self.positional(child);
        if self.children.contains_key(&child.name) {
            return Err(SceneError::DuplicateChild {
                parent: self.name.clone(),
                name: child.name,
            });
        }
        self.children.insert(child.name.clone(), child);
        Ok(self)
    }

    /// Mark the node inactive
    pub fn with_inactive(mut self, inactive: bool) -> Self {
        self.inactive = inactive;
        self
    }

    /// Mark the node static
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Attach an identity key
    pub fn with_key(mut self, key: impl Into<IdentityKey>) -> Self {
        self.identity_key = Some(key.into());
        self
    }

    /// Publish this node under a token
    pub fn with_token(mut self, token: PublishToken) -> Self {
        self.publish_token = Some(token);
        self
    }

    /// Get the name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the children, ordered by name
    pub fn children(&self) -> &BTreeMap<String, SceneNode<C>> {
        &self.children
    }

    /// Get a child by name
    pub fn child(&self, name: &str) -> Option<&SceneNode<C>> {
        self.children.get(name)
    }

    /// Get the components, ordered by kind
    pub fn components(&self) -> &BTreeMap<ComponentKind, C> {
        &self.components
    }

    /// Get a component by kind
    pub fn component(&self, kind: ComponentKind) -> Option<&C> {
        self.components.get(&kind)
    }

    /// Check if the node is inactive
    pub fn is_inactive(&self) -> bool {
        self.inactive
    }

    /// Check if the node is static
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Get the identity key
    pub fn identity_key(&self) -> Option<&IdentityKey> {
        self.identity_key.as_ref()
    }

    /// Get the publish token
    pub fn publish_token(&self) -> Option<PublishToken> {
        self.publish_token
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(SceneNode::node_count).sum::<usize>()
    }

    /// Check that every publish token in the subtree is unique
    ///
    /// Duplicate tokens would make reference resolution depend on traversal
    /// order.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashMap::new();
        self.collect_tokens(&self.name, &mut seen)
    }

    fn collect_tokens(&self, path: &str, seen: &mut HashMap<PublishToken, String>) -> Result<()> {
        if let Some(token) = self.publish_token {
            if let Some(first) = seen.insert(token, path.to_string()) {
                return Err(SceneError::DuplicateToken {
                    token,
                    first,
                    second: path.to_string(),
                });
            }
        }
        for (name, child) in &self.children {
            child.collect_tokens(&format!("{}/{}", path, name), seen)?;
        }
        Ok(())
    }

    fn positional(&self, mut child: SceneNode<C>) -> SceneNode<C> {
        if child.name.is_empty() {
            child.name = format!("#{}", self.children.len());
        }
        child
    }
}

impl<C: HasKind> SceneNode<C> {
    /// Add a component
    ///
    /// One component per kind; asserted in debug builds.
    pub fn with_component(mut self, component: impl Into<C>) -> Self {
        let component = component.into();
        let kind = component.kind();
        debug_assert!(
            !self.components.contains_key(&kind),
            "Duplicate component kind {} on {}",
            kind,
            self.name
        );
        self.components.insert(kind, component);
        self
    }

    /// Add several components
    pub fn with_components<I, T>(self, components: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<C>,
    {
        components
            .into_iter()
            .fold(self, |node, component| node.with_component(component))
    }

    /// Add a component, rejecting a second one of the same kind
    pub fn try_with_component(mut self, component: impl Into<C>) -> Result<Self> {
        let component = component.into();
        let kind = component.kind();
        if self.components.contains_key(&kind) {
            return Err(SceneError::DuplicateComponent {
                node: self.name.clone(),
                kind,
            });
        }
        self.components.insert(kind, component);
        Ok(self)
    }
}

impl<C> Default for SceneNode<C> {
    fn default() -> Self {
        Self::empty()
    }
}
