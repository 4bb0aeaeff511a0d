//! Local transform facet

use crate::component::{Component, SyncContext};
use crate::host::HostAdapter;
use glam::{Quat, Vec3};
use void_scene::ComponentKind;

/// Host side of [`Transform`]
pub trait TransformHost: HostAdapter {
    /// Set local position
    fn set_position(&mut self, node: Self::Node, position: Vec3);
    /// Set local rotation
    fn set_rotation(&mut self, node: Self::Node, rotation: Quat);
    /// Set local scale
    fn set_scale(&mut self, node: Self::Node, scale: Vec3);
}

/// Local position, rotation and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Component kind
    pub const KIND: ComponentKind = ComponentKind::new("transform");

    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform at a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set the same scale on every axis
    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::splat(scale))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl<H: TransformHost> Component<H> for Transform {
    fn kind(&self) -> ComponentKind {
        Self::KIND
    }

    fn sync(&self, cx: &mut SyncContext<'_, H>, node: H::Node, prev: Option<&Self>) {
        let force = prev.is_none();
        let prev = prev.copied().unwrap_or(Self::IDENTITY);

        if force || prev.position != self.position {
            cx.host.set_position(node, self.position);
        }
        if force || prev.rotation != self.rotation {
            cx.host.set_rotation(node, self.rotation);
        }
        if force || prev.scale != self.scale {
            cx.host.set_scale(node, self.scale);
        }
    }

    fn remove(&self, cx: &mut SyncContext<'_, H>, node: H::Node) {
        // Nodes always have a transform; removing the facet resets it
        <Self as Component<H>>::sync(&Self::IDENTITY, cx, node, Some(self));
    }
}
