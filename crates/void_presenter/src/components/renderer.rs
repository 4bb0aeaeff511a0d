//! Mesh renderer facet
//!
//! Materials are loaded per index; shrinking the list truncates the host's
//! material array. The optional probe anchor references another node of the
//! same scene by publish token and is re-resolved on every pass.

use crate::component::{Component, SyncContext};
use crate::host::HostAdapter;
use crate::refs::Resolved;
use serde::{Deserialize, Serialize};
use void_asset::{CallbackSlot, LoadKey, Loaded, ResourceKind};
use void_scene::{ComponentKind, PublishToken};

/// Host side of [`MeshRenderer`]
pub trait RendererHost: HostAdapter {
    /// Add a renderer to the node
    fn attach_renderer(&mut self, node: Self::Node);
    /// Take the renderer off the node
    fn detach_renderer(&mut self, node: Self::Node);
    /// Assign the material at `index`, growing the list if needed
    fn set_material(&mut self, node: Self::Node, index: usize, material: Self::Resource);
    /// Drop materials past `len`
    fn truncate_materials(&mut self, node: Self::Node, len: usize);
    /// Set shadow casting
    fn set_shadow_casting(&mut self, node: Self::Node, mode: ShadowCasting);
    /// Get the current probe anchor
    fn probe_anchor(&self, node: Self::Node) -> Option<Self::Node>;
    /// Set or clear the probe anchor
    fn set_probe_anchor(&mut self, node: Self::Node, anchor: Option<Self::Node>);
}

/// Shadow casting mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowCasting {
    Off,
    #[default]
    On,
    TwoSided,
    ShadowsOnly,
}

const MATERIALS: &str = "mesh_renderer.materials";

fn material_slot(index: usize) -> CallbackSlot {
    CallbackSlot::indexed(MATERIALS, index as u64)
}

/// Renders the node's mesh with a list of materials
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshRenderer {
    pub materials: Vec<String>,
    pub cast_shadows: ShadowCasting,
    pub probe_anchor: Option<PublishToken>,
}

impl MeshRenderer {
    /// Component kind
    pub const KIND: ComponentKind = ComponentKind::new("mesh_renderer");

    /// Create a renderer with one material
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            materials: vec![material.into()],
            ..Default::default()
        }
    }

    /// Replace the material list
    pub fn with_materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials = materials.into_iter().map(Into::into).collect();
        self
    }

    /// Set shadow casting
    pub fn with_shadows(mut self, cast_shadows: ShadowCasting) -> Self {
        self.cast_shadows = cast_shadows;
        self
    }

    /// Anchor light probes at the node publishing `token`
    pub fn with_probe_anchor(mut self, token: PublishToken) -> Self {
        self.probe_anchor = Some(token);
        self
    }
}

impl<H: RendererHost> Component<H> for MeshRenderer {
    fn kind(&self) -> ComponentKind {
        Self::KIND
    }

    fn sync(&self, cx: &mut SyncContext<'_, H>, node: H::Node, prev: Option<&Self>) {
        if prev.is_none() {
            cx.host.attach_renderer(node);
        }
        let prev_materials = prev.map_or(&[][..], |prev| prev.materials.as_slice());

        for (index, address) in self.materials.iter().enumerate() {
            if prev_materials.get(index) == Some(address) {
                continue;
            }
            let key = LoadKey::new(address.clone(), ResourceKind::MATERIAL);
            cx.loads.load(
                cx.host,
                key,
                node,
                material_slot(index),
                move |loaded: Loaded<'_, H, H::Node, H::Resource>| {
                    if loaded.cx.is_alive(loaded.requester) {
                        loaded.cx.set_material(loaded.requester, index, loaded.resource);
                    }
                },
            );
        }
        if prev_materials.len() > self.materials.len() {
            for index in self.materials.len()..prev_materials.len() {
                cx.loads.cancel(node, material_slot(index));
            }
            cx.host.truncate_materials(node, self.materials.len());
        }

        if prev.map_or(true, |prev| prev.cast_shadows != self.cast_shadows) {
            cx.host.set_shadow_casting(node, self.cast_shadows);
        }

        match self.probe_anchor {
            Some(token) => cx.refs.subscribe(token, node, |resolved: Resolved<'_, H, H::Node>| {
                let host = resolved.cx;
                if host.is_alive(resolved.requester) && host.probe_anchor(resolved.requester) != resolved.target {
                    host.set_probe_anchor(resolved.requester, resolved.target);
                }
            }),
            None => {
                if prev.map_or(false, |prev| prev.probe_anchor.is_some()) {
                    cx.host.set_probe_anchor(node, None);
                }
            }
        }
    }

    fn remove(&self, cx: &mut SyncContext<'_, H>, node: H::Node) {
        for index in 0..self.materials.len() {
            cx.loads.cancel(node, material_slot(index));
        }
        cx.host.detach_renderer(node);
    }
}
