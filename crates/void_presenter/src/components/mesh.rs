//! Mesh filter facet

use crate::component::{Component, SyncContext};
use crate::host::HostAdapter;
use void_asset::{CallbackSlot, LoadKey, Loaded, ResourceKind};
use void_scene::ComponentKind;

/// Host side of [`MeshFilter`]
pub trait MeshHost: HostAdapter {
    /// Add a mesh filter to the node
    fn attach_mesh_filter(&mut self, node: Self::Node);
    /// Take the mesh filter off the node
    fn detach_mesh_filter(&mut self, node: Self::Node);
    /// Assign or clear the mesh
    fn set_mesh(&mut self, node: Self::Node, mesh: Option<Self::Resource>);
}

const MESH_SLOT: CallbackSlot = CallbackSlot::new("mesh_filter.mesh");

/// Mesh geometry loaded by address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshFilter {
    pub mesh: Option<String>,
}

impl MeshFilter {
    /// Component kind
    pub const KIND: ComponentKind = ComponentKind::new("mesh_filter");

    /// Create a filter showing the mesh at `address`
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            mesh: Some(address.into()),
        }
    }

    /// Create a filter without a mesh
    pub fn empty() -> Self {
        Self { mesh: None }
    }
}

impl<H: MeshHost> Component<H> for MeshFilter {
    fn kind(&self) -> ComponentKind {
        Self::KIND
    }

    fn sync(&self, cx: &mut SyncContext<'_, H>, node: H::Node, prev: Option<&Self>) {
        match prev {
            Some(prev) if prev == self => return,
            Some(_) => {}
            None => cx.host.attach_mesh_filter(node),
        }

        match &self.mesh {
            Some(address) => {
                let key = LoadKey::new(address.clone(), ResourceKind::MESH);
                cx.loads.load(cx.host, key, node, MESH_SLOT, |loaded: Loaded<'_, H, H::Node, H::Resource>| {
                    if loaded.cx.is_alive(loaded.requester) {
                        loaded.cx.set_mesh(loaded.requester, Some(loaded.resource));
                    }
                });
            }
            None => {
                cx.loads.cancel(node, MESH_SLOT);
                if prev.is_some() {
                    cx.host.set_mesh(node, None);
                }
            }
        }
    }

    fn remove(&self, cx: &mut SyncContext<'_, H>, node: H::Node) {
        cx.loads.cancel(node, MESH_SLOT);
        cx.host.detach_mesh_filter(node);
    }
}
