//! Shared test doubles: a host that records every mutation and a loader
//! completed by hand

#![allow(dead_code)]

use glam::{Quat, Vec3};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use void_asset::{LoadCompleter, LoadError, LoadKey, ResourceLoader};
use void_presenter::components::{FieldHost, FieldValue, MeshHost, RendererHost, ShadowCasting, TransformHost};
use void_presenter::{HostAdapter, Presenter, PresenterConfig, Scene};
use void_scene::IdentityKey;

pub type NodeId = u32;

/// One recorded host mutation, naming nodes by their name
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(String),
    Destroy(String),
    SetActive(String, bool),
    SetName(String, String),
    SetStatic(String, bool),
    SetKey(String, Option<IdentityKey>),
    SetPosition(String, Vec3),
    SetRotation(String, Quat),
    SetScale(String, Vec3),
    AttachMeshFilter(String),
    DetachMeshFilter(String),
    SetMesh(String, Option<String>),
    AttachRenderer(String),
    DetachRenderer(String),
    SetMaterial(String, usize, String),
    TruncateMaterials(String, usize),
    SetShadowCasting(String, ShadowCasting),
    SetProbeAnchor(String, Option<String>),
    AttachFacet(String, &'static str),
    DetachFacet(String, &'static str),
    SetField(String, String, FieldValue),
    SetFieldResource(String, String, String),
    ClearField(String, String),
    Custom(String, String),
}

#[derive(Debug, Clone, Default)]
pub struct HostNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: BTreeMap<String, NodeId>,
    pub active: bool,
    pub is_static: bool,
    pub key: Option<IdentityKey>,
    pub mesh: Option<String>,
    pub materials: Vec<Option<String>>,
    pub probe_anchor: Option<NodeId>,
    pub fields: BTreeMap<String, String>,
}

/// Host tree living in a map, recording every mutation
#[derive(Debug, Default)]
pub struct RecordingHost {
    nodes: HashMap<NodeId, HostNode>,
    next_id: NodeId,
    pub calls: Vec<Call>,
}

impl RecordingHost {
    /// Create a host with a root node
    pub fn new() -> (Self, NodeId) {
        let mut host = Self::default();
        let root = host.insert(None, "root");
        (host, root)
    }

    fn insert(&mut self, parent: Option<NodeId>, name: &str) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            HostNode {
                name: name.to_string(),
                parent,
                active: true,
                ..Default::default()
            },
        );
        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.insert(name.to_string(), id);
            }
        }
        id
    }

    fn name_of(&self, node: NodeId) -> String {
        self.nodes
            .get(&node)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| format!("<dead {}>", node))
    }

    fn record(&mut self, call: Call) {
        self.calls.push(call);
    }

    fn node_mut(&mut self, node: NodeId) -> &mut HostNode {
        self.nodes.get_mut(&node).expect("mutation of dead node")
    }

    /// Take the recorded calls
    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    /// Get a live node
    pub fn node(&self, node: NodeId) -> &HostNode {
        &self.nodes[&node]
    }

    /// Find a node by slash-separated path below `root`
    pub fn find(&self, root: NodeId, path: &str) -> Option<NodeId> {
        path.split('/')
            .try_fold(root, |node, name| self.nodes.get(&node)?.children.get(name).copied())
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Remove a node behind the presenter's back
    pub fn forget(&mut self, node: NodeId) {
        self.remove_subtree(node);
    }

    fn remove_subtree(&mut self, node: NodeId) {
        if let Some(removed) = self.nodes.remove(&node) {
            if let Some(parent) = removed.parent.and_then(|p| self.nodes.get_mut(&p)) {
                parent.children.remove(&removed.name);
            }
            for child in removed.children.values() {
                self.remove_subtree(*child);
            }
        }
    }

    pub fn custom(&mut self, node: NodeId, what: impl Into<String>) {
        let name = self.name_of(node);
        self.record(Call::Custom(name, what.into()));
    }
}

impl HostAdapter for RecordingHost {
    type Node = NodeId;
    type Resource = String;

    fn create_node(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.record(Call::Create(name.to_string()));
        self.insert(Some(parent), name)
    }

    fn destroy_node(&mut self, node: NodeId) {
        let name = self.name_of(node);
        self.record(Call::Destroy(name));
        self.remove_subtree(node);
    }

    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get(&parent)?.children.get(name).copied()
    }

    fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        self.record(Call::SetActive(self.name_of(node), active));
        self.node_mut(node).active = active;
    }

    fn set_name(&mut self, node: NodeId, name: &str) {
        self.record(Call::SetName(self.name_of(node), name.to_string()));
        self.node_mut(node).name = name.to_string();
    }

    fn set_static(&mut self, node: NodeId, is_static: bool) {
        self.record(Call::SetStatic(self.name_of(node), is_static));
        self.node_mut(node).is_static = is_static;
    }

    fn set_identity_key(&mut self, node: NodeId, key: Option<&IdentityKey>) {
        self.record(Call::SetKey(self.name_of(node), key.cloned()));
        self.node_mut(node).key = key.cloned();
    }
}

impl TransformHost for RecordingHost {
    fn set_position(&mut self, node: NodeId, position: Vec3) {
        self.record(Call::SetPosition(self.name_of(node), position));
    }

    fn set_rotation(&mut self, node: NodeId, rotation: Quat) {
        self.record(Call::SetRotation(self.name_of(node), rotation));
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) {
        self.record(Call::SetScale(self.name_of(node), scale));
    }
}

impl MeshHost for RecordingHost {
    fn attach_mesh_filter(&mut self, node: NodeId) {
        self.record(Call::AttachMeshFilter(self.name_of(node)));
    }

    fn detach_mesh_filter(&mut self, node: NodeId) {
        self.record(Call::DetachMeshFilter(self.name_of(node)));
        self.node_mut(node).mesh = None;
    }

    fn set_mesh(&mut self, node: NodeId, mesh: Option<String>) {
        self.record(Call::SetMesh(self.name_of(node), mesh.clone()));
        self.node_mut(node).mesh = mesh;
    }
}

impl RendererHost for RecordingHost {
    fn attach_renderer(&mut self, node: NodeId) {
        self.record(Call::AttachRenderer(self.name_of(node)));
    }

    fn detach_renderer(&mut self, node: NodeId) {
        self.record(Call::DetachRenderer(self.name_of(node)));
        let n = self.node_mut(node);
        n.materials.clear();
        n.probe_anchor = None;
    }

    fn set_material(&mut self, node: NodeId, index: usize, material: String) {
        self.record(Call::SetMaterial(self.name_of(node), index, material.clone()));
        let materials = &mut self.node_mut(node).materials;
        if materials.len() <= index {
            materials.resize(index + 1, None);
        }
        materials[index] = Some(material);
    }

    fn truncate_materials(&mut self, node: NodeId, len: usize) {
        self.record(Call::TruncateMaterials(self.name_of(node), len));
        self.node_mut(node).materials.truncate(len);
    }

    fn set_shadow_casting(&mut self, node: NodeId, mode: ShadowCasting) {
        self.record(Call::SetShadowCasting(self.name_of(node), mode));
    }

    fn probe_anchor(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node)?.probe_anchor
    }

    fn set_probe_anchor(&mut self, node: NodeId, anchor: Option<NodeId>) {
        let anchor_name = anchor.map(|a| self.name_of(a));
        self.record(Call::SetProbeAnchor(self.name_of(node), anchor_name));
        self.node_mut(node).probe_anchor = anchor;
    }
}

impl FieldHost for RecordingHost {
    fn attach_facet(&mut self, node: NodeId, facet: &'static str) {
        self.record(Call::AttachFacet(self.name_of(node), facet));
    }

    fn detach_facet(&mut self, node: NodeId, facet: &'static str) {
        self.record(Call::DetachFacet(self.name_of(node), facet));
        self.node_mut(node).fields.clear();
    }

    fn set_field(&mut self, node: NodeId, _facet: &'static str, name: &str, value: &FieldValue) {
        self.record(Call::SetField(self.name_of(node), name.to_string(), value.clone()));
        self.node_mut(node)
            .fields
            .insert(name.to_string(), format!("{:?}", value));
    }

    fn set_field_resource(&mut self, node: NodeId, _facet: &'static str, name: &str, resource: String) {
        self.record(Call::SetFieldResource(self.name_of(node), name.to_string(), resource.clone()));
        self.node_mut(node).fields.insert(name.to_string(), resource);
    }

    fn clear_field(&mut self, node: NodeId, _facet: &'static str, name: &str) {
        self.record(Call::ClearField(self.name_of(node), name.to_string()));
        self.node_mut(node).fields.remove(name);
    }
}

/// Loader that parks fetches until the test completes them
#[derive(Clone, Default)]
pub struct ManualLoader {
    parked: Arc<Mutex<Vec<LoadCompleter<String>>>>,
    fetched: Arc<Mutex<Vec<LoadKey>>>,
}

impl ManualLoader {
    /// Every key fetched so far, in order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().iter().map(|k| k.address().to_string()).collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().len()
    }

    fn take(&self, address: &str) -> LoadCompleter<String> {
        let mut parked = self.parked.lock();
        let index = parked
            .iter()
            .position(|c| c.key().address() == address)
            .unwrap_or_else(|| panic!("no parked fetch for {}", address));
        parked.remove(index)
    }

    /// Complete the fetch for `address` with `res:<address>`
    pub fn complete(&self, address: &str) {
        self.take(address).complete(format!("res:{}", address));
    }

    pub fn fail(&self, address: &str) {
        self.take(address)
            .fail(LoadError::NotFound(address.to_string()));
    }

    /// Complete every parked fetch
    pub fn complete_all(&self) {
        let parked: Vec<_> = self.parked.lock().drain(..).collect();
        for completer in parked {
            let resource = format!("res:{}", completer.key().address());
            completer.complete(resource);
        }
    }
}

impl ResourceLoader for ManualLoader {
    type Resource = String;

    fn fetch(&mut self, key: &LoadKey, completer: LoadCompleter<String>) {
        self.fetched.lock().push(key.clone());
        self.parked.lock().push(completer);
    }
}

pub type TestPresenter = Presenter<RecordingHost>;
pub type TestScene = Scene<RecordingHost>;

/// Presenter over a fresh recording host
pub fn setup(config: PresenterConfig) -> (TestPresenter, ManualLoader) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (host, root) = RecordingHost::new();
    let loader = ManualLoader::default();
    let presenter = Presenter::new(host, root, loader.clone(), config);
    (presenter, loader)
}

/// Scene node for the recording host
pub fn node(name: &str) -> TestScene {
    TestScene::new(name)
}

/// Present, flush and return the calls made
pub fn present(presenter: &mut TestPresenter, scene: TestScene) -> Vec<Call> {
    presenter.present(scene);
    presenter.flush();
    presenter.host_mut().take_calls()
}

pub fn calls_of(presenter: &mut TestPresenter) -> Vec<Call> {
    presenter.host_mut().take_calls()
}
