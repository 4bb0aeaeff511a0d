//! Named fields on an arbitrary host facet
//!
//! [`Fields`] covers facets that have no dedicated component: the payload is
//! a facet name plus a map of field values, and the host resolves names to
//! setters once, on its side. Fields are diffed one by one with the same
//! ordered merge the reconciler uses for children.

use crate::component::{Component, SyncContext};
use crate::host::HostAdapter;
use glam::Vec3;
use std::collections::BTreeMap;
use void_asset::{CallbackSlot, LoadKey, Loaded};
use void_scene::{merge, ComponentKind};

/// Host side of [`Fields`]
pub trait FieldHost: HostAdapter {
    /// Add the facet to the node
    fn attach_facet(&mut self, node: Self::Node, facet: &'static str);
    /// Take the facet off the node
    fn detach_facet(&mut self, node: Self::Node, facet: &'static str);
    /// Write a plain field value
    fn set_field(&mut self, node: Self::Node, facet: &'static str, name: &str, value: &FieldValue);
    /// Write a loaded resource into a field
    fn set_field_resource(&mut self, node: Self::Node, facet: &'static str, name: &str, resource: Self::Resource);
    /// Reset a field to the facet's default
    fn clear_field(&mut self, node: Self::Node, facet: &'static str, name: &str);
}

/// Value of one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Vec3(Vec3),
    /// Resource loaded through the cache before it is written
    Asset(LoadKey),
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec3> for FieldValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<LoadKey> for FieldValue {
    fn from(key: LoadKey) -> Self {
        Self::Asset(key)
    }
}

/// Field values for one host facet
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    facet: &'static str,
    values: BTreeMap<String, FieldValue>,
}

impl Fields {
    /// Create an empty field set for `facet`
    pub fn new(facet: &'static str) -> Self {
        Self {
            facet,
            values: BTreeMap::new(),
        }
    }

    /// Set a field
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Get the facet name
    pub fn facet(&self) -> &'static str {
        self.facet
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Get all field values
    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }
}

fn apply<H: FieldHost>(cx: &mut SyncContext<'_, H>, node: H::Node, facet: &'static str, name: &str, value: &FieldValue) {
    let slot = CallbackSlot::labeled(facet, name);
    match value {
        FieldValue::Asset(key) => {
            let field = name.to_string();
            cx.loads.load(
                cx.host,
                key.clone(),
                node,
                slot,
                move |loaded: Loaded<'_, H, H::Node, H::Resource>| {
                    if loaded.cx.is_alive(loaded.requester) {
                        loaded
                            .cx
                            .set_field_resource(loaded.requester, facet, &field, loaded.resource);
                    }
                },
            );
        }
        value => {
            // The field may have held an asset last pass
            cx.loads.cancel(node, slot);
            cx.host.set_field(node, facet, name, value);
        }
    }
}

impl<H: FieldHost> Component<H> for Fields {
    fn kind(&self) -> ComponentKind {
        ComponentKind::new(self.facet)
    }

    fn sync(&self, cx: &mut SyncContext<'_, H>, node: H::Node, prev: Option<&Self>) {
        let facet = self.facet;
        let empty = BTreeMap::new();
        let prev_values = match prev {
            Some(prev) => &prev.values,
            None => {
                cx.host.attach_facet(node, facet);
                &empty
            }
        };

        merge(
            prev_values,
            &self.values,
            cx,
            |name, value, cx| {
                if matches!(value, FieldValue::Asset(_)) {
                    cx.loads.cancel(node, CallbackSlot::labeled(facet, name));
                }
                cx.host.clear_field(node, facet, name);
                cx
            },
            |name, prev, next, cx| {
                if prev != next {
                    apply(cx, node, facet, name, next);
                }
                cx
            },
            |name, value, cx| {
                apply(cx, node, facet, name, value);
                cx
            },
        );
    }

    fn remove(&self, cx: &mut SyncContext<'_, H>, node: H::Node) {
        for (name, value) in &self.values {
            if matches!(value, FieldValue::Asset(_)) {
                cx.loads.cancel(node, CallbackSlot::labeled(self.facet, name));
            }
        }
        cx.host.detach_facet(node, self.facet);
    }
}
