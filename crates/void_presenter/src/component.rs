//! Component sync protocol
//!
//! Every component kind implements [`Component`] against the host facets it
//! needs. A kind compares its own previous and next payloads and applies only
//! what changed; the reconciler never short-circuits on equality.
//!
//! Scenes store components as [`ComponentRecord`]s: shared, type-erased
//! payloads that remember how to sync themselves. The erased layer performs
//! the downcast of the previous payload, so kinds only ever see their own
//! type.
//!
//! ## Example
//!
//! ```ignore
//! #[derive(Debug, PartialEq)]
//! struct Tint(Vec4);
//!
//! impl<H: TintHost> Component<H> for Tint {
//!     fn kind(&self) -> ComponentKind {
//!         ComponentKind::new("tint")
//!     }
//!
//!     fn sync(&self, cx: &mut SyncContext<'_, H>, node: H::Node, prev: Option<&Self>) {
//!         if prev != Some(self) {
//!             cx.host.set_tint(node, self.0);
//!         }
//!     }
//!
//!     fn remove(&self, cx: &mut SyncContext<'_, H>, node: H::Node) {
//!         cx.host.clear_tint(node);
//!     }
//! }
//! ```

use crate::host::HostAdapter;
use crate::refs::RefResolver;
use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::Arc;
use void_asset::LoadCache;
use void_scene::{ComponentKind, HasKind, SceneNode};

/// Load cache as seen by components of host `H`
pub type HostLoadCache<H> =
    LoadCache<H, <H as HostAdapter>::Node, <H as HostAdapter>::Resource>;

/// Reference resolver as seen by components of host `H`
pub type HostRefResolver<H> = RefResolver<H, <H as HostAdapter>::Node>;

/// Everything a component may touch while syncing
pub struct SyncContext<'a, H: HostAdapter> {
    /// The host tree
    pub host: &'a mut H,
    /// Resource load cache
    pub loads: &'a mut HostLoadCache<H>,
    /// Same-pass reference resolver
    pub refs: &'a mut HostRefResolver<H>,
}

/// A typed component kind
pub trait Component<H: HostAdapter>: PartialEq + Debug + 'static {
    /// Category of this payload
    fn kind(&self) -> ComponentKind;

    /// Bring the host facet in line with `self`
    ///
    /// `prev` is `None` when the component is new on the node. Must do
    /// nothing when `prev == Some(self)`.
    fn sync(&self, cx: &mut SyncContext<'_, H>, node: H::Node, prev: Option<&Self>);

    /// Take the facet off the node
    fn remove(&self, cx: &mut SyncContext<'_, H>, node: H::Node);
}

/// Object-safe view of a [`Component`]
pub trait ErasedComponent<H: HostAdapter>: Debug {
    /// Category of this payload
    fn component_kind(&self) -> ComponentKind;

    /// Get as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Compare with another erased payload
    fn dyn_eq(&self, other: &dyn ErasedComponent<H>) -> bool;

    /// Sync against an erased previous payload of the same type
    fn dyn_sync(&self, cx: &mut SyncContext<'_, H>, node: H::Node, prev: Option<&dyn ErasedComponent<H>>);

    /// Remove from the node
    fn dyn_remove(&self, cx: &mut SyncContext<'_, H>, node: H::Node);
}

impl<H: HostAdapter, T: Component<H>> ErasedComponent<H> for T {
    fn component_kind(&self) -> ComponentKind {
        <T as Component<H>>::kind(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ErasedComponent<H>) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn dyn_sync(&self, cx: &mut SyncContext<'_, H>, node: H::Node, prev: Option<&dyn ErasedComponent<H>>) {
        let prev = prev.and_then(|prev| prev.as_any().downcast_ref::<T>());
        <T as Component<H>>::sync(self, cx, node, prev)
    }

    fn dyn_remove(&self, cx: &mut SyncContext<'_, H>, node: H::Node) {
        <T as Component<H>>::remove(self, cx, node)
    }
}

/// Shared, type-erased component payload stored in scenes
pub struct ComponentRecord<H: HostAdapter> {
    inner: Arc<dyn ErasedComponent<H>>,
}

impl<H: HostAdapter> ComponentRecord<H> {
    /// Wrap a component
    pub fn new<T: Component<H>>(component: T) -> Self {
        Self {
            inner: Arc::new(component),
        }
    }

    /// Get the kind
    pub fn kind(&self) -> ComponentKind {
        self.inner.component_kind()
    }

    /// Get the payload as a concrete type
    pub fn downcast_ref<T: Component<H>>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Check the concrete payload type
    pub fn is<T: Component<H>>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }

    /// Check if two records carry the same concrete payload type
    pub fn same_type(&self, other: &Self) -> bool {
        self.inner.as_any().type_id() == other.inner.as_any().type_id()
    }

    pub(crate) fn sync(&self, cx: &mut SyncContext<'_, H>, node: H::Node, prev: Option<&Self>) {
        self.inner.dyn_sync(cx, node, prev.map(|prev| &*prev.inner))
    }

    pub(crate) fn remove(&self, cx: &mut SyncContext<'_, H>, node: H::Node) {
        self.inner.dyn_remove(cx, node)
    }
}

impl<H: HostAdapter> Clone for ComponentRecord<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: HostAdapter> PartialEq for ComponentRecord<H> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.dyn_eq(&*other.inner)
    }
}

impl<H: HostAdapter> Debug for ComponentRecord<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<H: HostAdapter> HasKind for ComponentRecord<H> {
    fn kind(&self) -> ComponentKind {
        self.inner.component_kind()
    }
}

/// Scene snapshot for host `H`
pub type Scene<H> = SceneNode<ComponentRecord<H>>;

/// Builder helpers for [`Scene`]
pub trait SceneExt<H: HostAdapter> {
    /// Add a typed component
    fn with<T: Component<H>>(self, component: T) -> Self;
}

impl<H: HostAdapter> SceneExt<H> for Scene<H> {
    fn with<T: Component<H>>(self, component: T) -> Self {
        self.with_component(ComponentRecord::new(component))
    }
}
