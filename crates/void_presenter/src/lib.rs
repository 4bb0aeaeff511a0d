//! # Void Presenter
//!
//! Declarative scene presentation for Void Engine:
//! - Diffs immutable scene snapshots against the last presented one
//! - Applies only the difference to a host-owned node tree
//! - Keeps host node identity stable across frames (same name, same path)
//! - Loads resources through a de-duplicating cache
//! - Resolves same-pass references between nodes
//!
//! ## Architecture
//!
//! ```text
//! Producer ──► present(scene) ──► Presenter ──► HostAdapter
//!                                    │  ▲
//!                                    ▼  │ callbacks
//!                          LoadCache / RefResolver
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use void_presenter::prelude::*;
//!
//! let mut presenter = Presenter::new(host, root, loader, PresenterConfig::default());
//!
//! presenter.present(
//!     Scene::new("root").with_child(
//!         Scene::new("cube")
//!             .with(Transform::from_position(Vec3::ZERO))
//!             .with(MeshFilter::new("meshes/cube")),
//!     ),
//! );
//!
//! // Once per frame
//! presenter.tick();
//! ```

pub mod component;
pub mod components;
pub mod config;
pub mod error;
pub mod host;
pub mod presenter;
pub mod reconcile;
pub mod refs;

pub use component::{
    Component, ComponentRecord, ErasedComponent, HostLoadCache, HostRefResolver, Scene, SceneExt, SyncContext,
};
pub use config::PresenterConfig;
pub use error::{PresenterError, Result};
pub use host::HostAdapter;
pub use presenter::Presenter;
pub use reconcile::{reconcile, PassStats};
pub use refs::{OnResolved, RefResolver, Resolved};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::component::{Component, Scene, SceneExt, SyncContext};
    pub use crate::components::*;
    pub use crate::config::PresenterConfig;
    pub use crate::host::HostAdapter;
    pub use crate::presenter::Presenter;
    pub use crate::reconcile::PassStats;
    pub use glam::{Quat, Vec3};
    pub use void_asset::{HitDelivery, LoadKey, ResourceKind};
    pub use void_scene::{ComponentKind, IdentityKey, PublishToken};
}
