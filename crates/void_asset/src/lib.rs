//! # void_asset - De-duplicating Resource Load Cache
//!
//! Asynchronous resource loading with:
//! - One fetch per (address, kind) no matter how many nodes ask
//! - Per-(node, slot) callback registrations where the latest request wins
//! - Pluggable loaders completing from any thread
//! - Cache hits delivered immediately or on the next pump
//!
//! ## Example
//!
//! ```ignore
//! use void_asset::prelude::*;
//!
//! let loader = FnLoader::new(|key: &LoadKey, completer: LoadCompleter<MeshId>| {
//!     spawn_fetch(key.address().to_owned(), completer);
//! });
//! let mut cache = LoadCache::new(loader, LoadCacheConfig::default());
//!
//! let key = LoadKey::new("meshes/cube", ResourceKind::MESH);
//! cache.load(&mut host, key, node, CallbackSlot::new("mesh"), |loaded| {
//!     loaded.cx.set_mesh(loaded.requester, Some(loaded.resource));
//! });
//!
//! // Once per frame
//! cache.pump(&mut host);
//! ```

pub mod cache;
pub mod key;
pub mod loader;

pub use cache::{CacheStats, HitDelivery, LoadCache, LoadCacheConfig, Loaded, OnLoaded};
pub use key::{CallbackSlot, LoadKey, ResourceKind};
pub use loader::{loaders, LoadCompleter, LoadError, LoadResult, ResourceLoader};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::cache::{HitDelivery, LoadCache, LoadCacheConfig, Loaded};
    pub use crate::key::{CallbackSlot, LoadKey, ResourceKind};
    pub use crate::loader::loaders::{FnLoader, NullLoader};
    pub use crate::loader::{LoadCompleter, LoadError, ResourceLoader};
}
