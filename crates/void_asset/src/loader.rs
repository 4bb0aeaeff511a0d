//! Resource Loader - the asynchronous fetch collaborator
//!
//! The cache never fetches anything itself. It hands each key to a
//! [`ResourceLoader`] together with a [`LoadCompleter`]; the loader finishes
//! the request whenever it is ready, from any thread, and the cache picks the
//! result up on its next `pump`.

use crate::key::{LoadKey, ResourceKind};
use crossbeam_channel::Sender;
use thiserror::Error;

/// Error reported by a loader
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// Nothing at the address
    #[error("Resource not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// Data could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
    /// Loader cannot produce this kind
    #[error("Unsupported resource kind: {0}")]
    UnsupportedKind(ResourceKind),
    /// Custom error
    #[error("{0}")]
    Custom(String),
}

/// Result type for resource loading
pub type LoadResult<T> = Result<T, LoadError>;

/// A finished fetch travelling back to the cache
#[derive(Debug)]
pub struct Completion<R> {
    pub(crate) key: LoadKey,
    pub(crate) generation: u64,
    pub(crate) result: LoadResult<R>,
}

/// One-shot handle a loader uses to finish a fetch
///
/// Dropping it without calling [`complete`](Self::complete) or
/// [`fail`](Self::fail) leaves the request pending forever.
#[derive(Debug)]
pub struct LoadCompleter<R> {
    key: LoadKey,
    generation: u64,
    sender: Sender<Completion<R>>,
}

impl<R> LoadCompleter<R> {
    pub(crate) fn new(key: LoadKey, generation: u64, sender: Sender<Completion<R>>) -> Self {
        Self {
            key,
            generation,
            sender,
        }
    }

    /// The key being fetched
    pub fn key(&self) -> &LoadKey {
        &self.key
    }

    /// Finish the fetch with a resource
    pub fn complete(self, resource: R) {
        self.send(Ok(resource));
    }

    /// Finish the fetch with an error
    pub fn fail(self, error: LoadError) {
        self.send(Err(error));
    }

    fn send(self, result: LoadResult<R>) {
        let completion = Completion {
            key: self.key,
            generation: self.generation,
            result,
        };
        if let Err(e) = self.sender.send(completion) {
            log::trace!("Load cache gone, dropping completion for {}", e.0.key);
        }
    }
}

/// Trait for asynchronous resource fetchers
pub trait ResourceLoader {
    /// Handle type produced by this loader
    type Resource;

    /// Start fetching `key`; finish through `completer` now or later
    fn fetch(&mut self, key: &LoadKey, completer: LoadCompleter<Self::Resource>);
}

/// Built-in loaders
pub mod loaders {
    use super::*;

    /// Loader backed by a closure
    pub struct FnLoader<R, F>
    where
        F: FnMut(&LoadKey, LoadCompleter<R>),
    {
        fetch: F,
        _marker: core::marker::PhantomData<fn() -> R>,
    }

    impl<R, F> FnLoader<R, F>
    where
        F: FnMut(&LoadKey, LoadCompleter<R>),
    {
        /// Wrap a closure
        pub fn new(fetch: F) -> Self {
            Self {
                fetch,
                _marker: core::marker::PhantomData,
            }
        }
    }

    impl<R, F> ResourceLoader for FnLoader<R, F>
    where
        F: FnMut(&LoadKey, LoadCompleter<R>),
    {
        type Resource = R;

        fn fetch(&mut self, key: &LoadKey, completer: LoadCompleter<R>) {
            (self.fetch)(key, completer)
        }
    }

    /// Loader that never completes anything
    #[derive(Debug)]
    pub struct NullLoader<R> {
        _marker: core::marker::PhantomData<fn() -> R>,
    }

    impl<R> NullLoader<R> {
        /// Create a new null loader
        pub fn new() -> Self {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    impl<R> Default for NullLoader<R> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<R> ResourceLoader for NullLoader<R> {
        type Resource = R;

        fn fetch(&mut self, key: &LoadKey, _completer: LoadCompleter<R>) {
            log::trace!("NullLoader ignoring {}", key);
        }
    }
}
