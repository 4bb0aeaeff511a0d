//! Presenter session
//!
//! A [`Presenter`] owns everything one presentation session needs: the host
//! adapter, the host root node, the retained previous scene, the load cache,
//! the reference resolver and the token allocator. Several sessions can run
//! side by side without sharing state.

use crate::component::{HostLoadCache, HostRefResolver, Scene, SyncContext};
use crate::config::PresenterConfig;
use crate::error::Result;
use crate::host::HostAdapter;
use crate::reconcile::{reconcile, PassStats};
use void_asset::{LoadCache, ResourceLoader};
use void_scene::{PublishToken, TokenAllocator};

/// Reconciling presenter bound to one host tree
pub struct Presenter<H: HostAdapter> {
    config: PresenterConfig,
    host: H,
    root: H::Node,
    /// Last applied scene; `None` until the first pass and after a reset
    previous: Option<Scene<H>>,
    /// Scene waiting for the next flush
    pending: Option<Scene<H>>,
    loads: HostLoadCache<H>,
    refs: HostRefResolver<H>,
    tokens: TokenAllocator,
    passes: u64,
}

impl<H: HostAdapter> Presenter<H> {
    /// Create a new presenter
    pub fn new(
        host: H,
        root: H::Node,
        loader: impl ResourceLoader<Resource = H::Resource> + 'static,
        config: PresenterConfig,
    ) -> Self {
        let loads = LoadCache::new(loader, config.loads.clone());
        Self {
            config,
            host,
            root,
            previous: None,
            pending: None,
            loads,
            refs: HostRefResolver::<H>::new(),
            tokens: TokenAllocator::new(),
            passes: 0,
        }
    }

    /// Submit the next scene
    ///
    /// Replaces any scene that has not been flushed yet. With validation
    /// enabled an invalid scene is still presented, with a warning.
    pub fn present(&mut self, next: Scene<H>) {
        if self.config.validate_scenes {
            if let Err(e) = next.validate() {
                log::warn!("Presenting invalid scene: {}", e);
            }
        }
        self.replace_pending(next);
    }

    /// Submit the next scene, rejecting it if it fails validation
    ///
    /// A rejected scene leaves any unflushed scene in place.
    pub fn present_checked(&mut self, next: Scene<H>) -> Result<()> {
        next.validate()?;
        self.replace_pending(next);
        Ok(())
    }

    fn replace_pending(&mut self, next: Scene<H>) {
        if self.pending.replace(next).is_some() {
            log::trace!("Dropping unflushed scene");
        }
    }

    /// Check if a scene is waiting for the next flush
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run a reconciliation pass for the pending scene
    ///
    /// Returns `None` when nothing was presented since the last flush.
    /// Load callbacks queued by the pass are delivered before returning.
    pub fn flush(&mut self) -> Option<PassStats> {
        let next = self.pending.take()?;

        let placeholder;
        let prev = match &self.previous {
            Some(prev) => prev,
            None => {
                placeholder = Scene::<H>::new(next.name());
                &placeholder
            }
        };

        let mut cx = SyncContext {
            host: &mut self.host,
            loads: &mut self.loads,
            refs: &mut self.refs,
        };
        let stats = reconcile(prev, &next, self.root, &mut cx);
        let delivered = self.loads.pump(&mut self.host);

        self.previous = Some(next);
        self.passes += 1;
        log::trace!("Pass {} done, {} load callbacks delivered", self.passes, delivered);

        Some(stats)
    }

    /// Deliver finished loads
    ///
    /// Returns the number of callbacks invoked.
    pub fn pump_loads(&mut self) -> usize {
        self.loads.pump(&mut self.host)
    }

    /// Per-frame entry point: deliver loads, then flush
    pub fn tick(&mut self) -> Option<PassStats> {
        self.pump_loads();
        self.flush()
    }

    /// Tear down what was presented and start over
    ///
    /// The host root survives with its components removed and its
    /// attributes back to their defaults. The next flush recreates
    /// everything, and resources are fetched again.
    pub fn reset(&mut self) {
        self.destroy_presented();
        self.loads.reset();
        self.refs.clear();
        log::debug!("Presenter reset after {} passes", self.passes);
    }

    /// End the session and hand the host back
    pub fn shutdown(mut self) -> H {
        self.destroy_presented();
        log::debug!("Presenter shut down after {} passes", self.passes);
        self.host
    }

    /// Reconcile the last applied scene against a bare root
    fn destroy_presented(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        let bare = Scene::<H>::new(previous.name());
        let mut cx = SyncContext {
            host: &mut self.host,
            loads: &mut self.loads,
            refs: &mut self.refs,
        };
        let stats = reconcile(&previous, &bare, self.root, &mut cx);
        log::trace!("Tore down presented scene: {:?}", stats);
    }

    /// Allocate a publish token for this session
    pub fn allocate_token(&self) -> PublishToken {
        self.tokens.next()
    }

    /// Get the token allocator
    pub fn tokens(&self) -> &TokenAllocator {
        &self.tokens
    }

    /// Get the host adapter
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Get the host adapter mutably
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Get the host root node
    pub fn root(&self) -> H::Node {
        self.root
    }

    /// Get the last applied scene
    pub fn previous(&self) -> Option<&Scene<H>> {
        self.previous.as_ref()
    }

    /// Get the load cache
    pub fn loads(&self) -> &HostLoadCache<H> {
        &self.loads
    }

    /// Get the load cache mutably
    pub fn loads_mut(&mut self) -> &mut HostLoadCache<H> {
        &mut self.loads
    }

    /// Get the configuration
    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    /// Number of passes run
    pub fn pass_count(&self) -> u64 {
        self.passes
    }
}
