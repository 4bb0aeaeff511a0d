//! Load Cache - de-duplicated fetch-and-notify
//!
//! The LoadCache is the single entry point components use to obtain
//! resources. It guarantees:
//! - At most one in-flight fetch per [`LoadKey`]
//! - Every registered callback runs at most once, in registration order
//! - Resolved resources stay cached until [`LoadCache::clear`]
//!
//! Callbacks receive a [`Loaded`] view that includes the cache itself, so a
//! callback may issue further loads or cancel registrations that have not
//! fired yet.
//!
//! Registrations are numbered in the order they are made. An index from
//! `(requester, slot)` to that number makes replacing or cancelling a
//! registration a map operation, and per-key lists of numbers let a
//! completion visit only its own waiters.
//!
//! Nothing here is thread-safe. Loaders that finish on other threads send
//! their results through the completion channel, and [`LoadCache::pump`]
//! delivers them on the owning thread.

use crate::key::{CallbackSlot, LoadKey};
use crate::loader::{Completion, LoadCompleter, ResourceLoader};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// How a load for an already-resolved key is delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitDelivery {
    /// Queue the callback for the next [`LoadCache::pump`]
    ///
    /// Callbacks never run inside the caller of `load`, so a hit cannot
    /// re-enter a reconciliation pass.
    #[default]
    Deferred,
    /// Invoke the callback before `load` returns
    Immediate,
}

/// Load cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadCacheConfig {
    /// Delivery of cache hits
    pub hit_delivery: HitDelivery,
    /// Warn once the pending list grows past this many entries
    pub pending_warn_threshold: usize,
}

impl Default for LoadCacheConfig {
    fn default() -> Self {
        Self {
            hit_delivery: HitDelivery::Deferred,
            pending_warn_threshold: 256,
        }
    }
}

impl LoadCacheConfig {
    /// Set hit delivery
    pub fn with_hit_delivery(mut self, hit_delivery: HitDelivery) -> Self {
        self.hit_delivery = hit_delivery;
        self
    }
}

/// Statistics about cache usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Fetches handed to the loader
    pub fetches: u64,
    /// Loads answered from the cache
    pub hits: u64,
    /// Successful completions
    pub completions: u64,
    /// Failed completions
    pub failures: u64,
    /// Completions dropped because of a reset
    pub stale: u64,
    /// Callbacks invoked
    pub callbacks: u64,
}

/// What a load callback gets to work with
pub struct Loaded<'a, Cx, N, R> {
    /// Caller-provided context (usually the host adapter)
    pub cx: &'a mut Cx,
    /// The cache, for follow-up loads
    pub cache: &'a mut LoadCache<Cx, N, R>,
    /// Node that asked for the resource
    pub requester: N,
    /// Key that was resolved
    pub key: LoadKey,
    /// The resolved resource
    pub resource: R,
}

/// Callback run once a resource is available
pub type OnLoaded<Cx, N, R> = Box<dyn FnOnce(Loaded<'_, Cx, N, R>)>;

/// Registration order
type Seq = u64;

struct PendingLoad<Cx, N, R> {
    key: LoadKey,
    requester: N,
    slot: CallbackSlot,
    on_loaded: OnLoaded<Cx, N, R>,
}

struct ReadyLoad<Cx, N, R> {
    entry: PendingLoad<Cx, N, R>,
    resource: R,
}

/// De-duplicating asynchronous resource cache
///
/// `Cx` is the context handed to callbacks, `N` identifies requesting nodes
/// and `R` is the resource handle produced by the loader.
pub struct LoadCache<Cx, N, R> {
    config: LoadCacheConfig,
    loader: Box<dyn ResourceLoader<Resource = R>>,
    /// Resolved resources
    resolved: HashMap<LoadKey, R>,
    /// Keys with a fetch in progress
    in_flight: HashSet<LoadKey>,
    /// Callbacks waiting on a fetch
    pending: BTreeMap<Seq, PendingLoad<Cx, N, R>>,
    /// Pending registrations per key, ascending; may hold cancelled numbers
    waiters: HashMap<LoadKey, Vec<Seq>>,
    /// Deferred cache hits
    ready: BTreeMap<Seq, ReadyLoad<Cx, N, R>>,
    /// Live registration per requester and slot
    registrations: HashMap<(N, CallbackSlot), Seq>,
    next_seq: Seq,
    completion_tx: Sender<Completion<R>>,
    completion_rx: Receiver<Completion<R>>,
    /// Bumped by `reset` to invalidate fetches started before it
    generation: u64,
    warned_pending: bool,
    stats: CacheStats,
}

impl<Cx, N, R> LoadCache<Cx, N, R>
where
    N: Copy + Eq + Hash + Debug,
    R: Clone,
{
    /// Create a new cache around a loader
    pub fn new(loader: impl ResourceLoader<Resource = R> + 'static, config: LoadCacheConfig) -> Self {
        let (completion_tx, completion_rx) = unbounded();
        Self {
            config,
            loader: Box::new(loader),
            resolved: HashMap::new(),
            in_flight: HashSet::new(),
            pending: BTreeMap::new(),
            waiters: HashMap::new(),
            ready: BTreeMap::new(),
            registrations: HashMap::new(),
            next_seq: 0,
            completion_tx,
            completion_rx,
            generation: 0,
            warned_pending: false,
            stats: CacheStats::default(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &LoadCacheConfig {
        &self.config
    }

    /// Request `key` on behalf of `requester`
    ///
    /// A previous registration from the same requester and slot is dropped
    /// first, so only the latest request through a slot ever fires.
    pub fn load<F>(&mut self, cx: &mut Cx, key: LoadKey, requester: N, slot: CallbackSlot, on_loaded: F)
    where
        F: FnOnce(Loaded<'_, Cx, N, R>) + 'static,
    {
        self.cancel(requester, slot);

        let entry = PendingLoad {
            key,
            requester,
            slot,
            on_loaded: Box::new(on_loaded),
        };

        if let Some(resource) = self.resolved.get(&entry.key).cloned() {
            self.stats.hits += 1;
            match self.config.hit_delivery {
                HitDelivery::Immediate => self.invoke(cx, entry, resource),
                HitDelivery::Deferred => {
                    let seq = self.register(requester, slot);
                    self.ready.insert(seq, ReadyLoad { entry, resource });
                }
            }
            return;
        }

        let seq = self.register(requester, slot);
        let start_fetch = self.in_flight.insert(entry.key.clone());
        let key = entry.key.clone();
        self.waiters.entry(key.clone()).or_default().push(seq);
        self.pending.insert(seq, entry);
        self.check_pending_size();

        if start_fetch {
            self.stats.fetches += 1;
            log::debug!("Fetching {}", key);
            let completer = LoadCompleter::new(key.clone(), self.generation, self.completion_tx.clone());
            self.loader.fetch(&key, completer);
        }
    }

    /// Drop the registration of `requester` through `slot`
    ///
    /// The fetch itself keeps running and still fills the cache.
    pub fn cancel(&mut self, requester: N, slot: CallbackSlot) -> bool {
        match self.registrations.remove(&(requester, slot)) {
            Some(seq) => self.pending.remove(&seq).is_some() || self.ready.remove(&seq).is_some(),
            None => false,
        }
    }

    fn register(&mut self, requester: N, slot: CallbackSlot) -> Seq {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.registrations.insert((requester, slot), seq);
        seq
    }

    fn unregister(&mut self, entry: &PendingLoad<Cx, N, R>) {
        self.registrations.remove(&(entry.requester, entry.slot));
    }

    /// Deliver deferred hits and finished fetches
    ///
    /// Hits queued by callbacks during this call wait for the next pump.
    /// Returns the number of callbacks invoked.
    pub fn pump(&mut self, cx: &mut Cx) -> usize {
        let mut invoked = 0;

        let boundary = self.next_seq;
        while let Some(first) = self.ready.first_entry() {
            if *first.key() >= boundary {
                break;
            }
            let ReadyLoad { entry, resource } = first.remove();
            self.unregister(&entry);
            self.invoke(cx, entry, resource);
            invoked += 1;
        }

        let completions: Vec<_> = self.completion_rx.try_iter().collect();
        for completion in completions {
            invoked += self.finish(cx, completion);
        }

        invoked
    }

    fn finish(&mut self, cx: &mut Cx, completion: Completion<R>) -> usize {
        let Completion {
            key,
            generation,
            result,
        } = completion;

        if generation != self.generation {
            log::debug!("Dropping stale completion for {}", key);
            self.stats.stale += 1;
            return 0;
        }
        self.in_flight.remove(&key);

        let resource = match result {
            Ok(resource) => resource,
            Err(e) => {
                log::warn!("Failed to load {}: {}", key, e);
                self.stats.failures += 1;
                return 0;
            }
        };
        self.stats.completions += 1;
        self.resolved.insert(key.clone(), resource.clone());

        // Waiters registered by callbacks below see a resolved key and never
        // join this list
        let waiting = self.waiters.remove(&key).unwrap_or_default();
        let mut invoked = 0;
        for seq in waiting {
            // Earlier callbacks may have cancelled later waiters
            let Some(entry) = self.pending.remove(&seq) else {
                continue;
            };
            self.unregister(&entry);
            self.invoke(cx, entry, resource.clone());
            invoked += 1;
        }
        log::trace!("Resolved {} for {} waiting callbacks", key, invoked);

        invoked
    }

    fn invoke(&mut self, cx: &mut Cx, entry: PendingLoad<Cx, N, R>, resource: R) {
        self.stats.callbacks += 1;
        let PendingLoad {
            key,
            requester,
            on_loaded,
            ..
        } = entry;
        on_loaded(Loaded {
            cx,
            cache: self,
            requester,
            key,
            resource,
        });
    }

    fn check_pending_size(&mut self) {
        if !self.warned_pending && self.pending.len() > self.config.pending_warn_threshold {
            self.warned_pending = true;
            log::warn!(
                "{} loads pending across {} fetches; is the loader completing?",
                self.pending.len(),
                self.in_flight.len()
            );
        }
    }

    /// Forget every resolved resource
    ///
    /// Pending requests and in-flight fetches are left alone.
    pub fn clear(&mut self) {
        self.resolved.clear();
    }

    /// Forget everything, including pending callbacks
    ///
    /// Fetches started before the reset are ignored when they complete.
    pub fn reset(&mut self) {
        self.resolved.clear();
        self.in_flight.clear();
        self.pending.clear();
        self.waiters.clear();
        self.ready.clear();
        self.registrations.clear();
        self.generation += 1;
        self.warned_pending = false;
    }

    /// Get a resolved resource
    pub fn get(&self, key: &LoadKey) -> Option<&R> {
        self.resolved.get(key)
    }

    /// Check if a key is resolved
    pub fn is_resolved(&self, key: &LoadKey) -> bool {
        self.resolved.contains_key(key)
    }

    /// Check if a fetch is running for a key
    pub fn is_in_flight(&self, key: &LoadKey) -> bool {
        self.in_flight.contains(key)
    }

    /// Callbacks waiting on fetches
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deferred hits waiting for the next pump
    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    /// Number of resolved resources
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Get statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
