//! Deferred reference resolution
//!
//! Components sometimes need the live handle of another node in the same
//! scene, which may not have been visited yet. During a pass every node with
//! a publish token registers itself, and subscriptions are only queued. Once
//! the walk is done [`RefResolver::resolve`] answers every queued request
//! exactly once: with the published node, or with `None` when nothing
//! published the token this pass.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use void_scene::PublishToken;

/// What a reference callback gets to work with
pub struct Resolved<'a, Cx, N> {
    /// Caller-provided context (usually the host adapter)
    pub cx: &'a mut Cx,
    /// Node that subscribed
    pub requester: N,
    /// Token that was looked up
    pub token: PublishToken,
    /// Published node, if any
    pub target: Option<N>,
}

/// Callback run once a reference is resolved
pub type OnResolved<Cx, N> = Box<dyn FnOnce(Resolved<'_, Cx, N>)>;

struct PendingReference<Cx, N> {
    token: PublishToken,
    requester: N,
    on_resolved: OnResolved<Cx, N>,
}

/// Per-pass publish/subscribe registry
pub struct RefResolver<Cx, N> {
    published: HashMap<PublishToken, N>,
    queue: Vec<PendingReference<Cx, N>>,
}

impl<Cx, N> RefResolver<Cx, N>
where
    N: Copy + Eq + Hash + Debug,
{
    /// Create an empty resolver
    pub fn new() -> Self {
        Self {
            published: HashMap::new(),
            queue: Vec::new(),
        }
    }

    /// Forget everything from the previous pass
    pub fn begin_pass(&mut self) {
        if !self.queue.is_empty() {
            log::warn!("{} references were never resolved", self.queue.len());
        }
        self.published.clear();
        self.queue.clear();
    }

    /// Register `node` under `token`
    ///
    /// The first node to publish a token in a pass keeps it.
    pub fn publish(&mut self, token: PublishToken, node: N) -> bool {
        match self.published.get(&token) {
            Some(first) if *first != node => {
                log::warn!("Token {} already published by {:?}, ignoring {:?}", token, first, node);
                false
            }
            Some(_) => true,
            None => {
                self.published.insert(token, node);
                true
            }
        }
    }

    /// Queue a lookup of `token` on behalf of `requester`
    pub fn subscribe<F>(&mut self, token: PublishToken, requester: N, on_resolved: F)
    where
        F: FnOnce(Resolved<'_, Cx, N>) + 'static,
    {
        self.queue.push(PendingReference {
            token,
            requester,
            on_resolved: Box::new(on_resolved),
        });
    }

    /// Answer every queued subscription, in subscription order
    ///
    /// Returns `(resolved, unresolved)` counts.
    pub fn resolve(&mut self, cx: &mut Cx) -> (usize, usize) {
        let mut resolved = 0;
        let mut unresolved = 0;

        for pending in std::mem::take(&mut self.queue) {
            let target = self.published.get(&pending.token).copied();
            if target.is_some() {
                resolved += 1;
            } else {
                log::trace!("Token {} not published this pass", pending.token);
                unresolved += 1;
            }
            (pending.on_resolved)(Resolved {
                cx: &mut *cx,
                requester: pending.requester,
                token: pending.token,
                target,
            });
        }

        (resolved, unresolved)
    }

    /// Look up a token published this pass
    pub fn lookup(&self, token: PublishToken) -> Option<N> {
        self.published.get(&token).copied()
    }

    /// Number of queued subscriptions
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Number of tokens published this pass
    pub fn published_count(&self) -> usize {
        self.published.len()
    }

    /// Drop all state without warning
    pub fn clear(&mut self) {
        self.published.clear();
        self.queue.clear();
    }
}

impl<Cx, N> Default for RefResolver<Cx, N>
where
    N: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
