//! Reconciler - diffs two scene snapshots onto the host tree
//!
//! One pass walks the previous and next snapshots together, node by node:
//! 1. Node attributes (active, name, static, identity key) that changed
//! 2. Publish token registration
//! 3. Components: removed, synced against the previous payload, or created
//! 4. Children: removed subtrees destroyed, new ones created, matched ones
//!    visited recursively
//!
//! After the walk every queued reference subscription is resolved. The pass
//! never fails; a malformed snapshot is applied as far as it makes sense.

use crate::component::{ComponentRecord, Scene, SyncContext};
use crate::host::HostAdapter;
use void_scene::{merge, ComponentKind};

/// Counters for one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Host nodes created
    pub created: usize,
    /// Host subtrees destroyed
    pub destroyed: usize,
    /// Component syncs (create and update)
    pub syncs: usize,
    /// Component removals
    pub removals: usize,
    /// Node attribute writes
    pub attribute_writes: usize,
    /// Publish tokens registered
    pub published: usize,
    /// References resolved to a node
    pub resolved: usize,
    /// References resolved to nothing
    pub unresolved: usize,
}

impl PassStats {
    /// Total number of structural host mutations
    pub fn structural_changes(&self) -> usize {
        self.created + self.destroyed + self.attribute_writes
    }
}

/// Apply the difference between `prev` and `next` to `root`
///
/// `root` is the host node corresponding to the top of both snapshots.
pub fn reconcile<H: HostAdapter>(
    prev: &Scene<H>,
    next: &Scene<H>,
    root: H::Node,
    cx: &mut SyncContext<'_, H>,
) -> PassStats {
    cx.refs.begin_pass();

    let mut pass = Pass {
        cx: SyncContext {
            host: &mut *cx.host,
            loads: &mut *cx.loads,
            refs: &mut *cx.refs,
        },
        stats: PassStats::default(),
    };
    pass.node(prev, next, root);

    let Pass { mut stats, cx: inner } = pass;
    let (resolved, unresolved) = inner.refs.resolve(inner.host);
    stats.resolved = resolved;
    stats.unresolved = unresolved;

    log::debug!("Reconciled '{}': {:?}", next.name(), stats);
    stats
}

struct Pass<'a, H: HostAdapter> {
    cx: SyncContext<'a, H>,
    stats: PassStats,
}

impl<'a, H: HostAdapter> Pass<'a, H> {
    fn node(&mut self, prev: &Scene<H>, next: &Scene<H>, host: H::Node) {
        self.attributes(prev, next, host);

        if let Some(token) = next.publish_token() {
            self.cx.refs.publish(token, host);
            self.stats.published += 1;
        }

        merge(
            prev.components(),
            next.components(),
            &mut *self,
            |_, record, pass| {
                pass.remove_component(record, host);
                pass
            },
            |kind, prev, next, pass| {
                pass.update_component(*kind, prev, next, host);
                pass
            },
            |_, record, pass| {
                pass.sync_component(record, None, host);
                pass
            },
        );

        merge(
            prev.children(),
            next.children(),
            &mut *self,
            |name, _, pass| {
                pass.destroy_child(host, name);
                pass
            },
            |name, prev, next, pass| {
                pass.visit_child(host, name, prev, next);
                pass
            },
            |name, next, pass| {
                pass.create_child(host, name, next);
                pass
            },
        );
    }

    fn attributes(&mut self, prev: &Scene<H>, next: &Scene<H>, host: H::Node) {
        let host_adapter = &mut *self.cx.host;
        let mut writes = 0;

        if prev.is_inactive() != next.is_inactive() {
            host_adapter.set_active(host, !next.is_inactive());
            writes += 1;
        }
        if prev.name() != next.name() {
            host_adapter.set_name(host, next.name());
            writes += 1;
        }
        if prev.is_static() != next.is_static() {
            host_adapter.set_static(host, next.is_static());
            writes += 1;
        }
        if prev.identity_key() != next.identity_key() {
            host_adapter.set_identity_key(host, next.identity_key());
            writes += 1;
        }

        self.stats.attribute_writes += writes;
    }

    fn sync_component(&mut self, record: &ComponentRecord<H>, prev: Option<&ComponentRecord<H>>, host: H::Node) {
        record.sync(&mut self.cx, host, prev);
        self.stats.syncs += 1;
    }

    fn remove_component(&mut self, record: &ComponentRecord<H>, host: H::Node) {
        record.remove(&mut self.cx, host);
        self.stats.removals += 1;
    }

    fn update_component(
        &mut self,
        kind: ComponentKind,
        prev: &ComponentRecord<H>,
        next: &ComponentRecord<H>,
        host: H::Node,
    ) {
        if next.same_type(prev) {
            self.sync_component(next, Some(prev), host);
        } else {
            log::trace!("Component {} changed type on {:?}", kind, host);
            self.remove_component(prev, host);
            self.sync_component(next, None, host);
        }
    }

    fn destroy_child(&mut self, parent: H::Node, name: &str) {
        match self.cx.host.child(parent, name) {
            Some(child) => {
                self.cx.host.destroy_node(child);
                self.stats.destroyed += 1;
            }
            None => log::debug!("Child '{}' of {:?} already gone", name, parent),
        }
    }

    fn create_child(&mut self, parent: H::Node, name: &str, next: &Scene<H>) {
        let child = self.cx.host.create_node(parent, name);
        self.stats.created += 1;

        // Fresh host nodes start out matching an empty node of the same name
        let placeholder = Scene::<H>::new(name);
        self.node(&placeholder, next, child);
    }

    fn visit_child(&mut self, parent: H::Node, name: &str, prev: &Scene<H>, next: &Scene<H>) {
        match self.cx.host.child(parent, name) {
            Some(child) => self.node(prev, next, child),
            None => {
                log::warn!("Host lost child '{}' of {:?}, recreating", name, parent);
                self.create_child(parent, name, next);
            }
        }
    }
}
