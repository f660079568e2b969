//! The rebuild contract between a UI-bearing host and the reconciler.

use log::debug;
use trellis_dom::VNode;

use crate::{ReconcileStats, Reconciler, Toolkit};

/// Implemented by every host type that has a companion markup document;
/// the template compiler generates the impl.
pub trait Rebuild {
    /// Build a fresh virtual tree from the host's current state.
    fn build_virtual_tree(&self) -> VNode;
}

/// A host together with its retained virtual tree and live root.
///
/// Both slots start empty. The first rebuild creates the live tree; every
/// later one diffs against the retained tree. Rebuilds must be serialized by
/// the caller, typically by only calling them from the UI thread.
pub struct HostBinding<H, N> {
    host: H,
    previous_tree: Option<VNode>,
    live_root: Option<N>,
    last_stats: ReconcileStats,
}

impl<H: Rebuild, N: Clone> HostBinding<H, N> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            previous_tree: None,
            live_root: None,
            last_stats: ReconcileStats::default(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn previous_tree(&self) -> Option<&VNode> {
        self.previous_tree.as_ref()
    }

    pub fn live_root(&self) -> Option<&N> {
        self.live_root.as_ref()
    }

    /// Counters from the most recent [`HostBinding::rebuild`].
    pub fn last_stats(&self) -> ReconcileStats {
        self.last_stats
    }

    /// Build, reconcile, and replace both slots. Returns the live root,
    /// which differs from the previous one when the root type changed.
    pub fn rebuild<T>(&mut self, toolkit: &mut T) -> Option<&N>
    where
        T: Toolkit<Node = N>,
    {
        self.last_stats = perform_rebuild(
            &self.host,
            &mut self.previous_tree,
            &mut self.live_root,
            toolkit,
        );
        self.live_root.as_ref()
    }
}

/// Rebuild over explicitly held slots.
pub fn perform_rebuild<H, T>(
    host: &H,
    previous_tree: &mut Option<VNode>,
    live_root: &mut Option<T::Node>,
    toolkit: &mut T,
) -> ReconcileStats
where
    H: Rebuild + ?Sized,
    T: Toolkit,
{
    let next = host.build_virtual_tree();
    let mut reconciler = Reconciler::new(toolkit);
    *live_root = reconciler.reconcile(live_root.take(), previous_tree.as_ref(), Some(&next));
    let stats = reconciler.stats();
    debug!(
        "rebuild {}: created={} reused={} disposed={} detached={} attached={}",
        next.type_tag, stats.created, stats.reused, stats.disposed, stats.detached, stats.attached
    );
    *previous_tree = Some(next);
    stats
}
