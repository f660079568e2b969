//! Positional reconciliation of two virtual trees onto a live tree.
//!
//! One call per tree position. Children are matched by index only: no keys,
//! no move detection. A type change at a position always disposes the old
//! live subtree and creates a fresh one.

use log::trace;
use trellis_dom::{PropValue, VNode};

use crate::Toolkit;

/// Counters for one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Live nodes constructed, descendants included.
    pub created: usize,
    /// Live nodes kept and patched in place.
    pub reused: usize,
    /// Live subtrees handed to [`Toolkit::dispose`].
    pub disposed: usize,
    /// `remove_child_at` calls that detached a child.
    pub detached: usize,
    /// `add_child` calls made while reconciling an existing child list.
    pub attached: usize,
}

impl ReconcileStats {
    /// True when the pass did not change the live tree's structure.
    pub fn is_structural_noop(&self) -> bool {
        self.created == 0 && self.disposed == 0 && self.detached == 0 && self.attached == 0
    }
}

pub struct Reconciler<'t, T: Toolkit> {
    toolkit: &'t mut T,
    stats: ReconcileStats,
}

impl<'t, T: Toolkit> Reconciler<'t, T> {
    pub fn new(toolkit: &'t mut T) -> Self {
        Self {
            toolkit,
            stats: ReconcileStats::default(),
        }
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    /// Bring `live` in line with `new`, given that it currently mirrors `old`.
    ///
    /// Returns the live node for this position: the same one when it was
    /// reused, a fresh one when it was created, `None` when `new` is absent.
    pub fn reconcile(
        &mut self,
        live: Option<T::Node>,
        old: Option<&VNode>,
        new: Option<&VNode>,
    ) -> Option<T::Node> {
        match (old, new) {
            (None, None) => {
                if let Some(stale) = live {
                    self.dispose(stale);
                }
                None
            }
            (None, Some(new)) => {
                if let Some(stale) = live {
                    self.dispose(stale);
                }
                Some(self.create(new))
            }
            (Some(_), None) => {
                if let Some(node) = live {
                    self.dispose(node);
                }
                None
            }
            (Some(old), Some(new)) => match live {
                None => Some(self.create(new)),
                Some(node) if old.type_tag != new.type_tag => {
                    trace!("type change {} -> {}", old.type_tag, new.type_tag);
                    self.dispose(node);
                    Some(self.create(new))
                }
                Some(node) => {
                    self.update(&node, old, new);
                    Some(node)
                }
            },
        }
    }

    fn create(&mut self, vnode: &VNode) -> T::Node {
        trace!("construct {}", vnode.type_tag);
        let node = self.toolkit.construct(&vnode.type_tag);
        self.stats.created += 1;

        for (name, value) in sorted_props(vnode) {
            match value {
                PropValue::Handler(handler) => {
                    self.toolkit.attach_event_handler(&node, name, handler.clone())
                }
                _ => self.toolkit.set_property(&node, name, value),
            }
        }
        for child in &vnode.children {
            let live_child = self.create(child);
            self.toolkit.add_child(&node, live_child);
        }
        node
    }

    fn update(&mut self, node: &T::Node, old: &VNode, new: &VNode) {
        self.stats.reused += 1;
        // Handlers keep their identity for the lifetime of the live node.
        for (name, value) in sorted_props(new) {
            if !value.is_handler() {
                self.toolkit.set_property(node, name, value);
            }
        }
        self.reconcile_children(node, old, new);
    }

    fn reconcile_children(&mut self, parent: &T::Node, old: &VNode, new: &VNode) {
        let old_len = old.children.len();
        let new_len = new.children.len();

        let mut detach: Vec<usize> = Vec::new();
        let mut attach: Vec<T::Node> = Vec::new();
        // Set once a position is replaced; `add_child` only appends, so every
        // reused child after it has to move behind the replacement.
        let mut displaced = false;

        for i in 0..old_len.max(new_len) {
            let live = if i < old_len {
                self.toolkit.child_at(parent, i)
            } else {
                None
            };
            let result = self.reconcile(live.clone(), old.children.get(i), new.children.get(i));

            match (result, live) {
                (None, None) => {}
                (None, Some(_)) => detach.push(i),
                (Some(node), None) => attach.push(node),
                (Some(node), Some(prev)) if node == prev => {
                    if displaced {
                        detach.push(i);
                        attach.push(node);
                    }
                }
                (Some(node), Some(_)) => {
                    detach.push(i);
                    attach.push(node);
                    displaced = true;
                }
            }
        }

        for &i in detach.iter().rev() {
            trace!("remove child {i}");
            if self.toolkit.remove_child_at(parent, i).is_some() {
                self.stats.detached += 1;
            }
        }
        for node in attach {
            self.toolkit.add_child(parent, node);
            self.stats.attached += 1;
        }
    }

    fn dispose(&mut self, node: T::Node) {
        trace!("dispose {node:?}");
        self.toolkit.dispose(node);
        self.stats.disposed += 1;
    }
}

// HashMap order is unstable; sort so toolkit calls are deterministic.
fn sorted_props(vnode: &VNode) -> Vec<(&str, &PropValue)> {
    let mut props: Vec<_> = vnode.props.iter().collect();
    props.sort_by(|a, b| a.0.cmp(b.0));
    props
}
