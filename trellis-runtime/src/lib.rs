//! Runtime half of trellis: keeps a live UI tree in step with freshly built
//! virtual trees.
//!
//! The live toolkit is reached only through [`Toolkit`]. Generated view code
//! names this crate (`::trellis_runtime::VNode` and friends), so the virtual
//! tree types are re-exported here.

pub mod host;
pub mod memory;
pub mod reconcile;

pub use host::{HostBinding, Rebuild, perform_rebuild};
pub use memory::{LiveId, MemoryToolkit, Op};
pub use reconcile::{ReconcileStats, Reconciler};
pub use trellis_dom::{EventHandler, PropValue, Props, Shape, VNode, h};

/// Capability interface over a live UI toolkit.
///
/// Nodes are created and mutated by name; the reconciler never inspects the
/// toolkit's object model beyond these calls.
pub trait Toolkit {
    /// Handle to a live node. Cheap to clone, compared by identity.
    type Node: Clone + PartialEq + std::fmt::Debug;

    fn construct(&mut self, type_tag: &str) -> Self::Node;
    fn set_property(&mut self, node: &Self::Node, name: &str, value: &PropValue);
    fn add_child(&mut self, parent: &Self::Node, child: Self::Node);
    /// Detach the child at `index`, returning it. The child is not disposed.
    fn remove_child_at(&mut self, parent: &Self::Node, index: usize) -> Option<Self::Node>;
    fn attach_event_handler(&mut self, node: &Self::Node, event: &str, handler: EventHandler);
    fn child_at(&self, parent: &Self::Node, index: usize) -> Option<Self::Node>;

    /// Called once for the root of every live subtree the reconciler drops.
    fn dispose(&mut self, _node: Self::Node) {}
}
