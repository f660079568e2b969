//! In-memory live toolkit, backed by a slotmap arena.
//!
//! Every adapter call is appended to an [`Op`] log so tests and tools can see
//! exactly what a reconciliation pass did to the live tree.

use std::collections::HashMap;
use std::fmt::Write as _;

use slotmap::{SlotMap, new_key_type};
use trellis_dom::{EventHandler, PropValue, Shape};

use crate::Toolkit;

new_key_type! {
    /// Handle to a node in a [`MemoryToolkit`].
    pub struct LiveId;
}

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Construct { id: LiveId, type_tag: String },
    SetProperty { id: LiveId, name: String, value: PropValue },
    AddChild { parent: LiveId, child: LiveId },
    RemoveChildAt { parent: LiveId, index: usize },
    AttachHandler { id: LiveId, event: String },
    Dispose { id: LiveId },
}

#[derive(Debug, Clone)]
pub struct LiveNode {
    pub type_tag: String,
    pub properties: HashMap<String, PropValue>,
    pub handlers: Vec<(String, EventHandler)>,
    pub children: Vec<LiveId>,
}

#[derive(Default)]
pub struct MemoryToolkit {
    nodes: SlotMap<LiveId, LiveNode>,
    ops: Vec<Op>,
}

impl MemoryToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: LiveId) -> Option<&LiveNode> {
        self.nodes.get(id)
    }

    pub fn property(&self, id: LiveId, name: &str) -> Option<&PropValue> {
        self.nodes.get(id)?.properties.get(name)
    }

    pub fn children(&self, id: LiveId) -> &[LiveId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Return and clear the op log.
    pub fn take_ops(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    /// Invoke every handler attached to `id` for `event`. Returns how many ran.
    pub fn fire(&self, id: LiveId, event: &str) -> usize {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        // Clone out first: a handler may hold state that is read back later.
        let handlers: Vec<EventHandler> = node
            .handlers
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, h)| h.clone())
            .collect();
        for h in &handlers {
            h.invoke();
        }
        handlers.len()
    }

    /// Depth-first search for the first node with the given type tag.
    pub fn find(&self, root: LiveId, type_tag: &str) -> Option<LiveId> {
        let node = self.nodes.get(root)?;
        if node.type_tag == type_tag {
            return Some(root);
        }
        node.children.iter().find_map(|&c| self.find(c, type_tag))
    }

    pub fn shape(&self, root: LiveId) -> Option<Shape> {
        let node = self.nodes.get(root)?;
        Some(Shape {
            type_tag: node.type_tag.clone(),
            children: node.children.iter().filter_map(|&c| self.shape(c)).collect(),
        })
    }

    /// Indented text rendering of the live tree; properties sorted by name,
    /// handlers listed as `on:<event>`.
    pub fn snapshot(&self, root: LiveId) -> String {
        let mut out = String::new();
        self.write_node(root, 0, &mut out);
        out
    }

    fn write_node(&self, id: LiveId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let _ = write!(out, "{}{}", "  ".repeat(depth), node.type_tag);
        let mut props: Vec<_> = node.properties.iter().collect();
        props.sort_by(|a, b| a.0.cmp(b.0));
        for (k, v) in props {
            let _ = write!(out, " {k}={v:?}");
        }
        for (event, _) in &node.handlers {
            let _ = write!(out, " on:{event}");
        }
        out.push('\n');
        for &c in &node.children {
            self.write_node(c, depth + 1, out);
        }
    }

    fn dispose_subtree(&mut self, id: LiveId) {
        if let Some(node) = self.nodes.remove(id) {
            for c in node.children {
                self.dispose_subtree(c);
            }
        }
    }
}

impl Toolkit for MemoryToolkit {
    type Node = LiveId;

    fn construct(&mut self, type_tag: &str) -> LiveId {
        let id = self.nodes.insert(LiveNode {
            type_tag: type_tag.to_string(),
            properties: HashMap::new(),
            handlers: Vec::new(),
            children: Vec::new(),
        });
        self.ops.push(Op::Construct {
            id,
            type_tag: type_tag.to_string(),
        });
        id
    }

    fn set_property(&mut self, node: &LiveId, name: &str, value: &PropValue) {
        if let Some(n) = self.nodes.get_mut(*node) {
            n.properties.insert(name.to_string(), value.clone());
        }
        self.ops.push(Op::SetProperty {
            id: *node,
            name: name.to_string(),
            value: value.clone(),
        });
    }

    fn add_child(&mut self, parent: &LiveId, child: LiveId) {
        if let Some(n) = self.nodes.get_mut(*parent) {
            n.children.push(child);
        }
        self.ops.push(Op::AddChild {
            parent: *parent,
            child,
        });
    }

    fn remove_child_at(&mut self, parent: &LiveId, index: usize) -> Option<LiveId> {
        let n = self.nodes.get_mut(*parent)?;
        if index >= n.children.len() {
            return None;
        }
        let child = n.children.remove(index);
        self.ops.push(Op::RemoveChildAt {
            parent: *parent,
            index,
        });
        Some(child)
    }

    fn attach_event_handler(&mut self, node: &LiveId, event: &str, handler: EventHandler) {
        if let Some(n) = self.nodes.get_mut(*node) {
            n.handlers.push((event.to_string(), handler));
        }
        self.ops.push(Op::AttachHandler {
            id: *node,
            event: event.to_string(),
        });
    }

    fn child_at(&self, parent: &LiveId, index: usize) -> Option<LiveId> {
        self.nodes.get(*parent)?.children.get(index).copied()
    }

    fn dispose(&mut self, node: LiveId) {
        self.dispose_subtree(node);
        self.ops.push(Op::Dispose { id: node });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_child_at_keeps_node_alive() {
        let mut tk = MemoryToolkit::new();
        let panel = tk.construct("StackPanel");
        let a = tk.construct("TextBlock");
        let b = tk.construct("Button");
        tk.add_child(&panel, a);
        tk.add_child(&panel, b);

        assert_eq!(tk.remove_child_at(&panel, 0), Some(a));
        assert_eq!(tk.children(panel), &[b]);
        assert!(tk.node(a).is_some());
        assert_eq!(tk.remove_child_at(&panel, 5), None);
    }

    #[test]
    fn dispose_drops_descendants() {
        let mut tk = MemoryToolkit::new();
        let panel = tk.construct("StackPanel");
        let inner = tk.construct("StackPanel");
        let leaf = tk.construct("TextBlock");
        tk.add_child(&inner, leaf);
        tk.add_child(&panel, inner);

        tk.dispose(inner);
        assert!(tk.node(inner).is_none());
        assert!(tk.node(leaf).is_none());
        assert_eq!(tk.len(), 1);
    }

    #[test]
    fn snapshot_lists_props_and_handlers() {
        let mut tk = MemoryToolkit::new();
        let button = tk.construct("Button");
        tk.set_property(&button, "Content", &PropValue::from("Go"));
        tk.attach_event_handler(&button, "click", EventHandler::new(|| {}));
        assert_eq!(tk.snapshot(button), "Button Content=Text(\"Go\") on:click\n");
        assert_eq!(tk.fire(button, "click"), 1);
        assert_eq!(tk.fire(button, "focus"), 0);
    }
}
