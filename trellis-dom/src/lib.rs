//! Toolkit-independent description of a UI subtree.
//!
//! A rebuild always produces a fresh tree; the reconciler only ever reads
//! the previous one.

use std::collections::HashMap;

mod value;

pub use value::{EventHandler, PropValue};

#[derive(Debug, Clone, PartialEq)]
pub struct VNode {
    pub type_tag: String,
    pub props: Props,
    pub children: Vec<VNode>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Props {
    pub attrs: HashMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self {
            attrs: HashMap::new(),
        }
    }
    pub fn set(mut self, k: impl Into<String>, v: impl Into<PropValue>) -> Self {
        self.attrs.insert(k.into(), v.into());
        self
    }
    pub fn get(&self, k: &str) -> Option<&PropValue> {
        self.attrs.get(k)
    }
    pub fn len(&self) -> usize {
        self.attrs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// Allow concise props creation
impl From<()> for Props {
    fn from(_: ()) -> Self {
        Props::default()
    }
}
impl From<Vec<(&str, &str)>> for Props {
    fn from(v: Vec<(&str, &str)>) -> Self {
        let mut p = Props::new();
        for (k, v) in v {
            p.attrs.insert(k.to_string(), PropValue::from(v));
        }
        p
    }
}

impl VNode {
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`VNode::set`].
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`VNode::push`].
    pub fn child(mut self, child: VNode) -> Self {
        self.children.push(child);
        self
    }

    /// Insert or overwrite a property. Keys stay unique.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.props.attrs.insert(name.into(), value.into());
    }

    pub fn push(&mut self, child: VNode) {
        self.children.push(child);
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.props.get(name)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(VNode::count).sum::<usize>()
    }

    /// The type-tag skeleton of this subtree, ignoring properties.
    pub fn shape(&self) -> Shape {
        Shape {
            type_tag: self.type_tag.clone(),
            children: self.children.iter().map(VNode::shape).collect(),
        }
    }
}

/// Node types at every position of a tree. Two trees are congruent when
/// their shapes are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub type_tag: String,
    pub children: Vec<Shape>,
}

impl Shape {
    pub fn leaf(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            children: Vec::new(),
        }
    }
}

pub fn h(tag: impl Into<String>, props: impl Into<Props>, children: Vec<VNode>) -> VNode {
    VNode {
        type_tag: tag.into(),
        props: props.into(),
        children,
    }
}
