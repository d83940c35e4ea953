//! Arena-backed document tree.
//!
//! The tree stores node relationships in an `indextree` arena and node payloads
//! (tag, attributes, inline style, image metrics) inline on each node. The host
//! is responsible for building the tree and keeping per-image metrics current;
//! the engine only reads geometry and writes annotations.

use crate::mutation::{MutationRecord, NodeSnapshot, ObserverOptions};
use anyhow::{Error, bail};
use indextree::{Arena, NodeId};
use smallvec::SmallVec;
use std::sync::mpsc::{self, Receiver, Sender};

/// Natural (intrinsic) and rendered (layout box) dimensions of one image.
///
/// A zero anywhere means the dimension is unknown or the image is not laid
/// out, and classification treats the image as not applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageMetrics {
    pub natural_w: u32,
    pub natural_h: u32,
    pub rendered_w: u32,
    pub rendered_h: u32,
}

impl ImageMetrics {
    /// Create metrics from natural and rendered dimensions.
    #[must_use]
    pub const fn new(natural_w: u32, natural_h: u32, rendered_w: u32, rendered_h: u32) -> Self {
        Self {
            natural_w,
            natural_h,
            rendered_w,
            rendered_h,
        }
    }
}

/// Data stored for each document node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

/// Data for an element node.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag_name: String,
    attributes: SmallVec<[(String, String); 4]>,
    style: SmallVec<[(String, String); 4]>,
    metrics: Option<ImageMetrics>,
}

impl ElementData {
    fn new(tag_name: String) -> Self {
        Self {
            tag_name,
            attributes: SmallVec::new(),
            style: SmallVec::new(),
            metrics: None,
        }
    }

    fn get<'a>(list: &'a [(String, String)], name: &str) -> Option<&'a str> {
        list.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set(list: &mut SmallVec<[(String, String); 4]>, name: &str, value: &str) {
        if let Some(entry) = list.iter_mut().find(|(key, _)| key == name) {
            entry.1 = value.to_string();
        } else {
            list.push((name.to_string(), value.to_string()));
        }
    }

    fn remove(list: &mut SmallVec<[(String, String); 4]>, name: &str) -> bool {
        let before = list.len();
        list.retain(|(key, _)| key != name);
        list.len() != before
    }
}

struct Observer {
    target: NodeId,
    options: ObserverOptions,
    tx: Sender<MutationRecord>,
}

/// The document tree the engine reconciles against.
pub struct DomTree {
    arena: Arena<NodeData>,
    root: NodeId,
    observer: Option<Observer>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::Document);
        Self {
            arena,
            root,
            observer: None,
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena
            .new_node(NodeData::Element(ElementData::new(tag.to_string())))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        parent.checked_append(child, &mut self.arena)?;
        let added = SmallVec::from_iter([self.snapshot(child)]);
        self.emit_child_list(parent, added, SmallVec::new());
        Ok(())
    }

    /// Insert `node` as the next sibling of `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) -> Result<(), Error> {
        let Some(parent) = self.parent(sibling) else {
            bail!("cannot insert relative to a node without a parent");
        };
        sibling.checked_insert_after(node, &mut self.arena)?;
        let added = SmallVec::from_iter([self.snapshot(node)]);
        self.emit_child_list(parent, added, SmallVec::new());
        Ok(())
    }

    /// Detach `node` (and its subtree) from its parent. No-op when already
    /// detached.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        // Snapshot before the detach so the record can still describe the node.
        let removed = SmallVec::from_iter([self.snapshot(node)]);
        node.detach(&mut self.arena);
        self.emit_child_list(parent, SmallVec::new(), removed);
    }

    /// Set an attribute on an element node.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            ElementData::set(&mut element.attributes, name, value);
            self.emit_attribute(node, name);
        }
    }

    /// Read an attribute from an element node.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| ElementData::get(&element.attributes, name))
    }

    /// Remove an attribute from an element node.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.element_mut(node)
            && ElementData::remove(&mut element.attributes, name)
        {
            self.emit_attribute(node, name);
        }
    }

    /// Set an inline style declaration. Style writes never produce mutation
    /// records; the observer only listens to source attributes.
    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            ElementData::set(&mut element.style, name, value);
        }
    }

    /// Read an inline style declaration.
    #[must_use]
    pub fn style_property(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| ElementData::get(&element.style, name))
    }

    /// Remove an inline style declaration.
    pub fn remove_style_property(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.element_mut(node) {
            ElementData::remove(&mut element.style, name);
        }
    }

    /// The node's resolved `position`. With no stylesheet cascade in this
    /// model, that is the inline value when one is set, else `static`.
    #[must_use]
    pub fn computed_position(&self, node: NodeId) -> &str {
        self.style_property(node, "position")
            .filter(|value| !value.is_empty())
            .unwrap_or("static")
    }

    /// Record layout metrics for an image node.
    pub fn set_metrics(&mut self, node: NodeId, metrics: ImageMetrics) {
        if let Some(element) = self.element_mut(node) {
            element.metrics = Some(metrics);
        }
    }

    /// Layout metrics for an image node, if the host supplied any.
    #[must_use]
    pub fn metrics(&self, node: NodeId) -> Option<ImageMetrics> {
        self.element(node).and_then(|element| element.metrics)
    }

    /// The node's parent, if attached.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(indextree::Node::parent)
    }

    /// The node's next sibling.
    #[must_use]
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(indextree::Node::next_sibling)
    }

    /// The node's previous sibling.
    #[must_use]
    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena
            .get(node)
            .and_then(indextree::Node::previous_sibling)
    }

    /// The node's children, in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena).collect()
    }

    /// Tag name for element nodes.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag_name.as_str())
    }

    /// True if the element's class list contains `class`.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|value| value.split_whitespace().any(|token| token == class))
    }

    /// Concatenated text of all text nodes under `node`.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for id in node.descendants(&self.arena) {
            if let Some(NodeData::Text(text)) = self.arena.get(id).map(indextree::Node::get) {
                out.push_str(text);
            }
        }
        out
    }

    /// All connected images, in document order.
    #[must_use]
    pub fn images(&self) -> Vec<NodeId> {
        self.connected_elements_where(|element| element.tag_name == "img")
    }

    /// All connected elements, in document order.
    #[must_use]
    pub fn elements(&self) -> Vec<NodeId> {
        self.connected_elements_where(|_| true)
    }

    /// First connected `body` element, if any.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.connected_elements_where(|element| element.tag_name == "body")
            .first()
            .copied()
    }

    /// True if the node is attached to the document.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        node.ancestors(&self.arena).any(|id| id == self.root)
    }

    /// Install the (single) mutation observer over `target`, replacing any
    /// previous one, and return the record channel.
    pub fn observe(&mut self, target: NodeId, options: ObserverOptions) -> Receiver<MutationRecord> {
        let (tx, rx) = mpsc::channel();
        self.observer = Some(Observer {
            target,
            options,
            tx,
        });
        rx
    }

    /// Stop emitting mutation records.
    pub fn disconnect_observer(&mut self) {
        self.observer = None;
    }

    /// Identity/presentation snapshot of a node, for mutation records.
    #[must_use]
    pub fn snapshot(&self, node: NodeId) -> NodeSnapshot {
        NodeSnapshot {
            id: node,
            tag: self.tag_name(node).map(str::to_string),
            class: self.attribute(node, "class").map(str::to_string),
        }
    }

    fn connected_elements_where(&self, accept: impl Fn(&ElementData) -> bool) -> Vec<NodeId> {
        self.root
            .descendants(&self.arena)
            .filter(|&id| {
                matches!(
                    self.arena.get(id).map(indextree::Node::get),
                    Some(NodeData::Element(element)) if accept(element)
                )
            })
            .collect()
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.arena.get(node).map(indextree::Node::get) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match self.arena.get_mut(node).map(indextree::Node::get_mut) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn observed(&self, observer: &Observer, node: NodeId) -> bool {
        if observer.options.subtree {
            node.ancestors(&self.arena).any(|id| id == observer.target)
        } else {
            node == observer.target
        }
    }

    fn emit_child_list(
        &self,
        target: NodeId,
        added: SmallVec<[NodeSnapshot; 2]>,
        removed: SmallVec<[NodeSnapshot; 2]>,
    ) {
        let Some(observer) = &self.observer else {
            return;
        };
        if !observer.options.child_list || !self.observed(observer, target) {
            return;
        }
        let _ = observer.tx.send(MutationRecord::ChildList {
            target,
            added,
            removed,
        });
    }

    fn emit_attribute(&self, target: NodeId, name: &str) {
        let Some(observer) = &self.observer else {
            return;
        };
        if !observer.options.attribute_passes(name) || !self.observed(observer, target) {
            return;
        }
        let _ = observer.tx.send(MutationRecord::Attribute {
            target,
            name: name.to_string(),
        });
    }
}
