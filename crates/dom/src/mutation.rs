//! Mutation records streamed from the document tree.
//!
//! Records are delivered over a `std::sync::mpsc` channel so the observer can
//! drain them in batches on the host loop. Each record carries snapshots of
//! the nodes involved, taken at mutation time: a removed node's class list is
//! still inspectable even though the node has already left the document.

use indextree::NodeId;
use smallvec::SmallVec;

/// What an observer wants to hear about.
#[derive(Debug, Clone, Default)]
pub struct ObserverOptions {
    /// Report nodes added to / removed from observed containers.
    pub child_list: bool,
    /// Observe the whole subtree under the target, not just the target.
    pub subtree: bool,
    /// Report attribute changes.
    pub attributes: bool,
    /// When non-empty, only these attribute names are reported.
    pub attribute_filter: Vec<String>,
}

impl ObserverOptions {
    /// True if an attribute change to `name` passes the configured filter.
    #[must_use]
    pub fn attribute_passes(&self, name: &str) -> bool {
        self.attributes
            && (self.attribute_filter.is_empty()
                || self.attribute_filter.iter().any(|f| f == name))
    }
}

/// Identity and presentation snapshot of a node at mutation time.
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    pub id: NodeId,
    /// Tag name for element nodes, `None` for text nodes.
    pub tag: Option<String>,
    /// Value of the `class` attribute at the time of the mutation.
    pub class: Option<String>,
}

impl NodeSnapshot {
    /// True if the snapshotted class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.class
            .as_deref()
            .is_some_and(|value| value.split_whitespace().any(|token| token == class))
    }
}

/// One observed change to the document.
#[derive(Debug, Clone)]
pub enum MutationRecord {
    /// Children were added to or removed from `target`.
    ChildList {
        target: NodeId,
        added: SmallVec<[NodeSnapshot; 2]>,
        removed: SmallVec<[NodeSnapshot; 2]>,
    },
    /// An attribute named `name` changed on `target`.
    Attribute { target: NodeId, name: String },
}
