//! Document model for the scalemark engine.
//!
//! This crate holds the arena-backed document tree the reconciliation engine
//! operates on: elements with attributes and inline style, text nodes, and
//! per-image layout metrics supplied by the host. Structural and attribute
//! changes are streamed to at most one observer as [`MutationRecord`]s, which
//! is what makes the engine reactive without querying a live rendering engine.

pub mod mutation;
pub mod tree;

pub use indextree::NodeId;
pub use mutation::{MutationRecord, NodeSnapshot, ObserverOptions};
pub use tree::{DomTree, ElementData, ImageMetrics, NodeData};
