//! Mutation batch filtering.
//!
//! The observer hears about every structural change under the body, including
//! the engine's own overlay insertions and removals. To avoid feeding back
//! into itself, a batch is first run through a pure classifier: child-list
//! records touching nothing but overlay nodes are ignorable, and the first
//! non-ignorable record decides that a reconciliation should be scheduled.
//! The rest of the batch is not inspected, which is sound because a single
//! debounced pass converges regardless of how many records motivated it.

use crate::overlay::OVERLAY_CLASS;
use scalemark_dom::MutationRecord;
use std::sync::mpsc::Receiver;

/// What to do with a batch of mutation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDecision {
    /// Every record was self-induced; do nothing.
    Ignore,
    /// Schedule one debounced reconciliation pass.
    Schedule,
}

/// Decide whether a batch warrants a pass. Pure; timing lives elsewhere.
#[must_use]
pub fn classify_batch(records: &[MutationRecord]) -> BatchDecision {
    for record in records {
        if let MutationRecord::ChildList { added, removed, .. } = record {
            let mut nodes = added.iter().chain(removed.iter()).peekable();
            let ignorable =
                nodes.peek().is_some() && nodes.all(|node| node.has_class(OVERLAY_CLASS));
            if ignorable {
                continue;
            }
        }
        return BatchDecision::Schedule;
    }
    BatchDecision::Ignore
}

/// Drains mutation records from the document's observer channel.
#[derive(Debug)]
pub struct MutationObserver {
    rx: Receiver<MutationRecord>,
}

impl MutationObserver {
    /// Wrap the record channel returned by `DomTree::observe`.
    #[must_use]
    pub const fn new(rx: Receiver<MutationRecord>) -> Self {
        Self { rx }
    }

    /// Take every record currently queued.
    pub fn take_batch(&mut self) -> Vec<MutationRecord> {
        let mut batch = Vec::new();
        while let Ok(record) = self.rx.try_recv() {
            batch.push(record);
        }
        batch
    }
}
