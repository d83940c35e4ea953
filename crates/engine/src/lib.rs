//! Detection and reconciliation engine for scaled images.
//!
//! The engine walks a document, classifies every image by comparing its
//! rendered layout box against its natural resolution, and annotates
//! mismatches with a tint filter plus a label overlay. A reconciliation pass
//! is a total, idempotent scan; reactivity comes from a mutation observer
//! whose records are filtered (so the engine never reacts to its own overlay
//! writes) and debounced before triggering the next pass.

pub mod classify;
pub mod config;
pub mod observe;
pub mod overlay;
pub mod positioning;
pub mod reconcile;
pub mod schedule;
pub mod session;

pub use classify::{Classification, ScaleDirection, ScaledImage, classify};
pub use config::EngineConfig;
pub use observe::{BatchDecision, MutationObserver, classify_batch};
pub use overlay::OverlayBinder;
pub use reconcile::{HighlightToggles, run_pass};
pub use schedule::Debouncer;
pub use session::{PageEvent, RuntimeSession};
