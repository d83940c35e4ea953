//! Attach/detach lifecycle for the engine.
//!
//! A session owns the mutation observer, the debouncer, and the overlay
//! binder. All triggers funnel into the same reconciliation pass: resize and
//! image-load events run one immediately, while observer records go through
//! the batch filter and the debouncer. Detach unwinds every visible side
//! effect and is safe to call any number of times.

use crate::config::EngineConfig;
use crate::observe::{BatchDecision, MutationObserver, classify_batch};
use crate::overlay::{IMAGE_ID_ATTR, OVERLAY_CLASS, OverlayBinder};
use crate::positioning::restore_if_forced;
use crate::reconcile::{HighlightToggles, run_pass};
use crate::schedule::Debouncer;
use anyhow::Error;
use scalemark_dom::{DomTree, NodeId, ObserverOptions};
use std::time::Instant;

/// Host events a session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The viewport was resized; geometry may have changed everywhere.
    Resize,
    /// A node finished loading. Only image nodes trigger a pass; the
    /// subscription is document-wide so lazily-loaded images are caught.
    Loaded(NodeId),
    /// The page is going away; tear everything down.
    Unload,
}

/// A live engine attachment to one document.
#[derive(Debug)]
pub struct RuntimeSession {
    observer: Option<MutationObserver>,
    debounce: Debouncer,
    overlays: OverlayBinder,
}

impl RuntimeSession {
    /// Run the initial pass and install the mutation observer. A document
    /// with no `body` gets no observer: the session still works, it just
    /// loses structural reactivity.
    pub fn attach(
        dom: &mut DomTree,
        toggles: HighlightToggles,
        config: &EngineConfig,
    ) -> Result<Self, Error> {
        let mut overlays = OverlayBinder::new();
        run_pass(dom, toggles, &mut overlays)?;

        let observer = dom.body().map(|body| {
            let rx = dom.observe(
                body,
                ObserverOptions {
                    child_list: true,
                    subtree: true,
                    attributes: true,
                    attribute_filter: vec!["src".to_string(), "srcset".to_string()],
                },
            );
            MutationObserver::new(rx)
        });
        if observer.is_none() {
            log::warn!("no body element; structural reactivity disabled");
        }

        Ok(Self {
            observer,
            debounce: Debouncer::new(config.debounce()),
            overlays,
        })
    }

    /// React to a host event. Resize and image loads reconcile immediately;
    /// they bypass the debouncer, which only coalesces the mutation path.
    pub fn handle_event(
        &mut self,
        dom: &mut DomTree,
        toggles: HighlightToggles,
        event: PageEvent,
    ) -> Result<(), Error> {
        match event {
            PageEvent::Resize => self.refresh(dom, toggles),
            PageEvent::Loaded(node) => {
                if dom.tag_name(node) == Some("img") {
                    self.refresh(dom, toggles)
                } else {
                    Ok(())
                }
            }
            PageEvent::Unload => {
                self.detach(dom);
                Ok(())
            }
        }
    }

    /// Drain observer records, filter out self-induced ones, and run the
    /// debounced pass when its deadline has elapsed. Returns whether a pass
    /// ran.
    pub fn pump(
        &mut self,
        dom: &mut DomTree,
        toggles: HighlightToggles,
        now: Instant,
    ) -> Result<bool, Error> {
        if let Some(observer) = &mut self.observer {
            let batch = observer.take_batch();
            if !batch.is_empty() && classify_batch(&batch) == BatchDecision::Schedule {
                self.debounce.schedule(now);
            }
        }
        if self.debounce.fire_due(now) {
            self.refresh(dom, toggles)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Run a reconciliation pass now.
    pub fn refresh(&mut self, dom: &mut DomTree, toggles: HighlightToggles) -> Result<(), Error> {
        run_pass(dom, toggles, &mut self.overlays)
    }

    /// True while the structural observer is installed.
    #[must_use]
    pub const fn observing(&self) -> bool {
        self.observer.is_some()
    }

    /// Disconnect the observer, drop any pending deadline, and unwind every
    /// side effect: overlays removed, tints cleared, image identifiers
    /// dropped, forced positioning restored. Identifiers must not outlive the
    /// session, since the next session's binder counts from 1 again and a
    /// stale identifier would collide with a freshly assigned one.
    /// Idempotent.
    pub fn detach(&mut self, dom: &mut DomTree) {
        // Stop listening before touching the tree so the teardown's own
        // mutations cannot queue records.
        dom.disconnect_observer();
        self.observer = None;
        self.debounce.cancel();

        for node in dom.elements() {
            if dom.has_class(node, OVERLAY_CLASS) {
                dom.detach(node);
            }
        }
        for image in dom.images() {
            dom.remove_style_property(image, "filter");
            dom.remove_attribute(image, IMAGE_ID_ATTR);
        }
        for node in dom.elements() {
            restore_if_forced(dom, node);
        }
        log::debug!("session detached");
    }
}
