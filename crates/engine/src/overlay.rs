//! Overlay annotation lifecycle.
//!
//! An overlay is a non-interactive label node centered over its image and
//! bound to it through a pair of attributes: the image gets a stable numeric
//! identifier on first use, and the overlay names that identifier. Removal
//! runs before every (re)creation, which is what keeps the one-overlay-per-
//! image invariant under repeated passes.

use anyhow::Error;
use scalemark_dom::{DomTree, NodeId};

/// Class name carried by every overlay node.
pub const OVERLAY_CLASS: &str = "img-scale-overlay";
/// Attribute on the overlay naming the image it belongs to.
pub const OVERLAY_BINDING_ATTR: &str = "data-for-img";
/// Attribute on the image holding its stable overlay identifier.
pub const IMAGE_ID_ATTR: &str = "data-scale-overlay-id";

/// Creates overlay nodes and owns the monotone image-identifier counter.
#[derive(Debug)]
pub struct OverlayBinder {
    next_id: u64,
}

impl Default for OverlayBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayBinder {
    /// Counter starts at 1; 0 is never a valid binding.
    #[must_use]
    pub const fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Build a detached overlay node for `image`, assigning the image a
    /// stable identifier if it does not have one yet. The caller inserts the
    /// node (as the image's next sibling) once the image is known to be
    /// eligible for display.
    pub fn create(
        &mut self,
        dom: &mut DomTree,
        label: &str,
        color: &str,
        image: NodeId,
    ) -> Result<NodeId, Error> {
        let overlay = dom.create_element("div");
        let text = dom.create_text(label);
        dom.append_child(overlay, text)?;
        dom.set_attribute(overlay, "class", OVERLAY_CLASS);

        if dom.attribute(image, IMAGE_ID_ATTR).is_none() {
            let id = self.next_id.to_string();
            self.next_id += 1;
            dom.set_attribute(image, IMAGE_ID_ATTR, &id);
        }
        if let Some(id) = dom.attribute(image, IMAGE_ID_ATTR).map(str::to_string) {
            dom.set_attribute(overlay, OVERLAY_BINDING_ATTR, &id);
        }

        let rendered_w = dom.metrics(image).map(|m| m.rendered_w).unwrap_or(0);
        for (name, value) in [
            ("position", "absolute".to_string()),
            ("left", "50%".to_string()),
            ("top", "50%".to_string()),
            ("transform", "translate(-50%, -50%)".to_string()),
            ("display", "flex".to_string()),
            ("align-items", "center".to_string()),
            ("justify-content", "center".to_string()),
            ("color", "#fff".to_string()),
            ("background", color.to_string()),
            ("padding", "2px 6px".to_string()),
            ("border-radius", "6px".to_string()),
            ("font-size", "0.8em".to_string()),
            ("font-weight", "bold".to_string()),
            ("pointer-events", "none".to_string()),
            ("z-index", "10".to_string()),
            ("box-shadow", "0 1px 4px rgba(0,0,0,0.2)".to_string()),
            ("opacity", "0.85".to_string()),
            ("border", "1px solid #fff".to_string()),
            ("white-space", "nowrap".to_string()),
            ("min-width", format!("{rendered_w}px")),
        ] {
            dom.set_style_property(overlay, name, &value);
        }
        Ok(overlay)
    }

    /// Remove every overlay bound to `image`, plus any overlay directly
    /// adjacent to it (the fallback for overlays created before the image had
    /// an identifier). Runs unconditionally at the top of per-image
    /// processing.
    pub fn remove_for(dom: &mut DomTree, image: NodeId) {
        let Some(parent) = dom.parent(image) else {
            return;
        };
        let id = dom.attribute(image, IMAGE_ID_ATTR).map(str::to_string);
        let candidates: Vec<NodeId> = dom
            .children(parent)
            .into_iter()
            .filter(|&child| dom.has_class(child, OVERLAY_CLASS))
            .collect();
        for overlay in candidates {
            let bound = dom
                .attribute(overlay, OVERLAY_BINDING_ATTR)
                .map(str::to_string);
            let owns = match (&id, &bound) {
                (Some(id), Some(bound)) => id == bound,
                _ => false,
            };
            let adjacent = dom.prev_sibling(overlay) == Some(image)
                || dom.next_sibling(overlay) == Some(image);
            if owns || adjacent {
                dom.detach(overlay);
            }
        }
    }
}
