//! Container positioning for overlay anchoring.
//!
//! Overlays are absolutely positioned, so the image's container must establish
//! a positioning context. When the container is unpositioned we force
//! `position: relative` and remember the original inline value in an attribute
//! so it can be restored exactly (including an originally-empty value) once the
//! image returns to its natural size.

use scalemark_dom::{DomTree, NodeId};

/// Attribute remembering a container's pre-force inline `position` value.
pub const ORIGINAL_POSITION_ATTR: &str = "data-original-position";

/// Force the container into a positioned mode when its resolved position is
/// `static`. The original inline value is remembered only once; a container
/// already carrying a record is never overwritten.
pub fn ensure_relative(dom: &mut DomTree, container: NodeId) {
    if dom.computed_position(container) != "static" {
        return;
    }
    if dom.attribute(container, ORIGINAL_POSITION_ATTR).is_none() {
        let original = dom
            .style_property(container, "position")
            .unwrap_or("")
            .to_string();
        dom.set_attribute(container, ORIGINAL_POSITION_ATTR, &original);
    }
    dom.set_style_property(container, "position", "relative");
}

/// Write back the remembered inline position and discard the record. Called
/// only when the image in this container classifies as unscaled; a container
/// without a record is left untouched.
///
/// Known edge case: the check is per image, not per container, so a container
/// whose later-in-document image is unscaled can be restored even while an
/// earlier sibling image is still mismatched.
pub fn restore_if_forced(dom: &mut DomTree, container: NodeId) {
    let Some(original) = dom
        .attribute(container, ORIGINAL_POSITION_ATTR)
        .map(str::to_string)
    else {
        return;
    };
    if original.is_empty() {
        dom.remove_style_property(container, "position");
    } else {
        dom.set_style_property(container, "position", &original);
    }
    dom.remove_attribute(container, ORIGINAL_POSITION_ATTR);
}
