//! The reconciliation pass.
//!
//! One pass is a full synchronous scan over every image in document order,
//! bringing overlays, tints, and forced container positioning in line with the
//! current geometry and display toggles. The pass is stateless across
//! invocations: repeated calls with unchanged inputs produce identical output,
//! which is what makes back-to-back triggers from different sources safe.

use crate::classify::{Classification, ScaleDirection, classify};
use crate::overlay::OverlayBinder;
use crate::positioning::{ensure_relative, restore_if_forced};
use anyhow::Error;
use scalemark_dom::DomTree;

/// Which mismatch categories are currently displayed. Upscales have no toggle
/// and are always shown; the asymmetry with downscales is deliberate.
#[derive(Debug, Clone, Copy)]
pub struct HighlightToggles {
    pub show_downscale: bool,
    pub show_proportional: bool,
}

impl Default for HighlightToggles {
    fn default() -> Self {
        Self {
            show_downscale: true,
            show_proportional: true,
        }
    }
}

impl HighlightToggles {
    /// Whether a mismatch of this direction may be displayed.
    #[must_use]
    pub const fn admits(self, direction: ScaleDirection) -> bool {
        match direction {
            ScaleDirection::Upscaled => true,
            ScaleDirection::Downscaled { proportional } => {
                if proportional {
                    self.show_proportional
                } else {
                    self.show_downscale
                }
            }
        }
    }
}

/// Run one reconciliation pass over the whole document.
pub fn run_pass(
    dom: &mut DomTree,
    toggles: HighlightToggles,
    overlays: &mut OverlayBinder,
) -> Result<(), Error> {
    let images = dom.images();
    log::debug!("reconciling {} images", images.len());
    for image in images {
        // Overlay removal precedes classification and creation: this is what
        // guarantees at most one overlay per image under repeated passes.
        OverlayBinder::remove_for(dom, image);
        dom.set_style_property(image, "transition", "filter 0.3s");

        match classify(dom.metrics(image).unwrap_or_default()) {
            Classification::NotApplicable => {}
            Classification::Unscaled => {
                dom.remove_style_property(image, "filter");
                if let Some(container) = dom.parent(image) {
                    restore_if_forced(dom, container);
                }
            }
            Classification::Scaled(scaled) => {
                if toggles.admits(scaled.direction) {
                    if let Some(container) = dom.parent(image) {
                        ensure_relative(dom, container);
                    }
                    dom.set_style_property(image, "filter", scaled.tint);
                    let overlay = overlays.create(dom, &scaled.label, scaled.color, image)?;
                    if dom.parent(image).is_some() {
                        dom.insert_after(image, overlay)?;
                    }
                } else {
                    // A suppressed category leaves no residue, so the pass
                    // output depends only on geometry and toggles.
                    dom.remove_style_property(image, "filter");
                }
            }
        }
    }
    Ok(())
}
