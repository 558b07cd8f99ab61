//! Responsive Policy - one-way collapse of two panels on narrow viewports

use super::layout::update_layout;
use crate::commands::Cmd;
use crate::messages::{LayoutMsg, ViewportMsg};
use crate::model::WorkspaceModel;

pub fn update_viewport(model: &mut WorkspaceModel, msg: ViewportMsg) -> Option<Cmd> {
    match msg {
        ViewportMsg::Resized { width } => {
            let was_wide = model.is_wide();
            model.viewport.width = Some(width);
            if was_wide != model.is_wide() {
                tracing::debug!(
                    target: "layout",
                    "Viewport {}px is now {}",
                    width,
                    if model.is_wide() { "wide" } else { "narrow" }
                );
            }
            enforce_collapse(model)
        }
    }
}

/// Merge the second panel into the first while the viewport is narrow.
/// Widening never splits again.
pub(crate) fn enforce_collapse(model: &mut WorkspaceModel) -> Option<Cmd> {
    if model.is_wide() || !model.layout.has_two_panels() {
        return None;
    }
    tracing::info!(
        target: "layout",
        "Viewport below {}px, collapsing to one panel",
        model.viewport.breakpoint_px
    );
    update_layout(model, LayoutMsg::MergeIntoPrimary)
}
