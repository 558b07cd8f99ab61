//! App message handlers (session lifecycle)

use super::layout::layout_changed;
use super::navigation::url_changed;
use super::viewport::enforce_collapse;
use crate::commands::Cmd;
use crate::messages::AppMsg;
use crate::model::{HydrationOutcome, WorkspaceModel};

pub fn update_app(model: &mut WorkspaceModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::Hydrated(outcome) => {
            let mut cmds = vec![Cmd::Redraw];
            match outcome {
                HydrationOutcome::Restored(layout) => {
                    // Already in storage, so no persist
                    model.layout = layout;
                    model.dirty.retain_open(&model.layout);
                    model.router.retain_open(&model.layout);
                    // The URL seen before the gate opened must still get its tab
                    if let Some(url) = model.nav.last_path.take() {
                        cmds.extend(url_changed(model, url));
                    }
                }
                HydrationOutcome::Defaults => {
                    // Anything opened before the gate opened was never persisted
                    if model.layout.tab_count() > 0 {
                        cmds.push(layout_changed(model, None));
                    }
                }
                HydrationOutcome::AlreadyHydrated => return None,
            }
            // A two-panel snapshot restored into a narrow viewport collapses
            if let Some(cmd) = enforce_collapse(model) {
                cmds.push(cmd);
            }
            Cmd::from_vec(cmds)
        }
    }
}
