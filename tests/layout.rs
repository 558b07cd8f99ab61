//! Tests for the workspace store: tabs, panels, guarded closes, persistence

mod common;

use common::{
    desc, flat, focused, inbound, model_with_tabs, panel, persisted, tab, tab_ids, test_model,
    HOST,
};
use paneframe::commands::Cmd;
use paneframe::config::WorkspaceConfig;
use paneframe::messages::{CloseRequest, LayoutMsg, Msg, ViewportMsg};
use paneframe::model::{Layout, LayoutSnapshot, WorkspaceModel};
use paneframe::update::{reduce, update};
use serde_json::json;

// ============================================================================
// Open / activate
// ============================================================================

#[test]
fn test_open_appends_to_active_panel_and_activates() {
    let model = model_with_tabs(&["customers", "notices"]);

    assert_eq!(tab_ids(&model), vec![vec!["customers", "notices"]]);
    assert_eq!(focused(&model).as_deref(), Some("notices"));
}

#[test]
fn test_open_existing_tab_activates_without_duplicate() {
    let mut model = model_with_tabs(&["customers", "notices"]);

    update(&mut model, Msg::Layout(LayoutMsg::OpenTab(desc("customers"))));

    assert_eq!(tab_ids(&model), vec![vec!["customers", "notices"]]);
    assert_eq!(focused(&model).as_deref(), Some("customers"));
}

#[test]
fn test_open_existing_tab_in_other_panel_activates_that_panel() {
    let mut model = model_with_tabs(&["a", "b", "c"]);
    update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("b") }));
    update(
        &mut model,
        Msg::Layout(LayoutMsg::SetActiveTab {
            tab_id: tab("a"),
            panel_id: panel("panel-1"),
        }),
    );

    update(&mut model, Msg::Layout(LayoutMsg::OpenTab(desc("b"))));

    assert_eq!(model.layout.active_panel_id().as_str(), "panel-2");
    assert_eq!(focused(&model).as_deref(), Some("b"));
    assert_eq!(model.layout.panels().len(), 2);
}

#[test]
fn test_open_never_creates_panel() {
    let model = model_with_tabs(&["a", "b", "c", "d", "e"]);
    assert_eq!(model.layout.panels().len(), 1);
}

// ============================================================================
// Close
// ============================================================================

#[test]
fn test_close_pinned_tab_is_noop() {
    let mut model = model_with_tabs(&["a", "b"]);
    update(&mut model, Msg::Layout(LayoutMsg::PinTab { tab_id: tab("a") }));
    let before = model.layout.clone();

    let cmd = update(
        &mut model,
        Msg::Layout(LayoutMsg::CloseTab {
            tab_id: tab("a"),
            panel_id: panel("panel-1"),
        }),
    );

    assert!(cmd.is_none());
    assert_eq!(model.layout, before);
}

#[test]
fn test_close_with_wrong_panel_is_noop() {
    let mut model = model_with_tabs(&["a", "b"]);
    let cmd = update(
        &mut model,
        Msg::Layout(LayoutMsg::CloseTab {
            tab_id: tab("a"),
            panel_id: panel("panel-9"),
        }),
    );
    assert!(cmd.is_none());
    assert_eq!(tab_ids(&model), vec![vec!["a", "b"]]);
}

#[test]
fn test_close_active_activates_left_neighbour() {
    let mut model = model_with_tabs(&["a", "b", "c"]);
    update(
        &mut model,
        Msg::Layout(LayoutMsg::SetActiveTab {
            tab_id: tab("b"),
            panel_id: panel("panel-1"),
        }),
    );

    update(
        &mut model,
        Msg::Layout(LayoutMsg::CloseTab {
            tab_id: tab("b"),
            panel_id: panel("panel-1"),
        }),
    );

    assert_eq!(focused(&model).as_deref(), Some("a"));
}

#[test]
fn test_close_first_active_activates_right_neighbour() {
    let mut model = model_with_tabs(&["a", "b", "c"]);
    update(
        &mut model,
        Msg::Layout(LayoutMsg::SetActiveTab {
            tab_id: tab("a"),
            panel_id: panel("panel-1"),
        }),
    );

    update(
        &mut model,
        Msg::Layout(LayoutMsg::CloseTab {
            tab_id: tab("a"),
            panel_id: panel("panel-1"),
        }),
    );

    assert_eq!(focused(&model).as_deref(), Some("b"));
}

#[test]
fn test_close_inactive_keeps_active() {
    let mut model = model_with_tabs(&["a", "b", "c"]);
    update(
        &mut model,
        Msg::Layout(LayoutMsg::CloseTab {
            tab_id: tab("a"),
            panel_id: panel("panel-1"),
        }),
    );
    assert_eq!(focused(&model).as_deref(), Some("c"));
}

#[test]
fn test_closing_last_tab_of_second_panel_removes_it() {
    let mut model = model_with_tabs(&["a", "b"]);
    update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("b") }));
    assert!(model.layout.has_two_panels());

    update(
        &mut model,
        Msg::Layout(LayoutMsg::CloseTab {
            tab_id: tab("b"),
            panel_id: panel("panel-2"),
        }),
    );

    assert!(!model.layout.has_two_panels());
    assert_eq!(model.layout.active_panel_id().as_str(), "panel-1");
    assert_eq!(focused(&model).as_deref(), Some("a"));
}

#[test]
fn test_only_panel_survives_closing_everything() {
    let mut model = model_with_tabs(&["a", "b"]);
    update(
        &mut model,
        Msg::Layout(LayoutMsg::CloseAllTabs {
            panel_id: panel("panel-1"),
        }),
    );

    assert_eq!(model.layout.panels().len(), 1);
    assert!(model.layout.panels()[0].is_empty());
    assert_eq!(model.layout.panels()[0].active_tab_id(), None);
}

#[test]
fn test_close_others_and_all_preserve_pinned() {
    let mut model = model_with_tabs(&["a", "b", "c", "d"]);
    update(&mut model, Msg::Layout(LayoutMsg::PinTab { tab_id: tab("b") }));

    update(
        &mut model,
        Msg::Layout(LayoutMsg::CloseOtherTabs {
            tab_id: tab("c"),
            panel_id: panel("panel-1"),
        }),
    );
    assert_eq!(tab_ids(&model), vec![vec!["b", "c"]]);
    assert_eq!(focused(&model).as_deref(), Some("c"));

    update(
        &mut model,
        Msg::Layout(LayoutMsg::CloseAllTabs {
            panel_id: panel("panel-1"),
        }),
    );
    assert_eq!(tab_ids(&model), vec![vec!["b"]]);
    assert_eq!(focused(&model).as_deref(), Some("b"));
}

// ============================================================================
// Pin
// ============================================================================

#[test]
fn test_pin_does_not_reorder() {
    let mut model = model_with_tabs(&["a", "b", "c"]);
    update(&mut model, Msg::Layout(LayoutMsg::PinTab { tab_id: tab("c") }));

    assert_eq!(tab_ids(&model), vec![vec!["a", "b", "c"]]);
    assert!(model.layout.find_tab(&tab("c")).unwrap().is_pinned);

    update(&mut model, Msg::Layout(LayoutMsg::UnpinTab { tab_id: tab("c") }));
    assert!(!model.layout.find_tab(&tab("c")).unwrap().is_pinned);
}

// ============================================================================
// Panels
// ============================================================================

#[test]
fn test_create_panel_moves_tab_into_new_active_panel() {
    let mut model = model_with_tabs(&["a", "b", "c"]);

    update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("b") }));

    assert_eq!(tab_ids(&model), vec![vec!["a", "c"], vec!["b"]]);
    assert_eq!(model.layout.active_panel_id().as_str(), "panel-2");
    assert_eq!(focused(&model).as_deref(), Some("b"));
}

#[test]
fn test_create_panel_with_two_panels_is_noop() {
    let mut model = model_with_tabs(&["a", "b", "c"]);
    update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("b") }));
    let before = model.layout.clone();

    let cmd = update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("a") }));

    assert!(cmd.is_none());
    assert_eq!(model.layout, before);
}

#[test]
fn test_create_panel_from_single_tab_panel_is_noop() {
    let mut model = model_with_tabs(&["a"]);
    let cmd = update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("a") }));
    assert!(cmd.is_none());
    assert_eq!(model.layout.panels().len(), 1);
}

#[test]
fn test_create_panel_refused_on_narrow_viewport() {
    let mut model = model_with_tabs(&["a", "b"]);
    update(&mut model, Msg::Viewport(ViewportMsg::Resized { width: 800 }));

    let cmd = update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("b") }));

    assert!(cmd.is_none());
    assert_eq!(model.layout.panels().len(), 1);
}

#[test]
fn test_move_tab_round_trip_preserves_membership() {
    let mut model = model_with_tabs(&["a", "b", "c"]);
    update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("c") }));
    update(&mut model, Msg::Layout(LayoutMsg::PinTab { tab_id: tab("a") }));

    update(
        &mut model,
        Msg::Layout(LayoutMsg::MoveTabToPanel {
            tab_id: tab("a"),
            from: panel("panel-1"),
            to: panel("panel-2"),
        }),
    );
    assert_eq!(tab_ids(&model), vec![vec!["b"], vec!["c", "a"]]);
    assert!(model.layout.find_tab(&tab("a")).unwrap().is_pinned);
    assert_eq!(focused(&model).as_deref(), Some("a"));

    update(
        &mut model,
        Msg::Layout(LayoutMsg::MoveTabToPanel {
            tab_id: tab("a"),
            from: panel("panel-2"),
            to: panel("panel-1"),
        }),
    );

    let mut all: Vec<String> = tab_ids(&model).concat();
    all.sort();
    assert_eq!(all, vec!["a", "b", "c"]);
    assert!(model.layout.find_tab(&tab("a")).unwrap().is_pinned);
}

#[test]
fn test_move_last_tab_removes_origin_panel() {
    let mut model = model_with_tabs(&["a", "b"]);
    update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("b") }));

    update(
        &mut model,
        Msg::Layout(LayoutMsg::MoveTabToPanel {
            tab_id: tab("b"),
            from: panel("panel-2"),
            to: panel("panel-1"),
        }),
    );

    assert_eq!(tab_ids(&model), vec![vec!["a", "b"]]);
    assert_eq!(model.layout.active_panel_id().as_str(), "panel-1");
}

#[test]
fn test_find_tab_panel() {
    let mut model = model_with_tabs(&["a", "b"]);
    update(&mut model, Msg::Layout(LayoutMsg::CreatePanel { tab_id: tab("b") }));

    assert_eq!(
        model.layout.find_tab_panel(&tab("b")).map(|p| p.id.as_str()),
        Some("panel-2")
    );
    assert_eq!(
        model.layout.find_tab_panel(&tab("a")).map(|p| p.id.as_str()),
        Some("panel-1")
    );
    assert!(model.layout.find_tab_panel(&tab("zzz")).is_none());
}

#[test]
fn test_reorder_clamps_index() {
    let mut model = model_with_tabs(&["a", "b", "c"]);
    update(
        &mut model,
        Msg::Layout(LayoutMsg::ReorderTab {
            panel_id: panel("panel-1"),
            tab_id: tab("a"),
            to_index: 99,
        }),
    );
    assert_eq!(tab_ids(&model), vec![vec!["b", "c", "a"]]);
}

#[test]
fn test_reduce_is_pure() {
    let mut layout = Layout::new();
    layout.open_tab(desc("a"));
    let before = layout.clone();

    let next = reduce(&layout, &LayoutMsg::OpenTab(desc("b")));

    assert_eq!(layout, before);
    assert_eq!(next.tab_count(), 2);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_structural_change_persists_snapshot() {
    let mut model = model_with_tabs(&["a"]);
    let cmds = flat(update(&mut model, Msg::Layout(LayoutMsg::OpenTab(desc("b")))));

    let snapshot = cmds
        .iter()
        .find_map(|c| match c {
            Cmd::PersistLayout(s) => Some(s.clone()),
            _ => None,
        })
        .expect("snapshot persisted");
    assert_eq!(snapshot.version, LayoutSnapshot::CURRENT_VERSION);
    assert_eq!(snapshot.layout, model.layout);
}

#[test]
fn test_noop_does_not_persist() {
    let mut model = model_with_tabs(&["a"]);
    let cmds = flat(update(
        &mut model,
        Msg::Layout(LayoutMsg::UnpinTab { tab_id: tab("a") }),
    ));
    assert!(!persisted(&cmds));
}

#[test]
fn test_persist_suppressed_before_hydration() {
    let mut model = WorkspaceModel::new(WorkspaceConfig::default());
    let cmds = flat(update(&mut model, Msg::Layout(LayoutMsg::OpenTab(desc("a")))));

    assert_eq!(model.layout.tab_count(), 1);
    assert!(!persisted(&cmds));
}

// ============================================================================
// Dirty-guarded closes
// ============================================================================

fn mark_dirty(model: &mut WorkspaceModel, id: &str, form: &str, dirty: bool) {
    update(
        model,
        inbound(
            HOST,
            json!({
                "type": "FORM_DIRTY",
                "tabId": id,
                "payload": { "isDirty": dirty, "formId": form }
            }),
        ),
    );
}

#[test]
fn test_close_dirty_tab_asks_for_confirmation() {
    let mut model = model_with_tabs(&["a", "b"]);
    mark_dirty(&mut model, "a", "profile", true);
    let before = model.layout.clone();

    let request = CloseRequest::Tab {
        tab_id: tab("a"),
        panel_id: panel("panel-1"),
    };
    let cmds = flat(update(&mut model, Msg::Close(request.clone())));

    assert_eq!(
        cmds,
        vec![Cmd::ConfirmDiscard {
            request,
            tab_ids: vec![tab("a")],
        }]
    );
    assert_eq!(model.layout, before);
}

#[test]
fn test_close_clean_tab_closes_immediately() {
    let mut model = model_with_tabs(&["a", "b"]);
    mark_dirty(&mut model, "a", "profile", true);
    mark_dirty(&mut model, "a", "profile", false);

    update(
        &mut model,
        Msg::Close(CloseRequest::Tab {
            tab_id: tab("a"),
            panel_id: panel("panel-1"),
        }),
    );

    assert_eq!(tab_ids(&model), vec![vec!["b"]]);
}

#[test]
fn test_close_all_lists_only_dirty_tabs_it_would_remove() {
    let mut model = model_with_tabs(&["a", "b", "c"]);
    update(&mut model, Msg::Layout(LayoutMsg::PinTab { tab_id: tab("a") }));
    mark_dirty(&mut model, "a", "f", true);
    mark_dirty(&mut model, "c", "f", true);

    let cmds = flat(update(
        &mut model,
        Msg::Close(CloseRequest::All {
            panel_id: panel("panel-1"),
        }),
    ));

    assert!(matches!(
        cmds.as_slice(),
        [Cmd::ConfirmDiscard { tab_ids, .. }] if *tab_ids == vec![tab("c")]
    ));
}

#[test]
fn test_forced_close_forgets_dirty_state() {
    let mut model = model_with_tabs(&["a", "b"]);
    mark_dirty(&mut model, "a", "f", true);

    let request = CloseRequest::Tab {
        tab_id: tab("a"),
        panel_id: panel("panel-1"),
    };
    update(&mut model, Msg::Layout(request.into_layout_msg()));

    assert!(!model.layout.contains_tab(&tab("a")));
    assert!(!model.dirty.is_dirty(&tab("a")));
}
