//! Shared helpers for benchmarks

use paneframe::model::{Layout, TabDescriptor, TabId};

/// A single-panel layout with `tabs` tabs named `tab-0..`
#[allow(dead_code)]
pub fn make_layout(tabs: usize) -> Layout {
    let mut layout = Layout::new();
    for i in 0..tabs {
        let id = format!("tab-{}", i);
        layout.open_tab(TabDescriptor::new(
            id.clone(),
            id.to_uppercase(),
            format!("/admin/{}", id),
        ));
    }
    layout
}

/// Same as [`make_layout`], with the second half split into panel 2
#[allow(dead_code)]
pub fn make_split_layout(tabs: usize) -> Layout {
    let mut layout = make_layout(tabs);
    let first = layout.primary_panel().map(|p| p.id.clone());
    let Some(first) = first else {
        return layout;
    };
    layout.create_panel(&TabId::new(format!("tab-{}", tabs - 1)));
    let second = layout.active_panel_id().clone();
    for i in tabs / 2..tabs - 1 {
        layout.move_tab_to_panel(&TabId::new(format!("tab-{}", i)), &first, &second);
    }
    layout
}
