//! Application model - the complete state of the workspace
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod dirty;
pub mod drag;
pub mod hydration;
pub mod layout;
pub mod menu;

pub use dirty::DirtyTracker;
pub use drag::{
    can_split, detect_collision, resolve_drop, DragController, DragRelease, DropAction,
    DropIgnored, DropZone, DropZoneKind, GestureArbiter, GestureKind, Point, PointerIgnored, Rect,
    DRAG_THRESHOLD_PX,
};
pub use hydration::{HydrationGate, HydrationOutcome, HydrationState};
pub use layout::{
    Layout, LayoutSnapshot, Panel, PanelId, Tab, TabDescriptor, TabId, MAX_PANELS,
};
pub use menu::{MenuEntry, MenuMatch, MenuRegistry};

use crate::bridge::MessageRouter;
use crate::config::WorkspaceConfig;

/// Last outer path Navigation Sync processed; guards against re-entrant loops
#[derive(Debug, Clone, Default)]
pub struct NavState {
    pub last_path: Option<String>,
}

/// Viewport width and the derived "wide enough for two panels" flag
#[derive(Debug, Clone, Copy)]
pub struct ViewportState {
    /// `None` until the first resize is reported
    pub width: Option<u32>,
    pub breakpoint_px: u32,
}

impl ViewportState {
    pub fn new(breakpoint_px: u32) -> Self {
        Self {
            width: None,
            breakpoint_px,
        }
    }

    /// An unknown width counts as wide
    pub fn is_wide(&self) -> bool {
        self.width.map_or(true, |w| w >= self.breakpoint_px)
    }
}

/// The complete workspace model
#[derive(Debug, Clone)]
pub struct WorkspaceModel {
    /// Panels and tabs; only mutated through `update::layout`
    pub layout: Layout,
    pub menu: MenuRegistry,
    pub config: WorkspaceConfig,
    pub nav: NavState,
    pub viewport: ViewportState,
    pub router: MessageRouter,
    pub dirty: DirtyTracker,
    pub drag: DragController,
    pub gestures: GestureArbiter,
    pub hydration: HydrationGate,
}

impl WorkspaceModel {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            layout: Layout::new(),
            menu: config.menu_registry(),
            viewport: ViewportState::new(config.breakpoint_px),
            router: MessageRouter::new(&config.host_origin),
            nav: NavState::default(),
            dirty: DirtyTracker::new(),
            drag: DragController::default(),
            gestures: GestureArbiter::default(),
            hydration: HydrationGate::default(),
            config,
        }
    }

    pub fn is_wide(&self) -> bool {
        self.viewport.is_wide()
    }

    /// Whether the split affordance should be offered right now
    pub fn can_split(&self) -> bool {
        can_split(&self.layout, self.is_wide())
    }
}

impl Default for WorkspaceModel {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}
