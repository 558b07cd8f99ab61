//! Drag/reorder state: drop zones, collision detection, gesture ownership,
//! and drop resolution.
//!
//! The design follows a "hit-test → resolve" pattern:
//! 1. The host registers drop zones (rectangles tagged with what they mean)
//! 2. [`detect_collision`] picks the most specific zone under the pointer
//! 3. [`resolve_drop`] turns the drop into a layout action, revalidating every
//!    id against the current layout first

use serde::{Deserialize, Serialize};

use super::layout::{Layout, PanelId, TabId};

/// Pointer travel (in CSS pixels) before a press becomes a drag
pub const DRAG_THRESHOLD_PX: f64 = 4.0;

// ============================================================================
// Geometry
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

// ============================================================================
// Drop zones
// ============================================================================

/// What dropping on a zone means
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DropZoneKind {
    /// Dedicated "move to this panel" target
    #[serde(rename_all = "camelCase")]
    CrossPanel { panel_id: PanelId },
    /// "Split into new panel" affordance
    Split,
    /// The position currently occupied by `tab_id`
    #[serde(rename_all = "camelCase")]
    TabSlot { panel_id: PanelId, tab_id: TabId },
    /// Generic panel body
    #[serde(rename_all = "camelCase")]
    PanelBody { panel_id: PanelId },
}

impl DropZoneKind {
    /// Higher wins when zones overlap
    pub fn priority(&self) -> u8 {
        match self {
            DropZoneKind::CrossPanel { .. } | DropZoneKind::Split => 3,
            DropZoneKind::TabSlot { .. } => 2,
            DropZoneKind::PanelBody { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropZone {
    pub kind: DropZoneKind,
    pub rect: Rect,
}

impl DropZone {
    pub fn new(kind: DropZoneKind, rect: Rect) -> Self {
        Self { kind, rect }
    }
}

/// Most specific zone under the pointer: highest priority, then smallest area.
/// Bare space is not a target.
pub fn detect_collision(zones: &[DropZone], point: Point) -> Option<&DropZoneKind> {
    zones
        .iter()
        .filter(|z| z.rect.contains(point))
        .max_by(|a, b| {
            a.kind
                .priority()
                .cmp(&b.kind.priority())
                .then_with(|| b.rect.area().total_cmp(&a.rect.area()))
        })
        .map(|z| &z.kind)
}

// ============================================================================
// Gesture ownership
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureKind {
    TabDrag,
    /// Box selection elsewhere in the UI
    Marquee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureOwner {
    pub kind: GestureKind,
    pub pointer_id: u32,
}

/// Exactly one pointer gesture may be active at a time
#[derive(Debug, Clone, Default)]
pub struct GestureArbiter {
    owner: Option<GestureOwner>,
}

impl GestureArbiter {
    pub fn owner(&self) -> Option<GestureOwner> {
        self.owner
    }

    pub fn is_idle(&self) -> bool {
        self.owner.is_none()
    }

    /// Claim ownership on pointer-down; fails while another gesture is active
    pub fn try_acquire(&mut self, kind: GestureKind, pointer_id: u32) -> bool {
        if self.owner.is_some() {
            return false;
        }
        self.owner = Some(GestureOwner { kind, pointer_id });
        true
    }

    /// Release on pointer-up/cancel; only the owning pointer can release
    pub fn release(&mut self, kind: GestureKind, pointer_id: u32) -> bool {
        match self.owner {
            Some(owner) if owner.kind == kind && owner.pointer_id == pointer_id => {
                self.owner = None;
                true
            }
            _ => false,
        }
    }

    /// Drop ownership unconditionally (window blur)
    pub fn reset(&mut self) {
        self.owner = None;
    }
}

// ============================================================================
// Drag session
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pointer is down but has not travelled past the threshold
    Pressed,
    Dragging,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub pointer_id: u32,
    pub tab_id: TabId,
    pub origin_panel: PanelId,
    pub start: Point,
    pub phase: DragPhase,
    /// Zone currently under the pointer (for hover feedback)
    pub hover: Option<DropZoneKind>,
}

/// Why a pointer event was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerIgnored {
    GestureBusy,
    NoActivePointer,
    PointerMismatch,
}

/// How a tracked press ended
#[derive(Debug, Clone, PartialEq)]
pub enum DragRelease {
    /// Released before the threshold: treat as a click on the tab
    Click { tab_id: TabId, panel_id: PanelId },
    Drop {
        tab_id: TabId,
        origin_panel: PanelId,
        target: Option<DropZoneKind>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    zones: Vec<DropZone>,
    session: Option<DragSession>,
}

impl DragController {
    pub fn set_zones(&mut self, zones: Vec<DropZone>) {
        self.zones = zones;
    }

    pub fn zones(&self) -> &[DropZone] {
        &self.zones
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self.session,
            Some(DragSession {
                phase: DragPhase::Dragging,
                ..
            })
        )
    }

    pub fn pointer_down(
        &mut self,
        arbiter: &mut GestureArbiter,
        pointer_id: u32,
        tab_id: TabId,
        panel_id: PanelId,
        pos: Point,
    ) -> Result<(), PointerIgnored> {
        if !arbiter.try_acquire(GestureKind::TabDrag, pointer_id) {
            return Err(PointerIgnored::GestureBusy);
        }
        self.session = Some(DragSession {
            pointer_id,
            tab_id,
            origin_panel: panel_id,
            start: pos,
            phase: DragPhase::Pressed,
            hover: None,
        });
        Ok(())
    }

    pub fn pointer_move(&mut self, pointer_id: u32, pos: Point) -> Result<(), PointerIgnored> {
        let session = self.session.as_mut().ok_or(PointerIgnored::NoActivePointer)?;
        if session.pointer_id != pointer_id {
            return Err(PointerIgnored::PointerMismatch);
        }
        if session.phase == DragPhase::Pressed && session.start.distance(pos) >= DRAG_THRESHOLD_PX {
            session.phase = DragPhase::Dragging;
        }
        if session.phase == DragPhase::Dragging {
            session.hover = detect_collision(&self.zones, pos).cloned();
        }
        Ok(())
    }

    pub fn pointer_up(
        &mut self,
        arbiter: &mut GestureArbiter,
        pointer_id: u32,
        pos: Point,
    ) -> Result<DragRelease, PointerIgnored> {
        match &self.session {
            None => return Err(PointerIgnored::NoActivePointer),
            Some(s) if s.pointer_id != pointer_id => return Err(PointerIgnored::PointerMismatch),
            Some(_) => {}
        }
        let Some(session) = self.session.take() else {
            return Err(PointerIgnored::NoActivePointer);
        };
        arbiter.release(GestureKind::TabDrag, pointer_id);

        let travelled = session.start.distance(pos) >= DRAG_THRESHOLD_PX;
        if session.phase == DragPhase::Pressed && !travelled {
            return Ok(DragRelease::Click {
                tab_id: session.tab_id,
                panel_id: session.origin_panel,
            });
        }
        Ok(DragRelease::Drop {
            target: detect_collision(&self.zones, pos).cloned(),
            tab_id: session.tab_id,
            origin_panel: session.origin_panel,
        })
    }

    /// Abort the drag (pointer cancel, blur). `None` cancels whatever is active.
    pub fn cancel(&mut self, arbiter: &mut GestureArbiter, pointer_id: Option<u32>) -> bool {
        let matches = match (&self.session, pointer_id) {
            (Some(_), None) => true,
            (Some(s), Some(id)) => s.pointer_id == id,
            (None, _) => false,
        };
        if !matches {
            return false;
        }
        if let Some(session) = self.session.take() {
            arbiter.release(GestureKind::TabDrag, session.pointer_id);
        }
        true
    }
}

// ============================================================================
// Drop resolution
// ============================================================================

/// Why a drop had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIgnored {
    NoTarget,
    /// Dropped on its own slot
    SelfDrop,
    /// Dropped on the panel it already lives in
    SamePanel,
    SplitUnavailable,
    /// Tab closed during the drag
    StaleTab,
    UnknownPanel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    Reorder {
        panel_id: PanelId,
        tab_id: TabId,
        to_index: usize,
    },
    MoveToPanel {
        tab_id: TabId,
        from: PanelId,
        to: PanelId,
    },
    Split {
        tab_id: TabId,
    },
    Ignore(DropIgnored),
}

/// Split affordance: one panel, at least two tabs, wide viewport
pub fn can_split(layout: &Layout, wide: bool) -> bool {
    wide && layout.panels().len() == 1 && layout.tab_count() >= 2
}

/// Turn a drop into a layout action. The tab's panel is looked up now rather
/// than trusted from the drag start, since the layout may have changed mid-drag.
pub fn resolve_drop(
    layout: &Layout,
    tab_id: &TabId,
    target: Option<&DropZoneKind>,
    wide: bool,
) -> DropAction {
    let Some(current) = layout.find_tab_panel(tab_id) else {
        return DropAction::Ignore(DropIgnored::StaleTab);
    };
    let Some(target) = target else {
        return DropAction::Ignore(DropIgnored::NoTarget);
    };

    let move_to = |panel_id: &PanelId| {
        if *panel_id == current.id {
            DropAction::Ignore(DropIgnored::SamePanel)
        } else if layout.panel(panel_id).is_none() {
            DropAction::Ignore(DropIgnored::UnknownPanel)
        } else {
            DropAction::MoveToPanel {
                tab_id: tab_id.clone(),
                from: current.id.clone(),
                to: panel_id.clone(),
            }
        }
    };

    match target {
        DropZoneKind::TabSlot {
            panel_id,
            tab_id: over,
        } if *panel_id == current.id => {
            if over == tab_id {
                return DropAction::Ignore(DropIgnored::SelfDrop);
            }
            match current.position(over) {
                Some(to_index) => DropAction::Reorder {
                    panel_id: current.id.clone(),
                    tab_id: tab_id.clone(),
                    to_index,
                },
                // The hovered tab left this panel mid-drag
                None => DropAction::Ignore(DropIgnored::NoTarget),
            }
        }
        DropZoneKind::TabSlot { panel_id, .. }
        | DropZoneKind::CrossPanel { panel_id }
        | DropZoneKind::PanelBody { panel_id } => move_to(panel_id),
        DropZoneKind::Split => {
            if can_split(layout, wide) {
                DropAction::Split {
                    tab_id: tab_id.clone(),
                }
            } else {
                DropAction::Ignore(DropIgnored::SplitUnavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(kind: DropZoneKind, x: f64, y: f64, w: f64, h: f64) -> DropZone {
        DropZone::new(kind, Rect::new(x, y, w, h))
    }

    #[test]
    fn test_collision_prefers_cross_panel_over_body() {
        let p = PanelId::new("panel-2");
        let zones = vec![
            zone(DropZoneKind::PanelBody { panel_id: p.clone() }, 0.0, 0.0, 500.0, 500.0),
            zone(DropZoneKind::CrossPanel { panel_id: p.clone() }, 100.0, 100.0, 200.0, 200.0),
        ];
        assert_eq!(
            detect_collision(&zones, Point::new(150.0, 150.0)),
            Some(&DropZoneKind::CrossPanel { panel_id: p.clone() })
        );
        assert_eq!(
            detect_collision(&zones, Point::new(10.0, 10.0)),
            Some(&DropZoneKind::PanelBody { panel_id: p })
        );
        assert_eq!(detect_collision(&zones, Point::new(900.0, 900.0)), None);
    }

    #[test]
    fn test_collision_tie_breaks_on_smaller_area() {
        let a = PanelId::new("panel-1");
        let b = PanelId::new("panel-2");
        let zones = vec![
            zone(DropZoneKind::PanelBody { panel_id: a }, 0.0, 0.0, 800.0, 600.0),
            zone(DropZoneKind::PanelBody { panel_id: b.clone() }, 0.0, 0.0, 100.0, 100.0),
        ];
        assert_eq!(
            detect_collision(&zones, Point::new(50.0, 50.0)),
            Some(&DropZoneKind::PanelBody { panel_id: b })
        );
    }

    #[test]
    fn test_arbiter_single_owner() {
        let mut arbiter = GestureArbiter::default();
        assert!(arbiter.try_acquire(GestureKind::Marquee, 1));
        assert!(!arbiter.try_acquire(GestureKind::TabDrag, 2));
        assert!(!arbiter.release(GestureKind::Marquee, 2));
        assert!(arbiter.release(GestureKind::Marquee, 1));
        assert!(arbiter.try_acquire(GestureKind::TabDrag, 2));
    }

    #[test]
    fn test_press_without_travel_is_click() {
        let mut arbiter = GestureArbiter::default();
        let mut drag = DragController::default();
        drag.pointer_down(
            &mut arbiter,
            7,
            TabId::new("a"),
            PanelId::new("panel-1"),
            Point::new(10.0, 10.0),
        )
        .unwrap();
        drag.pointer_move(7, Point::new(11.0, 11.0)).unwrap();
        assert!(!drag.is_dragging());

        let release = drag.pointer_up(&mut arbiter, 7, Point::new(11.0, 11.0)).unwrap();
        assert!(matches!(release, DragRelease::Click { .. }));
        assert!(arbiter.is_idle());
    }

    #[test]
    fn test_foreign_pointer_ignored_mid_drag() {
        let mut arbiter = GestureArbiter::default();
        let mut drag = DragController::default();
        drag.pointer_down(
            &mut arbiter,
            1,
            TabId::new("a"),
            PanelId::new("panel-1"),
            Point::default(),
        )
        .unwrap();
        assert_eq!(
            drag.pointer_move(2, Point::new(50.0, 0.0)),
            Err(PointerIgnored::PointerMismatch)
        );
        assert_eq!(
            drag.pointer_down(
                &mut arbiter,
                2,
                TabId::new("b"),
                PanelId::new("panel-1"),
                Point::default()
            ),
            Err(PointerIgnored::GestureBusy)
        );
        assert!(drag.cancel(&mut arbiter, Some(1)));
        assert!(arbiter.is_idle());
    }
}
