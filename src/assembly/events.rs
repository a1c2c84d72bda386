//! Pointer events on the assembly
//!
//! Per frame the hit list is turned into enter/leave/down/missed events:
//! - enter: the nearest part changed, hover becomes its material
//! - leave: a part is no longer under the pointer; hover clears only when
//!   nothing else is
//! - down: press on a part selects its material
//! - missed: a click (press and release without dragging) on empty space
//!   clears the selection

use super::hit::Hit;
use crate::store::{MaterialId, SceneAction, SceneStore};

/// A click may wander this many framebuffer pixels and still count as a click
pub const CLICK_TOLERANCE: f32 = 2.0;

/// Pointer input for one frame, in framebuffer coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerInput {
    /// `None` when the pointer is outside the viewport
    pub position: Option<(f32, f32)>,
    pub pressed: bool,
    pub released: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Enter { part: usize, material: MaterialId },
    Leave { part: usize },
    Down { part: usize, material: MaterialId },
    Missed,
}

/// What the pointer is over, local to the viewport
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    /// Material shown by the cursor
    pub hovered: Option<MaterialId>,
    /// Every part currently under the pointer
    pub under_pointer: Vec<usize>,
    /// Part that received the last enter
    pub top: Option<usize>,
}

#[derive(Debug, Default)]
pub struct PointerRouter {
    hover: HoverState,
    /// Where a press on empty space started
    miss_origin: Option<(f32, f32)>,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn hovered(&self) -> Option<&MaterialId> {
        self.hover.hovered.as_ref()
    }

    /// Turn this frame's hits and input into events, in the order they fire.
    /// The hovered set is updated to the current hits before any event is applied.
    pub fn route(&mut self, hits: &[Hit], input: &PointerInput) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let hits: &[Hit] = if input.position.is_some() { hits } else { &[] };

        for &part in &self.hover.under_pointer {
            if !hits.iter().any(|h| h.part == part) {
                events.push(PointerEvent::Leave { part });
            }
        }

        if let Some(first) = hits.first() {
            if self.hover.top != Some(first.part) {
                events.push(PointerEvent::Enter { part: first.part, material: first.material.clone() });
            }
        }

        if input.pressed {
            match hits.first() {
                Some(first) => {
                    self.miss_origin = None;
                    events.push(PointerEvent::Down { part: first.part, material: first.material.clone() });
                }
                None => self.miss_origin = input.position,
            }
        }

        if input.released {
            if let (Some(origin), Some(pos)) = (self.miss_origin.take(), input.position) {
                let moved = ((pos.0 - origin.0).powi(2) + (pos.1 - origin.1).powi(2)).sqrt();
                if hits.is_empty() && moved <= CLICK_TOLERANCE {
                    events.push(PointerEvent::Missed);
                }
            }
        }

        self.hover.under_pointer = hits.iter().map(|h| h.part).collect();
        events
    }

    /// Apply one event. Returns true when the hovered material changed.
    pub fn apply(&mut self, event: &PointerEvent, store: &mut SceneStore) -> bool {
        let before = self.hover.hovered.clone();
        match event {
            PointerEvent::Enter { part, material } => {
                self.hover.top = Some(*part);
                self.hover.hovered = Some(material.clone());
            }
            PointerEvent::Leave { part } => {
                if self.hover.top == Some(*part) {
                    self.hover.top = None;
                }
                if self.hover.under_pointer.is_empty() {
                    self.hover.hovered = None;
                }
            }
            PointerEvent::Down { material, .. } => {
                store.dispatch(SceneAction::Select(Some(material.clone())));
            }
            PointerEvent::Missed => {
                store.dispatch(SceneAction::Select(None));
            }
        }

        let changed = before != self.hover.hovered;
        if changed {
            log::debug!("Hover: {:?} -> {:?}", before, self.hover.hovered);
        }
        changed
    }

    /// Route and apply in one step. Returns true when the hovered material changed.
    pub fn handle(&mut self, hits: &[Hit], input: &PointerInput, store: &mut SceneStore) -> bool {
        let mut changed = false;
        for event in self.route(hits, input) {
            changed |= self.apply(&event, store);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SceneStore;

    fn hit(part: usize, material: &str, depth: f32) -> Hit {
        Hit { part, material: MaterialId::from(material), depth }
    }

    fn at(x: f32, y: f32) -> PointerInput {
        PointerInput { position: Some((x, y)), ..PointerInput::default() }
    }

    #[test]
    fn test_enter_sets_hover_to_nearest() {
        let mut router = PointerRouter::new();
        let mut store = SceneStore::default();

        let changed = router.handle(&[hit(3, "Claxon", 2.0), hit(1, "material", 4.0)], &at(10.0, 10.0), &mut store);
        assert!(changed);
        assert_eq!(router.hovered().map(|m| m.as_str()), Some("Claxon"));
        assert_eq!(router.hover().under_pointer, vec![3, 1]);
    }

    #[test]
    fn test_leave_keeps_hover_while_other_part_under_pointer() {
        let mut router = PointerRouter::new();
        let mut store = SceneStore::default();
        let a = hit(0, "Claxon", 2.0);
        let b = hit(1, "Cylinder019", 4.0);

        router.handle(&[a.clone(), b.clone()], &at(10.0, 10.0), &mut store);

        // Leaving A alone, with B still under the pointer, does not clear hover
        router.hover.under_pointer = vec![1];
        assert!(!router.apply(&PointerEvent::Leave { part: 0 }, &mut store));
        assert!(router.hovered().is_some());

        // Through the full routing, hover moves on to B rather than clearing
        let mut router = PointerRouter::new();
        router.handle(&[a, b.clone()], &at(10.0, 10.0), &mut store);
        router.handle(&[b], &at(12.0, 10.0), &mut store);
        assert_eq!(router.hovered().map(|m| m.as_str()), Some("Cylinder019"));

        // Off everything clears it
        assert!(router.handle(&[], &at(300.0, 10.0), &mut store));
        assert!(router.hovered().is_none());
        assert!(router.hover().under_pointer.is_empty());
    }

    #[test]
    fn test_pointer_leaving_viewport_clears_hover() {
        let mut router = PointerRouter::new();
        let mut store = SceneStore::default();
        router.handle(&[hit(0, "Claxon", 2.0)], &at(10.0, 10.0), &mut store);

        let outside = PointerInput::default();
        assert!(router.handle(&[hit(0, "Claxon", 2.0)], &outside, &mut store));
        assert!(router.hovered().is_none());
    }

    #[test]
    fn test_pointer_down_is_idempotent() {
        let mut router = PointerRouter::new();
        let mut store = SceneStore::default();
        let hits = [hit(0, "Claxon", 2.0)];
        let press = PointerInput { pressed: true, ..at(10.0, 10.0) };

        router.handle(&hits, &press, &mut store);
        assert_eq!(store.selected().map(|m| m.as_str()), Some("Claxon"));

        router.handle(&hits, &press, &mut store);
        router.handle(&hits, &press, &mut store);
        assert_eq!(store.selected().map(|m| m.as_str()), Some("Claxon"));
    }

    #[test]
    fn test_pointer_down_replaces_selection() {
        let mut router = PointerRouter::new();
        let mut store = SceneStore::default();
        store.dispatch(SceneAction::Select(Some(MaterialId::from("material"))));

        let press = PointerInput { pressed: true, ..at(10.0, 10.0) };
        router.handle(&[hit(2, "Far", 1.0)], &press, &mut store);
        assert_eq!(store.selected().map(|m| m.as_str()), Some("Far"));
    }

    #[test]
    fn test_click_on_nothing_clears_selection() {
        let mut router = PointerRouter::new();
        let mut store = SceneStore::default();
        store.dispatch(SceneAction::Select(Some(MaterialId::from("Claxon"))));

        router.handle(&[], &PointerInput { pressed: true, ..at(5.0, 5.0) }, &mut store);
        assert!(store.selected().is_some());
        router.handle(&[], &PointerInput { released: true, ..at(6.0, 5.0) }, &mut store);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_drag_on_nothing_keeps_selection() {
        let mut router = PointerRouter::new();
        let mut store = SceneStore::default();
        store.dispatch(SceneAction::Select(Some(MaterialId::from("Claxon"))));

        router.handle(&[], &PointerInput { pressed: true, ..at(5.0, 5.0) }, &mut store);
        router.handle(&[], &PointerInput { released: true, ..at(80.0, 5.0) }, &mut store);
        assert_eq!(store.selected().map(|m| m.as_str()), Some("Claxon"));
    }

    #[test]
    fn test_events_in_firing_order() {
        let mut router = PointerRouter::new();
        router.route(&[hit(0, "Claxon", 2.0)], &at(10.0, 10.0));

        let events = router.route(&[hit(1, "Far", 3.0)], &PointerInput { pressed: true, ..at(11.0, 10.0) });
        assert_eq!(
            events,
            vec![
                PointerEvent::Leave { part: 0 },
                PointerEvent::Enter { part: 1, material: MaterialId::from("Far") },
                PointerEvent::Down { part: 1, material: MaterialId::from("Far") },
            ]
        );
    }
}
