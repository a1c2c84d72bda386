//! Shared scene state
//!
//! One owner holds the current selection and the color of every recolorable
//! material. The viewport and the picker panel never share the state by
//! reference; they read it through the store and change it by dispatching
//! actions. Anything that needs to react to changes subscribes and drains
//! its mailbox once per frame.
//!
//! Rules enforced here:
//! - the set of color keys is fixed when the store is built
//! - a color write only lands on the currently selected material
//! - writing a value equal to the current one is not a change

mod event;
mod types;

pub use event::EventQueue;
pub use types::{HexColor, MaterialId};

use std::collections::BTreeMap;

/// Materials whose color the user can change
pub const RECOLORABLE: [&str; 3] = ["Claxon", "Cylinder019", "material"];

/// Color every recolorable material starts with
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Snapshot of everything the store owns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneState {
    /// Material chosen for editing. `None` hides the picker.
    pub selected: Option<MaterialId>,
    /// Current color of each recolorable material
    pub colors: BTreeMap<MaterialId, HexColor>,
}

impl SceneState {
    /// Color for a material, `None` when it is not recolorable
    pub fn color(&self, id: &MaterialId) -> Option<&HexColor> {
        self.colors.get(id)
    }

    /// Color of the selected material, if any
    pub fn selected_color(&self) -> Option<&HexColor> {
        self.selected.as_ref().and_then(|id| self.colors.get(id))
    }

    pub fn is_recolorable(&self, id: &MaterialId) -> bool {
        self.colors.contains_key(id)
    }
}

/// Requests that change the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneAction {
    /// Set or clear the selection
    Select(Option<MaterialId>),
    /// Recolor whatever is currently selected
    SetSelectedColor(HexColor),
    /// Recolor a named material. Rejected unless it is the current selection.
    SetColor(MaterialId, HexColor),
}

/// What actually changed after a dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneChange {
    SelectionChanged {
        previous: Option<MaterialId>,
        current: Option<MaterialId>,
    },
    ColorChanged {
        id: MaterialId,
        color: HexColor,
    },
}

/// Handle to a subscriber's mailbox. Not cloneable: one handle per consumer.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription(usize);

/// Owner of the scene state
#[derive(Debug)]
pub struct SceneStore {
    state: SceneState,
    subscribers: Vec<Option<EventQueue<SceneChange>>>,
}

impl SceneStore {
    /// Build a store with a fixed set of recolorable materials, all set to `default`
    pub fn new<S: AsRef<str>>(recolorable: &[S], default: HexColor) -> Self {
        let colors = recolorable
            .iter()
            .map(|id| (MaterialId::new(id.as_ref()), default.clone()))
            .collect();

        Self {
            state: SceneState { selected: None, colors },
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn selected(&self) -> Option<&MaterialId> {
        self.state.selected.as_ref()
    }

    pub fn color(&self, id: &MaterialId) -> Option<&HexColor> {
        self.state.color(id)
    }

    /// Apply an action. Returns the resulting change, or `None` when the
    /// action was a no-op or was rejected.
    pub fn dispatch(&mut self, action: SceneAction) -> Option<SceneChange> {
        let change = match action {
            SceneAction::Select(next) => self.select(next),
            SceneAction::SetSelectedColor(color) => {
                let id = self.state.selected.clone()?;
                self.write_color(id, color)
            }
            SceneAction::SetColor(id, color) => {
                if self.state.selected.as_ref() != Some(&id) {
                    log::debug!("ignoring color write to {}: not the current selection", id);
                    return None;
                }
                self.write_color(id, color)
            }
        }?;

        for queue in self.subscribers.iter_mut().flatten() {
            queue.send(change.clone());
        }
        Some(change)
    }

    fn select(&mut self, next: Option<MaterialId>) -> Option<SceneChange> {
        if self.state.selected == next {
            return None;
        }
        let previous = std::mem::replace(&mut self.state.selected, next.clone());
        log::debug!(
            "selection: {} -> {}",
            previous.as_ref().map_or("none", |id| id.as_str()),
            next.as_ref().map_or("none", |id| id.as_str()),
        );
        Some(SceneChange::SelectionChanged { previous, current: next })
    }

    fn write_color(&mut self, id: MaterialId, color: HexColor) -> Option<SceneChange> {
        let Some(slot) = self.state.colors.get_mut(&id) else {
            log::debug!("ignoring color write to {}: not recolorable", id);
            return None;
        };
        if *slot == color {
            return None;
        }
        *slot = color.clone();
        Some(SceneChange::ColorChanged { id, color })
    }

    /// Register a new mailbox. Only changes dispatched after this call are delivered.
    pub fn subscribe(&mut self) -> Subscription {
        if let Some(free) = self.subscribers.iter().position(Option::is_none) {
            self.subscribers[free] = Some(EventQueue::new());
            return Subscription(free);
        }
        self.subscribers.push(Some(EventQueue::new()));
        Subscription(self.subscribers.len() - 1)
    }

    /// Take every change delivered to this subscriber since its last drain
    pub fn drain(&mut self, subscription: &Subscription) -> Vec<SceneChange> {
        self.subscribers
            .get_mut(subscription.0)
            .and_then(Option::as_mut)
            .map(|queue| queue.drain().collect())
            .unwrap_or_default()
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        if let Some(slot) = self.subscribers.get_mut(subscription.0) {
            *slot = None;
        }
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(&RECOLORABLE, HexColor::from(DEFAULT_COLOR))
    }
}
