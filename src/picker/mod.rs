//! Color picker panel
//!
//! Floating panel in the top-right corner, shown while a part is selected.
//! Edits go straight to the store as `SetSelectedColor`; the assembly picks
//! the new color up on its next rebuild.

use crate::store::{HexColor, MaterialId, SceneAction, SceneState, SceneStore};
use crate::ui::{
    draw_panel, panel_content_rect, panel_height_for, theme, ColorPicker, PickerLayout, Rect, UiContext,
};
use macroquad::prelude::draw_text;

const PANEL_WIDTH: f32 = 220.0;
const PANEL_MARGIN: f32 = 16.0;
/// Room under the picker for the "can't recolor" note
const NOTE_HEIGHT: f32 = 18.0;

/// What the panel shows, derived from store state alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerView {
    pub selected: MaterialId,
    /// Current color; `None` when the selection has no color entry
    pub color: Option<HexColor>,
}

impl PickerView {
    /// `None` means the panel is hidden
    pub fn from_state(state: &SceneState) -> Option<Self> {
        let selected = state.selected.clone()?;
        let color = state.color(&selected).cloned();
        Some(Self { selected, color })
    }

    pub fn label(&self) -> &str {
        self.selected.as_str()
    }

    pub fn editable(&self) -> bool {
        self.color.is_some()
    }
}

pub struct PickerPanel {
    picker: ColorPicker,
}

impl PickerPanel {
    pub fn new() -> Self {
        Self { picker: ColorPicker::new() }
    }

    /// Panel bounds inside `screen`
    pub fn rect(screen: &Rect) -> Rect {
        let content_width = PANEL_WIDTH - 16.0;
        let content_height = PickerLayout::height_for(content_width) + NOTE_HEIGHT;
        screen.anchor_top_right(PANEL_WIDTH, panel_height_for(content_height, true), PANEL_MARGIN)
    }

    fn layout(rect: &Rect) -> PickerLayout {
        PickerLayout::new(panel_content_rect(*rect, true))
    }

    /// Handle input for this frame. Returns true when a color was dispatched.
    pub fn update(&mut self, ctx: &mut UiContext, screen: &Rect, store: &mut SceneStore) -> bool {
        let Some(view) = PickerView::from_state(store.state()) else {
            return false;
        };
        let rect = Self::rect(screen);
        ctx.capture(&rect);

        if let Some(color) = &view.color {
            self.picker.sync(color);
        }
        let Some(color) = self.picker.interact(ctx, &Self::layout(&rect), view.editable()) else {
            return false;
        };
        log::debug!("picker: {} -> {}", view.label(), color);
        store.dispatch(SceneAction::SetSelectedColor(color)).is_some()
    }

    pub fn draw(&self, ctx: &UiContext, screen: &Rect, state: &SceneState) {
        let Some(view) = PickerView::from_state(state) else {
            return;
        };
        let rect = Self::rect(screen);
        draw_panel(rect, Some(view.label()), theme::BG_COLOR);

        let layout = Self::layout(&rect);
        let shown = view.color.clone().unwrap_or_else(|| HexColor::new("-"));
        self.picker.draw(ctx, &layout, &shown, view.editable());

        if !view.editable() {
            draw_text(
                "This part can't be recolored",
                layout.swatch.x,
                layout.swatch.bottom() + NOTE_HEIGHT - 4.0,
                theme::FONT_SIZE_SMALL,
                theme::TEXT_DIM,
            );
        }
    }
}

impl Default for PickerPanel {
    fn default() -> Self {
        Self::new()
    }
}
