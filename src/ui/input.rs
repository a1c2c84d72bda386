//! Input state for UI interaction

use super::Rect;
use macroquad::prelude::{
    is_mouse_button_down, is_mouse_button_pressed, is_mouse_button_released, mouse_position, MouseButton,
};

/// Mouse button state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool,  // Just pressed this frame
    pub left_released: bool, // Just released this frame
}

impl MouseState {
    /// Read the current frame's mouse from macroquad
    pub fn poll() -> Self {
        let (x, y) = mouse_position();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            left_released: is_mouse_button_released(MouseButton::Left),
        }
    }

    /// Check if mouse is inside a rect
    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }

    /// Check if mouse just clicked inside a rect
    pub fn clicked(&self, rect: &Rect) -> bool {
        self.left_pressed && rect.contains(self.x, self.y)
    }
}

/// UI context passed through the frame
pub struct UiContext {
    pub mouse: MouseState,
    /// ID of the widget currently being dragged (if any)
    pub dragging: Option<u64>,
    /// ID of the widget that is "hot" (mouse hovering)
    pub hot: Option<u64>,
    /// Set when a press landed on UI this frame, so the scene ignores it
    pub captured: bool,
    /// Counter for generating unique IDs
    id_counter: u64,
}

impl UiContext {
    pub fn new() -> Self {
        Self {
            mouse: MouseState::default(),
            dragging: None,
            hot: None,
            captured: false,
            id_counter: 0,
        }
    }

    /// Generate a unique ID for a widget
    pub fn next_id(&mut self) -> u64 {
        self.id_counter += 1;
        self.id_counter
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
        self.hot = None;
        self.captured = false;
        self.id_counter = 0;

        // Clear dragging if mouse released
        if !self.mouse.left_down && !self.mouse.left_pressed {
            self.dragging = None;
        }
    }

    /// Claim the mouse for UI when it is over `rect` or a widget is dragging
    pub fn capture(&mut self, rect: &Rect) {
        if self.mouse.inside(rect) || self.dragging.is_some() {
            self.captured = true;
        }
    }

    pub fn is_dragging(&self, id: u64) -> bool {
        self.dragging == Some(id)
    }

    pub fn start_drag(&mut self, id: u64) {
        self.dragging = Some(id);
    }

    /// Set hot widget (hovering)
    pub fn set_hot(&mut self, id: u64) {
        // Only set hot if not dragging something else
        if self.dragging.is_none() || self.dragging == Some(id) {
            self.hot = Some(id);
        }
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_ends_on_release() {
        let mut ctx = UiContext::new();
        ctx.begin_frame(MouseState { left_down: true, left_pressed: true, ..MouseState::default() });
        let id = ctx.next_id();
        ctx.start_drag(id);
        assert!(ctx.is_dragging(id));

        ctx.begin_frame(MouseState { left_down: true, ..MouseState::default() });
        assert!(ctx.is_dragging(id));
        // Ids restart every frame so widgets keep theirs
        assert_eq!(ctx.next_id(), id);

        ctx.begin_frame(MouseState { left_released: true, ..MouseState::default() });
        assert!(ctx.dragging.is_none());
    }

    #[test]
    fn test_capture() {
        let panel = Rect::new(0.0, 0.0, 50.0, 50.0);
        let mut ctx = UiContext::new();

        ctx.begin_frame(MouseState { x: 100.0, y: 100.0, ..MouseState::default() });
        ctx.capture(&panel);
        assert!(!ctx.captured);

        ctx.begin_frame(MouseState { x: 10.0, y: 10.0, ..MouseState::default() });
        ctx.capture(&panel);
        assert!(ctx.captured);
    }
}
