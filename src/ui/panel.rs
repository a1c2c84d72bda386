//! Panel frames

use macroquad::prelude::*;
use super::{theme, Rect};

/// Height of a panel's title bar
pub const PANEL_TITLE_HEIGHT: f32 = 22.0;

/// Draw a panel background with optional title
pub fn draw_panel(rect: Rect, title: Option<&str>, bg_color: Color) {
    // Background
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, bg_color);

    // Title bar if provided
    if let Some(title) = title {
        draw_rectangle(rect.x, rect.y, rect.w, PANEL_TITLE_HEIGHT, theme::HEADER_COLOR);
        draw_text(title, rect.x + 6.0, rect.y + 16.0, theme::FONT_SIZE_HEADER, theme::TEXT_COLOR);
    }

    // Border
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, theme::BORDER_COLOR);
}

/// Get the content area of a panel (after title bar)
pub fn panel_content_rect(rect: Rect, has_title: bool) -> Rect {
    if has_title {
        rect.remaining_after_top(PANEL_TITLE_HEIGHT).pad(8.0)
    } else {
        rect.pad(8.0)
    }
}

/// Outer panel height that leaves `content_height` of room inside
pub fn panel_height_for(content_height: f32, has_title: bool) -> f32 {
    let title = if has_title { PANEL_TITLE_HEIGHT } else { 0.0 };
    content_height + title + 16.0
}
