//! UI Theme - Shared colors and styling constants

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Panel background
pub const BG_COLOR: Color = Color::new(0.11, 0.11, 0.13, 0.92);

/// Panel title bar
pub const HEADER_COLOR: Color = Color::new(0.15, 0.15, 0.18, 1.0);

/// Panel outline
pub const BORDER_COLOR: Color = Color::new(0.31, 0.31, 0.31, 1.0);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.4, 0.4, 0.45, 1.0);

/// Handles and focus rings
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

/// Wash over widgets that can't be edited
pub const DISABLED_OVERLAY: Color = Color::new(0.11, 0.11, 0.13, 0.6);

// =============================================================================
// Font Sizes
// =============================================================================

/// Header/title text size
pub const FONT_SIZE_HEADER: f32 = 16.0;

/// Standard content text size
pub const FONT_SIZE_CONTENT: f32 = 14.0;

/// Small/detail text size
pub const FONT_SIZE_SMALL: f32 = 12.0;
