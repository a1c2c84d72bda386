//! Immediate-mode UI for the configurator overlay
//!
//! - Simple rectangle-based layout
//! - Widgets rebuilt every frame from the app state they display
//! - Macroquad integration for rendering

mod rect;
mod input;
mod panel;
pub mod color_picker;
pub mod theme;

pub use rect::*;
pub use input::*;
pub use panel::*;
pub use color_picker::{ColorPicker, Hsv, PickerLayout};
