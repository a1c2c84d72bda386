//! HSV color picker widget
//!
//! A saturation/value square over the current hue, a hue strip under it and
//! a swatch row with the hex string. The widget keeps its own HSV so hue
//! survives dragging through grey, and only re-reads the outside color when
//! it changes to something the widget didn't produce itself.

use macroquad::prelude::*;
use super::{theme, Rect, UiContext};
use crate::store::HexColor;

const GAP: f32 = 8.0;
const HUE_STRIP_HEIGHT: f32 = 14.0;
const SWATCH_HEIGHT: f32 = 22.0;
/// Square height as a fraction of its width
const SQUARE_ASPECT: f32 = 0.75;
/// Cells per side when drawing the square
const SQUARE_CELLS: usize = 24;
const HUE_CELLS: usize = 48;

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h: h.rem_euclid(360.0), s: s.clamp(0.0, 1.0), v: v.clamp(0.0, 1.0) }
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta <= f32::EPSILON {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max <= f32::EPSILON { 0.0 } else { delta / max };
        Self::new(h, s, max)
    }

    pub fn to_rgb(self) -> (u8, u8, u8) {
        let c = self.v * self.s;
        let hp = self.h / 60.0;
        let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.v - c;
        let to_u8 = |f: f32| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_u8(r), to_u8(g), to_u8(b))
    }

    pub fn to_hex(self) -> HexColor {
        let (r, g, b) = self.to_rgb();
        HexColor::from_rgb(r, g, b)
    }

    fn to_color(self) -> Color {
        let (r, g, b) = self.to_rgb();
        Color::from_rgba(r, g, b, 255)
    }
}

/// Where each part of the picker goes inside its rect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerLayout {
    pub square: Rect,
    pub hue: Rect,
    pub swatch: Rect,
}

impl PickerLayout {
    pub fn new(rect: Rect) -> Self {
        let square_h = rect.w * SQUARE_ASPECT;
        let square = rect.slice_top(square_h);
        let rest = rect.remaining_after_top(square_h + GAP);
        let hue = rest.slice_top(HUE_STRIP_HEIGHT);
        let swatch = rest.remaining_after_top(HUE_STRIP_HEIGHT + GAP).slice_top(SWATCH_HEIGHT);
        Self { square, hue, swatch }
    }

    /// Height needed for a picker `width` wide
    pub fn height_for(width: f32) -> f32 {
        width * SQUARE_ASPECT + GAP + HUE_STRIP_HEIGHT + GAP + SWATCH_HEIGHT
    }
}

pub struct ColorPicker {
    hsv: Hsv,
    /// Last color seen from outside or handed out by `interact`
    synced: Option<HexColor>,
}

impl ColorPicker {
    pub fn new() -> Self {
        Self { hsv: Hsv::new(0.0, 0.0, 1.0), synced: None }
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    /// Follow an outside color. Unparseable strings leave the HSV alone.
    pub fn sync(&mut self, color: &HexColor) {
        if self.synced.as_ref() == Some(color) {
            return;
        }
        if let Some((r, g, b)) = color.to_rgb() {
            let next = Hsv::from_rgb(r, g, b);
            // Keep hue when the new color has none
            self.hsv = if next.s == 0.0 || next.v == 0.0 { Hsv { h: self.hsv.h, ..next } } else { next };
        }
        self.synced = Some(color.clone());
    }

    /// Handle dragging on the square and strip. Returns the new color when
    /// the user changed it.
    pub fn interact(&mut self, ctx: &mut UiContext, layout: &PickerLayout, enabled: bool) -> Option<HexColor> {
        let square_id = ctx.next_id();
        let hue_id = ctx.next_id();
        if !enabled {
            return None;
        }

        for (id, rect) in [(square_id, &layout.square), (hue_id, &layout.hue)] {
            if ctx.dragging.is_none() && ctx.mouse.inside(rect) {
                ctx.set_hot(id);
                if ctx.mouse.left_pressed {
                    ctx.start_drag(id);
                }
            }
        }

        let before = self.hsv;
        if ctx.is_dragging(square_id) {
            let (fx, fy) = layout.square.fraction_of(ctx.mouse.x, ctx.mouse.y);
            self.hsv = Hsv::new(self.hsv.h, fx, 1.0 - fy);
        } else if ctx.is_dragging(hue_id) {
            let (fx, _) = layout.hue.fraction_of(ctx.mouse.x, ctx.mouse.y);
            self.hsv = Hsv::new(fx * 360.0, self.hsv.s, self.hsv.v);
        }
        if self.hsv == before {
            return None;
        }

        let hex = self.hsv.to_hex();
        if self.synced.as_ref() == Some(&hex) {
            return None;
        }
        self.synced = Some(hex.clone());
        Some(hex)
    }

    pub fn draw(&self, ctx: &UiContext, layout: &PickerLayout, color: &HexColor, enabled: bool) {
        let square = layout.square;
        let (cw, ch) = (square.w / SQUARE_CELLS as f32, square.h / SQUARE_CELLS as f32);
        for row in 0..SQUARE_CELLS {
            let v = 1.0 - (row as f32 + 0.5) / SQUARE_CELLS as f32;
            for col in 0..SQUARE_CELLS {
                let s = (col as f32 + 0.5) / SQUARE_CELLS as f32;
                let cell = Hsv::new(self.hsv.h, s, v).to_color();
                draw_rectangle(square.x + col as f32 * cw, square.y + row as f32 * ch, cw + 0.5, ch + 0.5, cell);
            }
        }
        let (mx, my) = (square.x + self.hsv.s * square.w, square.y + (1.0 - self.hsv.v) * square.h);
        draw_circle_lines(mx, my, 5.0, 2.0, WHITE);
        draw_circle_lines(mx, my, 6.5, 1.0, BLACK);

        let hue = layout.hue;
        let hw = hue.w / HUE_CELLS as f32;
        for i in 0..HUE_CELLS {
            let h = (i as f32 + 0.5) / HUE_CELLS as f32 * 360.0;
            draw_rectangle(hue.x + i as f32 * hw, hue.y, hw + 0.5, hue.h, Hsv::new(h, 1.0, 1.0).to_color());
        }
        let hx = hue.x + self.hsv.h / 360.0 * hue.w;
        draw_rectangle_lines(hx - 2.0, hue.y - 2.0, 4.0, hue.h + 4.0, 2.0, WHITE);

        let swatch = layout.swatch;
        let chip = Rect::new(swatch.x, swatch.y, swatch.h * 1.6, swatch.h);
        match color.to_rgb() {
            Some((r, g, b)) => draw_rectangle(chip.x, chip.y, chip.w, chip.h, Color::from_rgba(r, g, b, 255)),
            None => {
                draw_line(chip.x, chip.bottom(), chip.right(), chip.y, 1.0, theme::TEXT_DIM);
            }
        }
        draw_rectangle_lines(chip.x, chip.y, chip.w, chip.h, 1.0, theme::BORDER_COLOR);
        draw_text(
            color.as_str(),
            chip.right() + 8.0,
            swatch.y + swatch.h * 0.5 + 5.0,
            theme::FONT_SIZE_CONTENT,
            theme::TEXT_COLOR,
        );

        if !enabled {
            for rect in [square, hue] {
                draw_rectangle(rect.x, rect.y, rect.w, rect.h, theme::DISABLED_OVERLAY);
            }
        } else if ctx.hot.is_some() || ctx.dragging.is_some() {
            draw_rectangle_lines(square.x, square.y, square.w, square.h, 1.0, theme::ACCENT_COLOR);
        }
    }
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new()
    }
}
