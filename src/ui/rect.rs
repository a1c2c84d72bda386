//! Rectangle type for UI layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create from screen dimensions
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Check if point is inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// A `w` x `h` box in the top-right corner, `margin` in from both edges.
    /// Shrinks to fit when the container is too small.
    pub fn anchor_top_right(&self, w: f32, h: f32, margin: f32) -> Self {
        let w = w.min((self.w - margin * 2.0).max(0.0));
        let h = h.min((self.h - margin * 2.0).max(0.0));
        Self::new(self.right() - margin - w, self.y + margin, w, h)
    }

    /// Get a horizontal slice (for headers, strips)
    pub fn slice_top(&self, height: f32) -> Self {
        Self::new(self.x, self.y, self.w, height.clamp(0.0, self.h))
    }

    /// Get remaining area after slicing top
    pub fn remaining_after_top(&self, height: f32) -> Self {
        let h = height.clamp(0.0, self.h);
        Self::new(self.x, self.y + h, self.w, self.h - h)
    }

    /// Position of a point inside the rect as 0-1 fractions, clamped
    pub fn fraction_of(&self, x: f32, y: f32) -> (f32, f32) {
        let fx = if self.w > 0.0 { (x - self.x) / self.w } else { 0.0 };
        let fy = if self.h > 0.0 { (y - self.y) / self.h } else { 0.0 };
        (fx.clamp(0.0, 1.0), fy.clamp(0.0, 1.0))
    }
}
