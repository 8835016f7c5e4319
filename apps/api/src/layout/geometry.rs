use serde::{Deserialize, Serialize};

/// An axis-aligned box in page points, y growing downwards (PDF page space as
/// the template coordinate tables use it).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    /// A box of the given size anchored at the origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Rect::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// True when the box has no usable area (zero, negative, or NaN extent).
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}
