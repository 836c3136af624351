use serde::{Deserialize, Serialize};

/// PDF user space is 72 points per inch; templates are authored in millimetres.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn to_pt(self) -> Self {
        Self::new(mm_to_pt(self.width), mm_to_pt(self.height))
    }

    pub fn to_mm(self) -> Self {
        Self::new(pt_to_mm(self.width), pt_to_mm(self.height))
    }
}

/// Page dimensions, in millimetres unless stated otherwise.
pub type PageSize = Size;

pub const A4: PageSize = Size::new(210.0, 297.0);

/// An axis-aligned box with a top-left origin (y grows downwards).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn to_pt(self) -> Self {
        Self::new(
            mm_to_pt(self.x),
            mm_to_pt(self.y),
            mm_to_pt(self.width),
            mm_to_pt(self.height),
        )
    }

    /// Shrinks the box by `[top, right, bottom, left]` insets.
    pub fn inset(&self, padding: [f32; 4]) -> Self {
        let [top, right, bottom, left] = padding;
        Self::new(
            self.x + left,
            self.y + top,
            (self.width - left - right).max(0.0),
            (self.height - top - bottom).max(0.0),
        )
    }

    /// Forces the rectangle inside `bounds`, which is anchored at the origin.
    ///
    /// Non-finite values become zero, negative sizes collapse to zero and the
    /// far edges are cut at the page edge. Returns the corrected rectangle and
    /// whether anything had to change.
    pub fn clamp_to(&self, bounds: Size) -> (Rect, bool) {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };

        let x = finite(self.x).clamp(0.0, bounds.width);
        let y = finite(self.y).clamp(0.0, bounds.height);
        let width = finite(self.width).max(0.0).min(bounds.width - x);
        let height = finite(self.height).max(0.0).min(bounds.height - y);

        let clamped = Rect::new(x, y, width, height);
        const EPSILON: f32 = 0.001;
        let changed = (clamped.x - self.x).abs() > EPSILON
            || (clamped.y - self.y).abs() > EPSILON
            || (clamped.width - self.width).abs() > EPSILON
            || (clamped.height - self.height).abs() > EPSILON
            || !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite();
        (clamped, changed)
    }
}
