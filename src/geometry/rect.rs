use serde::{Deserialize, Serialize};

/// An integer point in source-image space (origin top-left, unbounded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Snap a continuous point to the nearest integer coordinate
    #[allow(clippy::cast_possible_truncation)]
    pub fn snapped(x: f64, y: f64) -> Self {
        Self {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }

    /// Build a point from wide coordinates, saturating at the `i32` range
    fn saturating(x: i64, y: i64) -> Self {
        Self {
            x: saturate(x),
            y: saturate(y),
        }
    }

    /// Translate by a signed offset, saturating at the `i32` range
    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self::saturating(
            i64::from(self.x).saturating_add(dx),
            i64::from(self.y).saturating_add(dy),
        )
    }

    /// Offset of this point relative to `origin`
    pub fn relative_to(self, origin: Point) -> (i64, i64) {
        (
            i64::from(self.x) - i64::from(origin.x),
            i64::from(self.y) - i64::from(origin.y),
        )
    }
}

#[allow(clippy::cast_possible_truncation)]
fn saturate(value: i64) -> i32 {
    // In range after the clamp
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// A width/height pair, never smaller than 1x1 when built through `clamped`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Build a size from signed values, clamping each axis to at least 1
    #[allow(clippy::cast_sign_loss)]
    pub fn clamped(width: i64, height: i64) -> Self {
        Self {
            width: width.clamp(1, i64::from(u32::MAX)) as u32,
            height: height.clamp(1, i64::from(u32::MAX)) as u32,
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(16, 16)
    }
}

/// Gap between adjacent frames along each grid axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub x: u32,
    pub y: u32,
}

impl Padding {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with a signed top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Clip this rectangle against a `bounds_width` x `bounds_height` image
    /// anchored at (0, 0).
    ///
    /// The top-left corner is clamped into `[0, bounds]` and the extent into
    /// the space left after it, so the result may be empty. Returns `None`
    /// when either clipped dimension is zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clip_to(&self, bounds_width: u32, bounds_height: u32) -> Option<Rect> {
        let bw = i64::from(bounds_width);
        let bh = i64::from(bounds_height);

        let sx = i64::from(self.x).clamp(0, bw);
        let sy = i64::from(self.y).clamp(0, bh);
        let sw = i64::from(self.width).clamp(0, bw - sx);
        let sh = i64::from(self.height).clamp(0, bh - sy);

        if sw <= 0 || sh <= 0 {
            return None;
        }

        // All four values are within [0, u32::MAX] after clamping
        Some(Rect::new(sx as i32, sy as i32, sw as u32, sh as u32))
    }
}
