use image::Rgba;

use crate::geometry::{Point, Rect, Size};

/// One cell of a zone's grid.
///
/// Position and size start at the grid default but can be moved and resized
/// independently afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Raster-scan index within the zone (row-major, 0-based)
    pub index: usize,
    /// Top-left corner in source-image space
    pub position: Point,
    /// Current size, always at least 1x1
    pub size: Size,
    /// Canvas fill, the zone color at `FRAME_FILL_ALPHA`
    pub fill: Rgba<u8>,
}

impl Frame {
    pub fn new(index: usize, rect: Rect, fill: Rgba<u8>) -> Self {
        Self {
            index,
            position: Point::new(rect.x, rect.y),
            size: Size::clamped(i64::from(rect.width), i64::from(rect.height)),
            fill,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Move to an exact integer coordinate. Siblings and the zone are untouched.
    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }
}

/// An in-progress drag of a frame's bottom-right resize handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGesture {
    /// Position of the frame within its zone's frame list
    pub frame: usize,
    start_size: Size,
    start_pointer: (f64, f64),
}

impl ResizeGesture {
    pub(crate) fn new(frame: usize, start_size: Size, start_pointer: (f64, f64)) -> Self {
        Self {
            frame,
            start_size,
            start_pointer,
        }
    }

    /// Provisional size for the pointer at `(x, y)`: the start size grown by
    /// the pointer delta, truncated toward zero and clamped to 1x1.
    #[allow(clippy::cast_possible_truncation)]
    pub fn size_at(&self, x: f64, y: f64) -> Size {
        let width = (f64::from(self.start_size.width) + (x - self.start_pointer.0)).trunc();
        let height = (f64::from(self.start_size.height) + (y - self.start_pointer.1)).trunc();
        Size::clamped(width as i64, height as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(3, Rect::new(10, 20, 16, 16), Rgba([255, 0, 0, 110]))
    }

    #[test]
    fn test_move_to_keeps_size() {
        let mut f = frame();
        f.move_to(Point::new(-3, 4));
        assert_eq!(f.position, Point::new(-3, 4));
        assert_eq!(f.rect(), Rect::new(-3, 4, 16, 16));
    }

    #[test]
    fn test_gesture_tracks_pointer_delta() {
        let gesture = ResizeGesture::new(0, Size::new(16, 16), (26.0, 36.0));
        assert_eq!(gesture.size_at(30.9, 34.0), Size::new(20, 14));
    }

    #[test]
    fn test_gesture_clamps_to_one_pixel() {
        let gesture = ResizeGesture::new(0, Size::new(16, 16), (26.0, 36.0));
        assert_eq!(gesture.size_at(-100.0, 0.0), Size::new(1, 1));
    }
}
