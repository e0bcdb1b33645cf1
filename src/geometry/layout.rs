use serde::{Deserialize, Serialize};

use super::{Padding, Point, Rect, Size};

/// Grid parameters shared by every frame of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Top-left of the zone's bounding rectangle
    pub origin: Point,
    /// Nominal size of each frame
    pub frame_size: Size,
    /// Number of frame rows (at least 1)
    pub rows: u32,
    /// Number of frame columns (at least 1)
    pub cols: u32,
    /// Gap inserted between adjacent frames
    pub padding: Padding,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            frame_size: Size::default(),
            rows: 1,
            cols: 1,
            padding: Padding::default(),
        }
    }
}

impl Grid {
    /// Number of frames the grid generates
    pub fn frame_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Width and height of the zone's bounding rectangle:
    /// `cols*w + (cols-1)*px` by `rows*h + (rows-1)*py`
    pub fn bounding_size(&self) -> Size {
        let cols = self.cols.max(1);
        let rows = self.rows.max(1);
        Size::new(
            cols.saturating_mul(self.frame_size.width)
                .saturating_add((cols - 1).saturating_mul(self.padding.x)),
            rows.saturating_mul(self.frame_size.height)
                .saturating_add((rows - 1).saturating_mul(self.padding.y)),
        )
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_parts(self.origin, self.bounding_size())
    }

    /// Default grid position of the frame at `index` (row-major).
    /// Positions past the `i32` range saturate at its edge.
    pub fn frame_position(&self, index: usize) -> Point {
        let cols = self.cols.max(1) as usize;
        let col = i64::try_from(index % cols).unwrap_or(i64::MAX);
        let row = i64::try_from(index / cols).unwrap_or(i64::MAX);
        let step_x = i64::from(self.frame_size.width) + i64::from(self.padding.x);
        let step_y = i64::from(self.frame_size.height) + i64::from(self.padding.y);
        self.origin
            .offset(col.saturating_mul(step_x), row.saturating_mul(step_y))
    }
}

/// Compute the frame rectangles for a grid in raster-scan order.
///
/// Frame `r * cols + c` sits at `origin + (c * (w + px), r * (h + py))` and
/// has the grid's nominal frame size.
pub fn generate_frames(grid: &Grid) -> Vec<Rect> {
    (0..grid.frame_count())
        .map(|index| Rect::from_parts(grid.frame_position(index), grid.frame_size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: u32, cols: u32) -> Grid {
        Grid {
            origin: Point::new(5, 7),
            frame_size: Size::new(16, 8),
            rows,
            cols,
            padding: Padding::new(2, 3),
        }
    }

    #[test]
    fn test_frame_count_matches_grid() {
        assert_eq!(generate_frames(&grid(1, 1)).len(), 1);
        assert_eq!(generate_frames(&grid(3, 4)).len(), 12);
    }

    #[test]
    fn test_raster_order_positions() {
        let g = grid(3, 4);
        let frames = generate_frames(&g);

        for (i, rect) in frames.iter().enumerate() {
            let col = (i % 4) as i32;
            let row = (i / 4) as i32;
            assert_eq!(rect.x, 5 + col * (16 + 2));
            assert_eq!(rect.y, 7 + row * (8 + 3));
            assert_eq!((rect.width, rect.height), (16, 8));
        }

        // Second row starts back at the origin column
        assert_eq!((frames[4].x, frames[4].y), (5, 18));
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let g = grid(2, 5);
        assert_eq!(generate_frames(&g), generate_frames(&g));
    }

    #[test]
    fn test_bounding_size() {
        // 4*16 + 3*2 by 3*8 + 2*3
        assert_eq!(grid(3, 4).bounding_size(), Size::new(70, 30));
        // A single frame has no padding contribution
        assert_eq!(grid(1, 1).bounding_size(), Size::new(16, 8));
    }

    #[test]
    fn test_positions_past_i32_saturate() {
        let g = Grid {
            origin: Point::new(i32::MAX, 0),
            rows: 1,
            cols: 2,
            ..Grid::default()
        };
        let frames = generate_frames(&g);
        assert_eq!(frames[1].x, i32::MAX);
        assert_eq!(frames[1].clip_to(100, 100), None);
    }

    #[test]
    fn test_default_grid() {
        let g = Grid::default();
        assert_eq!(g.frame_size, Size::new(16, 16));
        assert_eq!((g.rows, g.cols), (1, 1));
        assert_eq!(g.padding, Padding::new(0, 0));
        assert_eq!(generate_frames(&g), vec![Rect::new(0, 0, 16, 16)]);
    }
}
