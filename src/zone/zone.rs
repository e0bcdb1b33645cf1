use std::fmt;

use image::{Rgb, Rgba};
use log::debug;

use super::color::{FRAME_FILL_ALPHA, MARKER_ALPHA, ZONE_TINT_ALPHA, label_color, with_alpha};
use super::frame::{Frame, ResizeGesture};
use crate::error::SplitError;
use crate::geometry::{Grid, Point, Rect, Size, generate_frames};

/// Stable identity of a zone within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub u64);

/// Full editable parameter set of a zone (the property form)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneParams {
    pub name: String,
    pub grid: Grid,
}

/// Receives committed frame-size changes of a zone.
///
/// Called synchronously after the zone has been updated.
pub trait FrameSizeObserver {
    fn frame_size_changed(&mut self, size: Size, zone: &Zone);
}

impl<F> FrameSizeObserver for F
where
    F: FnMut(Size, &Zone),
{
    fn frame_size_changed(&mut self, size: Size, zone: &Zone) {
        self(size, zone)
    }
}

/// A named region of the source image subdivided into a grid of frames
pub struct Zone {
    id: ZoneId,
    /// User label, not required to be unique
    pub name: String,
    grid: Grid,
    color: Rgb<u8>,
    frames: Vec<Frame>,
    observer: Option<Box<dyn FrameSizeObserver>>,
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("grid", &self.grid)
            .field("color", &self.color)
            .field("frames", &self.frames.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Zone {
    /// Create a zone and generate its frames at their grid positions
    pub fn new(id: ZoneId, name: impl Into<String>, grid: Grid, color: Rgb<u8>) -> Self {
        let mut zone = Self {
            id,
            name: name.into(),
            grid,
            color,
            frames: Vec::new(),
            observer: None,
        };
        zone.regenerate_frames();
        zone
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn origin(&self) -> Point {
        self.grid.origin
    }

    pub fn frame_size(&self) -> Size {
        self.grid.frame_size
    }

    pub fn color(&self) -> Rgb<u8> {
        self.color
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Bounding rectangle, derived from origin and grid parameters
    pub fn bounding_rect(&self) -> Rect {
        self.grid.bounding_rect()
    }

    /// Translucent tint drawn over the bounding rectangle
    pub fn tint(&self) -> Rgba<u8> {
        with_alpha(self.color, ZONE_TINT_ALPHA)
    }

    /// Color of the small marker drawn at the origin
    pub fn marker_color(&self) -> Rgba<u8> {
        with_alpha(self.color, MARKER_ALPHA)
    }

    pub fn label_color(&self) -> Rgb<u8> {
        label_color(self.color)
    }

    /// Current parameters, as shown in the property form
    pub fn params(&self) -> ZoneParams {
        ZoneParams {
            name: self.name.clone(),
            grid: self.grid,
        }
    }

    /// Frames ordered by raster index, regardless of list order
    pub fn frames_by_index(&self) -> Vec<&Frame> {
        let mut frames: Vec<&Frame> = self.frames.iter().collect();
        frames.sort_by_key(|f| f.index);
        frames
    }

    /// Register the single observer slot, replacing any previous observer
    pub fn set_observer(&mut self, observer: impl FrameSizeObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Discard every frame and rebuild the grid from scratch.
    ///
    /// Any manual repositioning or per-frame resizing is lost.
    pub fn regenerate_frames(&mut self) {
        let fill = with_alpha(self.color, FRAME_FILL_ALPHA);
        self.frames = generate_frames(&self.grid)
            .into_iter()
            .enumerate()
            .map(|(index, rect)| Frame::new(index, rect, fill))
            .collect();
        debug!(
            "Zone '{}': generated {} frames at ({}, {})",
            self.name,
            self.frames.len(),
            self.grid.origin.x,
            self.grid.origin.y
        );
    }

    /// Move the origin and regenerate all frames
    pub fn set_origin(&mut self, origin: Point) {
        self.grid.origin = origin;
        self.regenerate_frames();
    }

    /// Overwrite every parameter and regenerate all frames
    pub fn apply(&mut self, params: ZoneParams) {
        self.name = params.name;
        self.grid = Grid {
            rows: params.grid.rows.max(1),
            cols: params.grid.cols.max(1),
            frame_size: Size::clamped(
                i64::from(params.grid.frame_size.width),
                i64::from(params.grid.frame_size.height),
            ),
            ..params.grid
        };
        self.regenerate_frames();
    }

    fn frame_mut(&mut self, frame: usize) -> Result<&mut Frame, SplitError> {
        let name = &self.name;
        self.frames
            .get_mut(frame)
            .ok_or_else(|| SplitError::FrameOutOfRange {
                zone: name.clone(),
                index: frame,
            })
    }

    /// Move one frame without affecting its siblings or the grid
    pub fn move_frame(&mut self, frame: usize, position: Point) -> Result<(), SplitError> {
        self.frame_mut(frame)?.move_to(position);
        Ok(())
    }

    /// Start dragging the resize handle of `frame` with the pointer at `pointer`
    pub fn begin_resize(
        &self,
        frame: usize,
        pointer: (f64, f64),
    ) -> Result<ResizeGesture, SplitError> {
        let current = self
            .frames
            .get(frame)
            .ok_or_else(|| SplitError::FrameOutOfRange {
                zone: self.name.clone(),
                index: frame,
            })?;
        Ok(ResizeGesture::new(frame, current.size, pointer))
    }

    /// Provisionally resize the dragged frame only
    pub fn track_resize(
        &mut self,
        gesture: &ResizeGesture,
        pointer: (f64, f64),
    ) -> Result<Size, SplitError> {
        let size = gesture.size_at(pointer.0, pointer.1);
        self.frame_mut(gesture.frame)?.size = size;
        Ok(size)
    }

    /// Commit the gesture: the dragged frame's size becomes the zone's frame size
    pub fn finish_resize(&mut self, gesture: ResizeGesture) -> Result<Size, SplitError> {
        let size = self.frame_mut(gesture.frame)?.size;
        self.update_frame_size(size);
        Ok(size)
    }

    /// Set the zone-wide frame size and resize every frame in place.
    ///
    /// Frame positions are left untouched. The observer is notified after the
    /// change is applied.
    pub fn update_frame_size(&mut self, size: Size) {
        let size = Size::clamped(i64::from(size.width), i64::from(size.height));
        let fill = with_alpha(self.color, FRAME_FILL_ALPHA);

        self.grid.frame_size = size;
        for frame in &mut self.frames {
            frame.size = size;
            frame.fill = fill;
        }

        let mut observer = self.observer.take();
        if let Some(observer) = observer.as_mut() {
            observer.frame_size_changed(size, self);
        }
        // The callback only sees `&Zone`, so the slot cannot have changed
        self.observer = observer;
    }

    /// Change the zone color and propagate it to every frame fill.
    /// Geometry is untouched.
    pub fn recolor(&mut self, color: Rgb<u8>) {
        self.color = color;
        let fill = with_alpha(color, FRAME_FILL_ALPHA);
        for frame in &mut self.frames {
            frame.fill = fill;
        }
    }
}
