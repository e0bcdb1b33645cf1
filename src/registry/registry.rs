use image::Rgb;
use log::{debug, info};

use super::Clipboard;
use crate::error::SplitError;
use crate::geometry::{Grid, Point};
use crate::zone::{Hsla, PALETTE_SIZE, Zone, ZoneId, ZoneParams, make_palette};

/// Ordered zones of one editing session.
///
/// Insertion order is display order and export order.
#[derive(Debug)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
    palette: Vec<Hsla>,
    colors_assigned: usize,
    next_id: u64,
    clipboard: Option<Clipboard>,
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::with_palette_size(PALETTE_SIZE)
    }
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palette_size(size: usize) -> Self {
        Self {
            zones: Vec::new(),
            palette: make_palette(size.max(1)),
            colors_assigned: 0,
            next_id: 1,
            clipboard: None,
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Zone, SplitError> {
        let len = self.zones.len();
        self.zones
            .get(index)
            .ok_or(SplitError::ZoneOutOfRange { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Zone, SplitError> {
        let len = self.zones.len();
        self.zones
            .get_mut(index)
            .ok_or(SplitError::ZoneOutOfRange { index, len })
    }

    /// Position of the zone with `id`
    pub fn position(&self, id: ZoneId) -> Option<usize> {
        self.zones.iter().position(|z| z.id() == id)
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    fn allocate_id(&mut self) -> ZoneId {
        let id = ZoneId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Next palette color, cycling once every hue has been handed out
    fn next_color(&mut self) -> Rgb<u8> {
        let color = self.palette[self.colors_assigned % self.palette.len()].to_rgb();
        self.colors_assigned += 1;
        color
    }

    /// Append a zone with the given grid and the next palette color.
    /// Returns its index.
    pub fn add(&mut self, name: &str, grid: Grid) -> Result<usize, SplitError> {
        if name.trim().is_empty() {
            return Err(SplitError::EmptyZoneName);
        }

        let id = self.allocate_id();
        let color = self.next_color();
        self.zones.push(Zone::new(id, name, grid, color));
        info!("Added zone '{}' ({} zones)", name, self.zones.len());
        Ok(self.zones.len() - 1)
    }

    /// Remove the zone at `index` together with all of its frames
    pub fn remove(&mut self, index: usize) -> Result<Zone, SplitError> {
        if index >= self.zones.len() {
            return Err(SplitError::ZoneOutOfRange {
                index,
                len: self.zones.len(),
            });
        }
        let zone = self.zones.remove(index);
        info!("Deleted zone '{}'", zone.name);
        Ok(zone)
    }

    /// Snapshot the zone at `index` into the clipboard, replacing any previous copy
    pub fn copy(&mut self, index: usize) -> Result<&Clipboard, SplitError> {
        let snapshot = Clipboard::capture(self.get(index)?);
        debug!(
            "Copied zone '{}' with {} frame offsets",
            snapshot.name,
            snapshot.frame_offsets.len()
        );
        Ok(self.clipboard.insert(snapshot))
    }

    /// Create a zone from the clipboard.
    ///
    /// The nth paste of a snapshot lands at the copied origin plus
    /// `n * PASTE_OFFSET` on both axes. Frames are regenerated and then moved
    /// to their copied offsets from the new origin. Returns the new index.
    pub fn paste(&mut self) -> Result<usize, SplitError> {
        let clipboard = self.clipboard.as_mut().ok_or(SplitError::NothingCopied)?;
        let origin = clipboard.next_origin();
        let name = clipboard.name.clone();
        let grid = Grid {
            origin,
            ..clipboard.grid
        };
        let color = clipboard.color;
        let offsets = clipboard.frame_offsets.clone();

        let id = self.allocate_id();
        let mut zone = Zone::new(id, name, grid, color);
        for (frame, (dx, dy)) in offsets.into_iter().enumerate() {
            if frame >= zone.frames().len() {
                break;
            }
            zone.move_frame(frame, origin.offset(dx, dy))?;
        }

        info!(
            "Pasted zone '{}' at ({}, {})",
            zone.name, origin.x, origin.y
        );
        self.zones.push(zone);
        Ok(self.zones.len() - 1)
    }

    /// Overwrite all parameters of the zone at `index` and regenerate its frames
    pub fn apply(&mut self, index: usize, params: ZoneParams) -> Result<(), SplitError> {
        self.get_mut(index)?.apply(params);
        Ok(())
    }

    /// Move the origin of the zone at `index`, regenerating its frames
    pub fn set_origin(&mut self, index: usize, origin: Point) -> Result<(), SplitError> {
        self.get_mut(index)?.set_origin(origin);
        Ok(())
    }

    pub fn recolor(&mut self, index: usize, color: Rgb<u8>) -> Result<(), SplitError> {
        self.get_mut(index)?.recolor(color);
        Ok(())
    }
}
