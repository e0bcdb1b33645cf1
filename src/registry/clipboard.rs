use image::Rgb;

use crate::geometry::{Grid, Point};
use crate::zone::Zone;

/// Distance each successive paste moves away from the copied zone's origin
pub const PASTE_OFFSET: i64 = 10;

/// Snapshot of one zone, taken by "copy"
#[derive(Debug, Clone, PartialEq)]
pub struct Clipboard {
    /// Name for pasted zones (source name with `_copy` appended)
    pub name: String,
    /// Grid parameters at copy time; `origin` is the source zone's origin
    pub grid: Grid,
    pub color: Rgb<u8>,
    /// Each frame's offset from the source origin, in frame list order
    pub frame_offsets: Vec<(i64, i64)>,
    pastes: u32,
}

impl Clipboard {
    pub fn capture(zone: &Zone) -> Self {
        let origin = zone.origin();
        Self {
            name: format!("{}_copy", zone.name),
            grid: *zone.grid(),
            color: zone.color(),
            frame_offsets: zone
                .frames()
                .iter()
                .map(|f| f.position.relative_to(origin))
                .collect(),
            pastes: 0,
        }
    }

    /// Origin for the next paste: the copied origin shifted by
    /// `PASTE_OFFSET` once per paste made so far, plus one.
    pub(crate) fn next_origin(&mut self) -> Point {
        self.pastes += 1;
        let shift = i64::from(self.pastes).saturating_mul(PASTE_OFFSET);
        self.grid.origin.offset(shift, shift)
    }

    /// Number of times this snapshot has been pasted
    pub fn pastes(&self) -> u32 {
        self.pastes
    }
}
