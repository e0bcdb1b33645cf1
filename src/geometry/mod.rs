mod layout;
mod rect;

pub use layout::{Grid, generate_frames};
pub use rect::{Padding, Point, Rect, Size};
