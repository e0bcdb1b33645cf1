mod color;
mod frame;
mod zone;

pub use color::{
    FRAME_FILL_ALPHA, Hsla, MARKER_ALPHA, PALETTE_SIZE, ZONE_TINT_ALPHA, label_color, luminance,
    make_palette, parse_hex_color, to_hex, with_alpha,
};
pub use frame::{Frame, ResizeGesture};
pub use zone::{FrameSizeObserver, Zone, ZoneId, ZoneParams};
