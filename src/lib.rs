pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod registry;
pub mod session;
pub mod source;
pub mod zone;

pub use cli::{CliArgs, Command, CompressionLevel, ZoneSpec};
pub use error::{Severity, SplitError};
pub use export::{ExportOptions, export_zip};
pub use geometry::{Grid, Padding, Point, Rect, Size, generate_frames};
pub use registry::ZoneRegistry;
pub use session::{Notice, PointPick, Session};
pub use zone::{Frame, Zone, ZoneId, ZoneParams, make_palette};
