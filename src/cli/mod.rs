mod args;

pub use args::{
    CliArgs, Command, CompressionLevel, ExportArgs, LayoutArgs, PaletteArgs, ZoneSpec,
};
