use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::geometry::{Grid, Padding, Point, Size};
use crate::zone::ZoneParams;

#[derive(Parser, Debug)]
#[command(name = "splitsheet")]
#[command(version, about = "Spritesheet zone splitter", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Crop every zone frame out of a sheet and write them to a zip
    Export(ExportArgs),
    /// Print the frame rectangles of the given zones as JSON
    Layout(LayoutArgs),
    /// Print the zone color palette as hex colors
    Palette(PaletteArgs),
    /// Write a default config file
    Init {
        /// Path of the config file to create
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Spritesheet image (png, bmp, jpg, gif, webp)
    pub image: PathBuf,

    /// Zone to export, as NAME@X,Y:WxH[:ROWSxCOLS[:PXxPY]] (repeatable)
    #[arg(short, long = "zone", value_name = "SPEC", required = true)]
    pub zones: Vec<ZoneSpec>,

    /// Load settings from a .splitsheet config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the archive is written to [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sheet name: archive stem and prefix of every frame file
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Background color to make transparent (#RRGGBB or RRGGBB)
    #[arg(short, long, value_name = "HEX")]
    pub background: Option<String>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Zone to describe, as NAME@X,Y:WxH[:ROWSxCOLS[:PXxPY]] (repeatable)
    #[arg(short, long = "zone", value_name = "SPEC", required = true)]
    pub zones: Vec<ZoneSpec>,

    /// Include archive member names for this sheet name
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PaletteArgs {
    /// Number of colors [default: 32]
    pub count: Option<usize>,
}

/// A zone given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSpec(pub ZoneParams);

impl ZoneSpec {
    pub fn into_params(self) -> ZoneParams {
        self.0
    }
}

fn parse_pair<T: std::str::FromStr>(s: &str, sep: char, what: &str) -> Result<(T, T), String> {
    let (a, b) = s
        .split_once(sep)
        .ok_or_else(|| format!("expected {} as A{}B, got '{}'", what, sep, s))?;
    let a = a
        .trim()
        .parse()
        .map_err(|_e| format!("invalid {} '{}'", what, s))?;
    let b = b
        .trim()
        .parse()
        .map_err(|_e| format!("invalid {} '{}'", what, s))?;
    Ok((a, b))
}

impl std::str::FromStr for ZoneSpec {
    type Err = String;

    /// Parse `NAME@X,Y:WxH[:ROWSxCOLS[:PXxPY]]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .rsplit_once('@')
            .ok_or_else(|| format!("missing '@' in zone '{}'", s))?;
        if name.trim().is_empty() {
            return Err(format!("zone '{}' has an empty name", s));
        }

        let mut parts = rest.split(':');
        let (x, y): (i32, i32) = parse_pair(parts.next().unwrap_or_default(), ',', "origin")?;
        let (w, h): (u32, u32) = parts
            .next()
            .ok_or_else(|| format!("zone '{}' is missing a frame size", s))
            .and_then(|p| parse_pair(p, 'x', "frame size"))?;
        let (rows, cols): (u32, u32) = match parts.next() {
            Some(p) => parse_pair(p, 'x', "grid")?,
            None => (1, 1),
        };
        let (px, py): (u32, u32) = match parts.next() {
            Some(p) => parse_pair(p, 'x', "padding")?,
            None => (0, 0),
        };
        if parts.next().is_some() {
            return Err(format!("too many fields in zone '{}'", s));
        }

        if w == 0 || h == 0 {
            return Err(format!("frame size must be at least 1x1 in zone '{}'", s));
        }
        if rows == 0 || cols == 0 {
            return Err(format!("rows and columns must be at least 1 in zone '{}'", s));
        }

        Ok(ZoneSpec(ZoneParams {
            name: name.to_string(),
            grid: Grid {
                origin: Point::new(x, y),
                frame_size: Size::new(w, h),
                rows,
                cols,
                padding: Padding::new(px, py),
            },
        }))
    }
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_spec_full() {
        let spec: ZoneSpec = "run@-4,8:16x24:2x3:1x2".parse().unwrap();
        let params = spec.into_params();

        assert_eq!(params.name, "run");
        assert_eq!(params.grid.origin, Point::new(-4, 8));
        assert_eq!(params.grid.frame_size, Size::new(16, 24));
        assert_eq!((params.grid.rows, params.grid.cols), (2, 3));
        assert_eq!(params.grid.padding, Padding::new(1, 2));
    }

    #[test]
    fn test_zone_spec_defaults() {
        let spec: ZoneSpec = "idle@0,0:32x32".parse().unwrap();
        let grid = spec.0.grid;

        assert_eq!((grid.rows, grid.cols), (1, 1));
        assert_eq!(grid.padding, Padding::new(0, 0));
    }

    #[test]
    fn test_zone_spec_name_may_contain_at() {
        let spec: ZoneSpec = "me@home@1,2:3x4".parse().unwrap();
        assert_eq!(spec.0.name, "me@home");
    }

    #[test]
    fn test_zone_spec_errors() {
        assert!("run".parse::<ZoneSpec>().is_err());
        assert!("@0,0:16x16".parse::<ZoneSpec>().is_err());
        assert!("run@0,0".parse::<ZoneSpec>().is_err());
        assert!("run@0:16x16".parse::<ZoneSpec>().is_err());
        assert!("run@0,0:0x16".parse::<ZoneSpec>().is_err());
        assert!("run@0,0:16x16:0x1".parse::<ZoneSpec>().is_err());
        assert!("run@0,0:16x16:1x1:0x0:extra".parse::<ZoneSpec>().is_err());
    }

    #[test]
    fn test_compression_level() {
        assert_eq!("max".parse(), Ok(CompressionLevel::Max));
        assert_eq!("4".parse(), Ok(CompressionLevel::Level(4)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_cli_parses_export() {
        let cli = CliArgs::try_parse_from([
            "splitsheet",
            "export",
            "sheet.png",
            "--zone",
            "run@0,0:16x16:1x4",
            "-z",
            "idle@0,16:16x16",
            "-n",
            "hero",
            "--compress",
        ])
        .unwrap();

        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.zones.len(), 2);
        assert_eq!(args.name.as_deref(), Some("hero"));
        assert_eq!(args.compress, Some(CompressionLevel::Level(2)));
    }
}
