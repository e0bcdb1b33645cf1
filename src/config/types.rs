use serde::{Deserialize, Serialize};

use crate::cli::CompressionLevel;
use crate::geometry::{Grid, Padding, Size};
use crate::zone::PALETTE_SIZE;

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

impl CompressConfig {
    pub fn level(&self) -> CompressionLevel {
        match self {
            CompressConfig::Level(n) => CompressionLevel::Level((*n).min(6)),
            CompressConfig::Max(_) => CompressionLevel::Max,
        }
    }
}

/// Grid given to zones created with "add zone"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ZoneDefaults {
    pub frame_width: u32,
    pub frame_height: u32,
    pub rows: u32,
    pub cols: u32,
    pub padding_x: u32,
    pub padding_y: u32,
}

impl Default for ZoneDefaults {
    fn default() -> Self {
        Self {
            frame_width: 16,
            frame_height: 16,
            rows: 1,
            cols: 1,
            padding_x: 0,
            padding_y: 0,
        }
    }
}

impl ZoneDefaults {
    /// Grid at the image origin with these defaults, clamped to valid values
    pub fn grid(&self) -> Grid {
        Grid {
            frame_size: Size::new(self.frame_width.max(1), self.frame_height.max(1)),
            rows: self.rows.max(1),
            cols: self.cols.max(1),
            padding: Padding::new(self.padding_x, self.padding_y),
            ..Grid::default()
        }
    }
}

/// Splitsheet configuration file structure.
///
/// Holds export settings only; zones are never stored here.
/// `output_dir` is relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SheetConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Sheet name: archive stem and frame file prefix
    pub name: String,
    /// Directory the archive is written to
    pub output_dir: String,
    /// Background color to key out (#RRGGBB), optional
    pub background: Option<String>,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Number of hues in the zone palette
    pub palette_size: usize,
    /// Grid for newly added zones
    pub zone_defaults: ZoneDefaults,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            version: 1,
            name: "sheet".to_string(),
            output_dir: ".".to_string(),
            background: None,
            compress: None,
            palette_size: PALETTE_SIZE,
            zone_defaults: ZoneDefaults::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SheetConfig =
            serde_json::from_str(r##"{"name": "hero", "background": "#ff00ff"}"##).unwrap();

        assert_eq!(config.name, "hero");
        assert_eq!(config.background.as_deref(), Some("#ff00ff"));
        assert_eq!(config.output_dir, ".");
        assert_eq!(config.palette_size, 32);
        assert_eq!(config.zone_defaults.grid(), Grid::default());
    }

    #[test]
    fn test_compress_config_untagged() {
        let level: SheetConfig = serde_json::from_str(r#"{"compress": 3}"#).unwrap();
        let max: SheetConfig = serde_json::from_str(r#"{"compress": "max"}"#).unwrap();

        assert_eq!(
            level.compress.map(|c| c.level()),
            Some(CompressionLevel::Level(3))
        );
        assert_eq!(max.compress.map(|c| c.level()), Some(CompressionLevel::Max));
    }

    #[test]
    fn test_zone_defaults_clamped() {
        let defaults = ZoneDefaults {
            frame_width: 0,
            rows: 0,
            ..ZoneDefaults::default()
        };
        let grid = defaults.grid();

        assert_eq!(grid.frame_size, Size::new(1, 16));
        assert_eq!(grid.rows, 1);
    }
}
