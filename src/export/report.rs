use serde::Serialize;

use super::frame_entry_name;
use crate::zone::{Zone, to_hex};

#[derive(Serialize)]
struct LayoutOutput {
    meta: Meta,
    zones: Vec<JsonZone>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonZone {
    name: String,
    color: String,
    label_color: String,
    rows: u32,
    cols: u32,
    padding: Xy,
    frame_size: Size,
    bounds: Rect,
    frames: Vec<JsonFrame>,
}

#[derive(Serialize)]
struct JsonFrame {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    frame: Rect,
}

#[derive(Serialize)]
struct Xy {
    x: u32,
    y: u32,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct Rect {
    x: i32,
    y: i32,
    w: u32,
    h: u32,
}

impl From<crate::geometry::Rect> for Rect {
    fn from(r: crate::geometry::Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            w: r.width,
            h: r.height,
        }
    }
}

/// Describe every zone and its frame rectangles as JSON.
///
/// When `sheet_name` is given each frame also carries the archive member name
/// it would be exported under.
pub fn layout_json(
    zones: &[Zone],
    sheet_name: Option<&str>,
    pretty: bool,
) -> serde_json::Result<String> {
    let output = LayoutOutput {
        meta: Meta {
            app: "splitsheet",
            version: env!("CARGO_PKG_VERSION"),
        },
        zones: zones
            .iter()
            .map(|zone| {
                let grid = zone.grid();
                JsonZone {
                    name: zone.name.clone(),
                    color: to_hex(zone.color()),
                    label_color: to_hex(zone.label_color()),
                    rows: grid.rows,
                    cols: grid.cols,
                    padding: Xy {
                        x: grid.padding.x,
                        y: grid.padding.y,
                    },
                    frame_size: Size {
                        w: grid.frame_size.width,
                        h: grid.frame_size.height,
                    },
                    bounds: zone.bounding_rect().into(),
                    frames: zone
                        .frames_by_index()
                        .into_iter()
                        .map(|frame| JsonFrame {
                            index: frame.index,
                            file: sheet_name
                                .map(|sheet| frame_entry_name(sheet, &zone.name, frame.index)),
                            frame: frame.rect().into(),
                        })
                        .collect(),
                }
            })
            .collect(),
    };

    if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Grid, Point};
    use crate::zone::ZoneId;
    use image::Rgb;

    #[test]
    fn test_layout_json_lists_frames() {
        let grid = Grid {
            origin: Point::new(4, 8),
            rows: 1,
            cols: 2,
            ..Grid::default()
        };
        let zone = Zone::new(ZoneId(1), "run", grid, Rgb([255, 0, 0]));

        let json = layout_json(&[zone], Some("hero"), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let z = &value["zones"][0];
        assert_eq!(z["name"], "run");
        assert_eq!(z["color"], "#ff0000");
        assert_eq!(z["frameSize"]["w"], 16);
        assert_eq!(z["bounds"]["w"], 32);
        assert_eq!(z["frames"][1]["file"], "hero_run1.png");
        assert_eq!(z["frames"][1]["frame"]["x"], 20);
        assert_eq!(z["frames"][1]["frame"]["y"], 8);
    }

    #[test]
    fn test_layout_json_without_sheet_omits_file() {
        let zone = Zone::new(ZoneId(1), "idle", Grid::default(), Rgb([0, 0, 0]));

        let json = layout_json(&[zone], None, true).unwrap();

        assert!(!json.contains("\"file\""));
        assert!(json.contains("\"labelColor\": \"#ffffff\""));
    }
}
