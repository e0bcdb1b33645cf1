use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use image::{Rgb, RgbaImage, imageops};
use log::{debug, info};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{encode_png, key_out_background};
use crate::cli::CompressionLevel;
use crate::error::SplitError;
use crate::geometry::Rect;
use crate::zone::Zone;

/// Settings for one export run
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Prefix of every entry and the archive's file stem
    pub sheet_name: String,
    /// Pixels of exactly this RGB become transparent
    pub background: Option<Rgb<u8>>,
    /// Optional oxipng pass over each frame
    pub compress: Option<CompressionLevel>,
}

/// One entry written to the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFrame {
    /// Member name inside the zip
    pub name: String,
    /// Clipped region of the source image that was cropped
    pub region: Rect,
}

/// Result of writing an archive to disk
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub entries: Vec<ExportedFrame>,
    /// Frames with an empty crop after clipping
    pub skipped: usize,
}

/// Archive member name: `{sheet}_{zone}{index}.png`
pub fn frame_entry_name(sheet_name: &str, zone_name: &str, index: usize) -> String {
    format!("{}_{}{}.png", sheet_name, zone_name, index)
}

/// Clip `rect` to the image, crop, and key out the background.
///
/// Returns `None` when nothing of the frame lies inside the image.
pub fn crop_frame(
    image: &RgbaImage,
    rect: Rect,
    background: Option<Rgb<u8>>,
) -> Option<(Rect, RgbaImage)> {
    let region = rect.clip_to(image.width(), image.height())?;

    // clip_to only yields non-negative corners
    let x = u32::try_from(region.x).ok()?;
    let y = u32::try_from(region.y).ok()?;
    let mut crop = imageops::crop_imm(image, x, y, region.width, region.height).to_image();

    if let Some(bg) = background {
        key_out_background(&mut crop, bg);
    }

    Some((region, crop))
}

/// Write every frame of every zone into a deflate-compressed zip.
///
/// Zones are visited in order, frames by ascending index. Frames whose
/// clipped crop is empty are skipped without error. `archive_path` only
/// labels errors. Returns the writer and the entries written, in order.
pub fn write_archive<W: Write + Seek>(
    writer: W,
    archive_path: &Path,
    zones: &[Zone],
    image: &RgbaImage,
    options: &ExportOptions,
) -> Result<(W, Vec<ExportedFrame>), SplitError> {
    let archive_error = |source: zip::result::ZipError| SplitError::ArchiveWrite {
        path: archive_path.to_path_buf(),
        source,
    };

    let mut zip = ZipWriter::new(writer);
    let file_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::new();

    for zone in zones {
        for frame in zone.frames_by_index() {
            let Some((region, crop)) = crop_frame(image, frame.rect(), options.background)
            else {
                debug!(
                    "Skipping frame {} of zone '{}': outside the image",
                    frame.index, zone.name
                );
                continue;
            };

            let name = frame_entry_name(&options.sheet_name, &zone.name, frame.index);
            let png = encode_png(&crop, &name, options.compress)?;

            zip.start_file(name.as_str(), file_options)
                .map_err(archive_error)?;
            zip.write_all(&png)
                .map_err(|e| archive_error(e.into()))?;

            debug!("Wrote {} ({} bytes)", name, png.len());
            entries.push(ExportedFrame { name, region });
        }
    }

    let writer = zip.finish().map_err(archive_error)?;
    Ok((writer, entries))
}

/// Export all frames to `{directory}/{sheet_name}.zip`, overwriting any
/// existing archive of that name.
///
/// The archive is written to a temporary file in `directory` and renamed into
/// place once complete, so a failed export leaves any previous archive intact.
pub fn export_zip(
    zones: &[Zone],
    image: &RgbaImage,
    options: &ExportOptions,
    directory: &Path,
) -> Result<ExportSummary, SplitError> {
    let sheet_name = options.sheet_name.trim();
    if sheet_name.is_empty() {
        return Err(SplitError::EmptySheetName);
    }
    let options = ExportOptions {
        sheet_name: sheet_name.to_string(),
        ..options.clone()
    };

    let path = directory.join(format!("{}.zip", sheet_name));
    let output_error = |source: std::io::Error| SplitError::OutputWrite {
        path: path.clone(),
        source,
    };

    let part = NamedTempFile::new_in(directory).map_err(output_error)?;
    let (writer, entries) = write_archive(BufWriter::new(part), &path, zones, image, &options)?;
    let part = writer
        .into_inner()
        .map_err(|e| output_error(e.into_error()))?;
    part.as_file().sync_all().map_err(output_error)?;
    part.persist(&path).map_err(|e| output_error(e.error))?;

    let total: usize = zones.iter().map(|z| z.frames().len()).sum();
    let skipped = total - entries.len();
    info!(
        "Exported {} frames to {} ({} skipped)",
        entries.len(),
        path.display(),
        skipped
    );

    Ok(ExportSummary {
        path,
        entries,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use image::Rgba;

    use super::*;
    use crate::geometry::{Grid, Padding, Point, Size};
    use crate::zone::ZoneId;

    fn image_100() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([10, 10, 10, 255]));
        img
    }

    fn zone(name: &str, origin: Point, rows: u32, cols: u32) -> Zone {
        Zone::new(
            ZoneId(1),
            name,
            Grid {
                origin,
                frame_size: Size::new(10, 10),
                rows,
                cols,
                padding: Padding::new(0, 0),
            },
            Rgb([0, 0, 0]),
        )
    }

    fn options(background: Option<Rgb<u8>>) -> ExportOptions {
        ExportOptions {
            sheet_name: "hero".to_string(),
            background,
            compress: None,
        }
    }

    fn read_names(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn read_entry(bytes: &[u8], name: &str) -> RgbaImage {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut png = Vec::new();
        file.read_to_end(&mut png).unwrap();
        image::load_from_memory(&png).unwrap().into_rgba8()
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(frame_entry_name("hero", "run", 3), "hero_run3.png");
    }

    #[test]
    fn test_crop_frame_outside_is_none() {
        let img = image_100();
        assert!(crop_frame(&img, Rect::new(200, 200, 10, 10), None).is_none());
    }

    #[test]
    fn test_crop_frame_clips_to_image() {
        let img = image_100();
        let (region, crop) = crop_frame(&img, Rect::new(95, -3, 10, 10), None).unwrap();
        assert_eq!(region, Rect::new(95, 0, 5, 10));
        assert_eq!(crop.dimensions(), (5, 10));
    }

    #[test]
    fn test_archive_order_and_names() {
        let img = image_100();
        let mut walk = zone("walk", Point::new(0, 0), 1, 3);
        // Moving frames does not change the export order
        walk.move_frame(0, Point::new(50, 50)).unwrap();
        let zones = vec![walk, zone("run", Point::new(0, 20), 2, 1)];

        let (cursor, entries) = write_archive(
            Cursor::new(Vec::new()),
            Path::new("hero.zip"),
            &zones,
            &img,
            &options(None),
        )
        .unwrap();

        let bytes = cursor.into_inner();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        for i in 0..archive.len() {
            let entry = archive.by_index(i).unwrap();
            assert_eq!(entry.compression(), CompressionMethod::Deflated);
        }

        let names = read_names(bytes);
        assert_eq!(
            names,
            vec![
                "hero_walk0.png",
                "hero_walk1.png",
                "hero_walk2.png",
                "hero_run0.png",
                "hero_run1.png",
            ]
        );
        assert_eq!(entries[0].region, Rect::new(50, 50, 10, 10));
    }

    #[test]
    fn test_frame_outside_image_is_skipped() {
        let img = image_100();
        let mut z = zone("run", Point::new(0, 0), 1, 2);
        z.move_frame(1, Point::new(200, 200)).unwrap();

        let (cursor, entries) = write_archive(
            Cursor::new(Vec::new()),
            Path::new("hero.zip"),
            &[z],
            &img,
            &options(None),
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(read_names(cursor.into_inner()), vec!["hero_run0.png"]);
    }

    #[test]
    fn test_background_keying_in_archive() {
        let img = image_100();
        let z = zone("idle", Point::new(0, 0), 1, 1);

        let (cursor, _) = write_archive(
            Cursor::new(Vec::new()),
            Path::new("hero.zip"),
            &[z],
            &img,
            &options(Some(Rgb([255, 255, 255]))),
        )
        .unwrap();

        let frame = read_entry(&cursor.into_inner(), "hero_idle0.png");
        assert_eq!(frame.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
        assert_eq!(frame.get_pixel(1, 0), &Rgba([10, 10, 10, 255]));
    }

    #[test]
    fn test_export_zip_writes_sheet_archive() {
        let dir = tempfile::tempdir().unwrap();
        let img = image_100();
        let zones = vec![zone("run", Point::new(0, 0), 1, 4)];
        let mut opts = options(None);
        opts.sheet_name = "  hero ".to_string();

        let summary = export_zip(&zones, &img, &opts, dir.path()).unwrap();

        assert_eq!(summary.path, dir.path().join("hero.zip"));
        assert_eq!(summary.entries.len(), 4);
        assert_eq!(summary.skipped, 0);
        let bytes = std::fs::read(&summary.path).unwrap();
        assert!(read_names(bytes).contains(&"hero_run3.png".to_string()));
    }

    #[test]
    fn test_export_zip_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let img = image_100();
        std::fs::write(dir.path().join("hero.zip"), b"stale").unwrap();

        let zones = vec![zone("run", Point::new(0, 0), 1, 1)];
        let summary = export_zip(&zones, &img, &options(None), dir.path()).unwrap();

        let bytes = std::fs::read(&summary.path).unwrap();
        assert_eq!(read_names(bytes), vec!["hero_run0.png"]);
    }

    #[test]
    fn test_far_off_grid_frames_are_skipped() {
        let img = image_100();
        // The second column lies past i32::MAX
        let z = zone("a", Point::new(i32::MAX, 0), 1, 2);

        let (_, entries) = write_archive(
            Cursor::new(Vec::new()),
            Path::new("hero.zip"),
            &[z],
            &img,
            &options(None),
        )
        .unwrap();

        assert!(entries.is_empty());
    }

    #[test]
    fn test_failed_export_keeps_previous_archive() {
        let dir = tempfile::tempdir().unwrap();
        let img = image_100();
        let previous = dir.path().join("hero.zip");
        std::fs::write(&previous, b"previous").unwrap();

        // Frame 10 of "a" and frame 0 of "a1" share the entry name hero_a10.png
        let zones = vec![
            zone("a", Point::new(0, 0), 2, 6),
            zone("a1", Point::new(0, 0), 1, 1),
        ];
        let err = export_zip(&zones, &img, &options(None), dir.path()).unwrap_err();

        assert!(matches!(err, SplitError::ArchiveWrite { .. }));
        assert_eq!(std::fs::read(&previous).unwrap(), b"previous");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_export_zip_requires_sheet_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(None);
        opts.sheet_name = "   ".to_string();

        let err = export_zip(&[], &image_100(), &opts, dir.path()).unwrap_err();

        assert!(matches!(err, SplitError::EmptySheetName));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
