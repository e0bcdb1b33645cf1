use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use image::Rgb;
use log::{debug, info, warn};

use super::{Notice, PointPick};
use crate::cli::CompressionLevel;
use crate::error::SplitError;
use crate::export::{ExportOptions, ExportSummary, export_zip};
use crate::geometry::{Grid, Point, Size};
use crate::registry::ZoneRegistry;
use crate::source::{SourceImage, load_source_image};
use crate::zone::{ResizeGesture, Zone, ZoneId, ZoneParams, parse_hex_color, to_hex};

/// State shared with the frame-size observers installed on each zone
#[derive(Debug, Default)]
struct Panel {
    /// Property form of the selected zone
    form: Option<ZoneParams>,
    form_zone: Option<ZoneId>,
    notice: Option<Notice>,
}

/// One interactive editing session: the single mutator of all zone state.
///
/// Every operation runs to completion, records a status `Notice`, and leaves
/// state untouched when it fails.
#[derive(Debug)]
pub struct Session {
    image: Option<SourceImage>,
    registry: ZoneRegistry,
    selected: Option<usize>,
    pick: PointPick,
    panel: Rc<RefCell<Panel>>,
    /// Contents of the background-color field
    background: String,
    sheet_name: String,
    zone_defaults: Grid,
    compress: Option<CompressionLevel>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            image: None,
            registry: ZoneRegistry::new(),
            selected: None,
            pick: PointPick::None,
            panel: Rc::new(RefCell::new(Panel::default())),
            background: String::new(),
            sheet_name: String::new(),
            zone_defaults: Grid::default(),
            compress: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of palette hues handed out to new zones
    pub fn palette_size(mut self, size: usize) -> Self {
        self.registry = ZoneRegistry::with_palette_size(size);
        self
    }

    /// Grid used for zones created by `add_zone`
    pub fn zone_defaults(mut self, grid: Grid) -> Self {
        self.zone_defaults = grid;
        self
    }

    pub fn compress(mut self, compress: Option<CompressionLevel>) -> Self {
        self.compress = compress;
        self
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn zones(&self) -> &[Zone] {
        self.registry.zones()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_zone(&self) -> Option<&Zone> {
        self.selected.and_then(|i| self.registry.zones().get(i))
    }

    pub fn pick(&self) -> PointPick {
        self.pick
    }

    /// Property form contents for the selected zone
    pub fn form(&self) -> Option<ZoneParams> {
        self.panel.borrow().form.clone()
    }

    /// Status message left by the last operation
    pub fn notice(&self) -> Option<Notice> {
        self.panel.borrow().notice.clone()
    }

    pub fn background_text(&self) -> &str {
        &self.background
    }

    /// Parsed background color, `None` when the field is empty or malformed
    pub fn background(&self) -> Option<Rgb<u8>> {
        parse_hex_color(&self.background)
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn set_sheet_name(&mut self, name: impl Into<String>) {
        self.sheet_name = name.into();
    }

    fn notify(&self, notice: Notice) {
        debug!("{}", notice.text);
        self.panel.borrow_mut().notice = Some(notice);
    }

    /// Record the notice for a failed operation and hand the error back
    fn fail<T>(&self, err: SplitError) -> Result<T, SplitError> {
        warn!("{}", err);
        self.notify(Notice::from(&err));
        Err(err)
    }

    /// Index of the selected zone, reporting when there is none
    fn require_selection(&self) -> Result<usize, SplitError> {
        match self.selected {
            Some(index) if index < self.registry.len() => Ok(index),
            _ => self.fail(SplitError::NoZoneSelected),
        }
    }

    /// Load a new source image. On failure the previous image is kept.
    pub fn open_image(&mut self, path: &Path) -> Result<(), SplitError> {
        match load_source_image(path) {
            Ok(image) => {
                self.notify(Notice::transient(
                    format!("Loaded {}", image.display_name()),
                    super::DEFAULT_NOTICE_MS,
                ));
                self.image = Some(image);
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Route committed frame-size changes of `zone` into the property form
    fn watch(panel: &Rc<RefCell<Panel>>, zone: &mut Zone) {
        let panel = Rc::clone(panel);
        zone.set_observer(move |size: Size, zone: &Zone| {
            let mut panel = panel.borrow_mut();
            if panel.form_zone != Some(zone.id()) {
                return;
            }
            if let Some(form) = panel.form.as_mut() {
                form.grid.frame_size = size;
            }
            panel.notice = Some(Notice::transient("Frame size updated", 1600));
        });
    }

    /// Load the zone at `index` into the property form
    pub fn select_zone(&mut self, index: usize) -> Result<(), SplitError> {
        let zone = match self.registry.get(index) {
            Ok(zone) => zone,
            Err(err) => return self.fail(err),
        };
        let (id, params) = (zone.id(), zone.params());

        let mut panel = self.panel.borrow_mut();
        panel.form = Some(params);
        panel.form_zone = Some(id);
        drop(panel);

        self.selected = Some(index);
        Ok(())
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        let mut panel = self.panel.borrow_mut();
        panel.form = None;
        panel.form_zone = None;
    }

    fn adopt_new_zone(&mut self, index: usize) -> Result<(), SplitError> {
        Self::watch(&self.panel, self.registry.get_mut(index)?);
        self.select_zone(index)
    }

    /// Add a zone with the default grid. Requires a loaded image and a name.
    pub fn add_zone(&mut self, name: &str) -> Result<usize, SplitError> {
        if self.image.is_none() {
            return self.fail(SplitError::NoImage);
        }
        let index = match self.registry.add(name, self.zone_defaults) {
            Ok(index) => index,
            Err(err) => return self.fail(err),
        };
        self.adopt_new_zone(index)?;
        self.notify(Notice::transient("Zone added", 1000));
        Ok(index)
    }

    /// Delete the selected zone and all of its frames
    pub fn delete_selected_zone(&mut self) -> Result<Zone, SplitError> {
        let index = self.require_selection()?;
        let zone = self.registry.remove(index)?;

        if self.pick == PointPick::Origin(zone.id()) {
            self.pick = PointPick::None;
        }
        if self.registry.is_empty() {
            self.clear_selection();
        } else {
            self.select_zone(index.min(self.registry.len() - 1))?;
        }

        self.notify(Notice::transient("Zone deleted", 1200));
        Ok(zone)
    }

    /// Snapshot the selected zone into the clipboard
    pub fn copy_selected_zone(&mut self) -> Result<(), SplitError> {
        let index = self.require_selection()?;
        self.registry.copy(index)?;
        self.notify(Notice::transient("Zone copied", 1800));
        Ok(())
    }

    /// Create a zone from the clipboard and select it
    pub fn paste_zone(&mut self) -> Result<usize, SplitError> {
        let index = match self.registry.paste() {
            Ok(index) => index,
            Err(err) => return self.fail(err),
        };
        self.adopt_new_zone(index)?;
        self.notify(Notice::transient("Zone pasted", 1200));
        Ok(index)
    }

    /// Overwrite the selected zone's parameters and regenerate its frames
    pub fn apply_zone_changes(&mut self, params: ZoneParams) -> Result<(), SplitError> {
        let index = self.require_selection()?;
        self.registry.apply(index, params)?;
        self.select_zone(index)?;
        self.notify(Notice::transient("Zone applied", 1000));
        Ok(())
    }

    /// Change the selected zone's color without touching geometry
    pub fn set_zone_color(&mut self, color: Rgb<u8>) -> Result<(), SplitError> {
        let index = self.require_selection()?;
        self.registry.recolor(index, color)?;
        self.notify(Notice::transient("Zone color updated", 1000));
        Ok(())
    }

    /// Move one frame of the zone at `zone` to a continuous position,
    /// snapped to the nearest pixel
    pub fn move_frame(
        &mut self,
        zone: usize,
        frame: usize,
        x: f64,
        y: f64,
    ) -> Result<(), SplitError> {
        let moved = self
            .registry
            .get_mut(zone)
            .and_then(|z| z.move_frame(frame, Point::snapped(x, y)));
        moved.or_else(|err| self.fail(err))
    }

    pub fn begin_resize(
        &self,
        zone: usize,
        frame: usize,
        pointer: (f64, f64),
    ) -> Result<ResizeGesture, SplitError> {
        self.registry
            .get(zone)
            .and_then(|z| z.begin_resize(frame, pointer))
            .or_else(|err| self.fail(err))
    }

    pub fn track_resize(
        &mut self,
        zone: usize,
        gesture: &ResizeGesture,
        pointer: (f64, f64),
    ) -> Result<Size, SplitError> {
        let size = self
            .registry
            .get_mut(zone)
            .and_then(|z| z.track_resize(gesture, pointer));
        size.or_else(|err| self.fail(err))
    }

    /// Commit a resize gesture, propagating the size to the whole zone
    pub fn finish_resize(
        &mut self,
        zone: usize,
        gesture: ResizeGesture,
    ) -> Result<Size, SplitError> {
        let size = self
            .registry
            .get_mut(zone)
            .and_then(|z| z.finish_resize(gesture));
        size.or_else(|err| self.fail(err))
    }

    /// Arm a one-shot pick: the next pointer press sets the selected zone's origin
    pub fn begin_origin_pick(&mut self) -> Result<(), SplitError> {
        let index = self.require_selection()?;
        let id = self.registry.get(index)?.id();
        self.pick = PointPick::Origin(id);
        self.notify(Notice::transient("Click to set origin", 4000));
        Ok(())
    }

    /// Arm a one-shot pick: the next pointer press samples the background color
    pub fn begin_background_pick(&mut self) {
        self.pick = PointPick::BackgroundColor;
        self.notify(Notice::transient("Click on image to pick color", 4000));
    }

    /// Offer a pointer press in image space to the pending pick.
    ///
    /// Returns `true` when the press was consumed, in which case the caller
    /// must skip its default handling.
    pub fn pointer_pressed(&mut self, x: f64, y: f64) -> bool {
        let pick = std::mem::take(&mut self.pick);
        let point = Point::snapped(x, y);

        match pick {
            PointPick::None => false,
            PointPick::Origin(id) => {
                let Some(index) = self.registry.position(id) else {
                    return true;
                };
                if let Ok(zone) = self.registry.get_mut(index) {
                    zone.set_origin(point);
                }
                let mut panel = self.panel.borrow_mut();
                if panel.form_zone == Some(id)
                    && let Some(form) = panel.form.as_mut()
                {
                    form.grid.origin = point;
                }
                drop(panel);
                self.notify(Notice::transient(
                    format!("Zone origin set to ({}, {})", point.x, point.y),
                    2000,
                ));
                true
            }
            PointPick::BackgroundColor => {
                let sampled = self.image.as_ref().and_then(|image| {
                    let x = u32::try_from(point.x).ok()?;
                    let y = u32::try_from(point.y).ok()?;
                    if x < image.width() && y < image.height() {
                        let p = image.pixels.get_pixel(x, y);
                        Some(Rgb([p[0], p[1], p[2]]))
                    } else {
                        None
                    }
                });
                match sampled {
                    Some(color) => self.set_background_color(color),
                    None => self.notify(Notice::transient("Click was outside image", 1400)),
                }
                true
            }
        }
    }

    /// Replace the background-color field with typed text.
    /// Malformed text is kept as-is and disables keying.
    pub fn set_background_text(&mut self, text: impl Into<String>) {
        self.background = text.into();
        if !self.background.trim().is_empty() && self.background().is_none() {
            debug!("Background '{}' is not a hex color; keying disabled", self.background);
        }
    }

    /// Fill the background-color field from a picked color
    pub fn set_background_color(&mut self, color: Rgb<u8>) {
        let hex = to_hex(color);
        self.notify(Notice::transient(format!("Picked color: {}", hex), 1800));
        self.background = hex;
    }

    /// Export every frame to `{directory}/{sheet_name}.zip`.
    ///
    /// Requires a loaded image and a non-empty sheet name; neither check
    /// touches the filesystem.
    pub fn export(&mut self, directory: &Path) -> Result<ExportSummary, SplitError> {
        let Some(image) = self.image.as_ref() else {
            return self.fail(SplitError::NoImage);
        };
        if self.sheet_name.trim().is_empty() {
            return self.fail(SplitError::EmptySheetName);
        }

        let options = ExportOptions {
            sheet_name: self.sheet_name.clone(),
            background: self.background(),
            compress: self.compress,
        };
        match export_zip(self.registry.zones(), &image.pixels, &options, directory) {
            Ok(summary) => {
                info!("Exported ZIP to: {}", summary.path.display());
                self.notify(Notice::transient(
                    format!("Exported ZIP to: {}", summary.path.display()),
                    3000,
                ));
                Ok(summary)
            }
            Err(err) => self.fail(err),
        }
    }
}
