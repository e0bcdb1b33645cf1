use crate::zone::ZoneId;

/// A one-shot override of the next pointer press on the canvas.
///
/// The input collaborator consults the session before its default handling;
/// the pick is consumed by the first press and reverts to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointPick {
    #[default]
    None,
    /// Next press sets the origin of this zone
    Origin(ZoneId),
    /// Next press samples the background color from the source image
    BackgroundColor,
}

impl PointPick {
    pub fn is_pending(&self) -> bool {
        !matches!(self, PointPick::None)
    }
}
