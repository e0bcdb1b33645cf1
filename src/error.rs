use std::path::PathBuf;
use thiserror::Error;

/// How a failure is surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Auto-dismissing status message; the operation was a no-op
    Transient,
    /// Blocking notification; state is unchanged and the action can be retried
    Blocking,
}

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode frame '{name}': {source}")]
    ImageEncode {
        name: String,
        source: image::ImageError,
    },

    #[error("Failed to compress PNG '{name}': {message}")]
    PngCompress { name: String, message: String },

    #[error("Failed to write archive '{path}': {source}")]
    ArchiveWrite {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Load an image first")]
    NoImage,

    #[error("Select a zone first")]
    NoZoneSelected,

    #[error("Please set a sheet export name")]
    EmptySheetName,

    #[error("Zone name must not be empty")]
    EmptyZoneName,

    #[error("No zone copied")]
    NothingCopied,

    #[error("Zone index {index} out of range ({len} zones)")]
    ZoneOutOfRange { index: usize, len: usize },

    #[error("Zone '{zone}' has no frame {index}")]
    FrameOutOfRange { zone: String, index: usize },

    #[error("Invalid zone '{spec}': {message}")]
    InvalidZone { spec: String, message: String },
}

impl SplitError {
    /// Classify the error for reporting
    pub fn severity(&self) -> Severity {
        match self {
            SplitError::ImageLoad { .. }
            | SplitError::ImageEncode { .. }
            | SplitError::PngCompress { .. }
            | SplitError::ArchiveWrite { .. }
            | SplitError::OutputWrite { .. } => Severity::Blocking,
            _ => Severity::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_errors_are_transient() {
        assert_eq!(SplitError::NoImage.severity(), Severity::Transient);
        assert_eq!(SplitError::NothingCopied.severity(), Severity::Transient);
        assert_eq!(SplitError::EmptySheetName.severity(), Severity::Transient);
    }

    #[test]
    fn test_io_errors_are_blocking() {
        let err = SplitError::OutputWrite {
            path: PathBuf::from("out/hero.zip"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(err.severity(), Severity::Blocking);
        assert_eq!(
            err.to_string(),
            "Failed to write output file 'out/hero.zip': disk full"
        );
    }
}
