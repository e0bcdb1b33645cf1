use crate::error::{Severity, SplitError};

/// How long a transient status message stays up when no duration is given
pub const DEFAULT_NOTICE_MS: u32 = 2500;

/// Status message produced by the last session operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
    /// Auto-dismiss delay; `None` for blocking notices
    pub timeout_ms: Option<u32>,
}

impl Notice {
    pub fn transient(text: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Transient,
            timeout_ms: Some(timeout_ms),
        }
    }

    pub fn blocking(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Blocking,
            timeout_ms: None,
        }
    }
}

impl From<&SplitError> for Notice {
    fn from(err: &SplitError) -> Self {
        match err.severity() {
            Severity::Transient => Notice::transient(err.to_string(), DEFAULT_NOTICE_MS),
            Severity::Blocking => Notice::blocking(format!("Error: {}", err)),
        }
    }
}
