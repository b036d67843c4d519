use std::path::PathBuf;

use crate::VisualStyle;

/// Result alias that carries the custom [`VisualiserError`] type.
pub type Result<T> = std::result::Result<T, VisualiserError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum VisualiserError {
    /// Free-form message for failures that have no dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A track could not be opened by the playback backend.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// JSON could not be parsed or produced.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A configuration value is outside its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl VisualiserError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for VisualiserError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for VisualiserError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

/// Failure to open a track. Never retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("audio file `{}` does not exist", path.display())]
    Missing { path: PathBuf },
    #[error("unsupported audio format `{extension}`")]
    Unsupported { extension: String },
    #[error("could not decode `{}`: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure inside a single render or poll tick. Logged and skipped by the
/// scheduler; the loop carries on at its next interval.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickError {
    #[error("amplitude buffer is empty")]
    EmptyBuffer,
    #[error("drawing surface reported an invalid extent {width}x{height}")]
    InvalidExtent { width: f64, height: f64 },
    #[error("{style} layout is configured with no primitives")]
    EmptyLayout { style: VisualStyle },
}
