use thiserror::Error;

use crate::snapshot::SnapshotError;

/// Errors surfaced by the drawing session and its collaborators
#[derive(Debug, Error)]
pub enum PaintError {
    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No font loaded for the text tool")]
    FontUnavailable,

    #[error("Failed to load font: {0}")]
    Font(String),

    /// A snapshot restore has not completed yet
    #[error("A canvas restore is still in progress")]
    RestoreInFlight,

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Result type for session operations
pub type PaintResult<T> = Result<T, PaintError>;
