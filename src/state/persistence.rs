use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use super::DrawingSession;
use crate::error::PaintError;
use crate::snapshot::Snapshot;
use crate::tools::{BrushSettings, ToolKind};
use crate::util::time;

/// File the autosave record is written to, inside the state directory
pub const AUTOSAVE_FILE: &str = "autosave.json";

/// Errors that can occur during state persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize state: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write state: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read state file: {0}")]
    ReadError(String),

    #[error("Failed to capture canvas: {0}")]
    CaptureError(#[from] PaintError),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// The canvas and tool settings saved on exit and restored on the next start.
///
/// The canvas is a single snapshot kept outside the undo history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveRecord {
    /// Version of the application when the record was written
    pub version: String,
    /// The session that wrote the record
    pub session_id: Uuid,
    /// Timestamp of when the record was written
    pub timestamp: u64,
    pub width: u32,
    pub height: u32,
    pub tool: ToolKind,
    pub brush: BrushSettings,
    pub snapshot: Snapshot,
}

impl AutosaveRecord {
    /// Captures the live canvas and settings of a session
    pub fn capture(session: &DrawingSession) -> PersistenceResult<Self> {
        let canvas = session.canvas();
        Ok(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            session_id: session.id(),
            timestamp: time::timestamp_secs(),
            width: canvas.width(),
            height: canvas.height(),
            tool: session.tool(),
            brush: session.brush(),
            snapshot: session.snapshot()?,
        })
    }

    /// Applies the settings and starts restoring the canvas.
    ///
    /// The canvas lands once the session's pending restore completes.
    pub fn restore(self, session: &mut DrawingSession) -> Result<(), PaintError> {
        if self.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Autosave version {} differs from current version {}",
                self.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        session.set_tool(self.tool);
        session.set_brush_color(self.brush.color);
        session.set_brush_size(self.brush.size);
        session.restore_from(self.snapshot)
    }
}

/// Manages the autosave file
#[derive(Debug, Clone)]
pub struct StatePersistence {
    /// Directory where state files are stored
    state_dir: PathBuf,
}

impl StatePersistence {
    /// Create a new state persistence manager
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn autosave_path(&self) -> PathBuf {
        self.state_dir.join(AUTOSAVE_FILE)
    }

    /// Save a record, replacing any previous one
    pub fn save(&self, record: &AutosaveRecord) -> PersistenceResult<()> {
        // Create state directory if it doesn't exist
        fs::create_dir_all(&self.state_dir)?;

        let json = serde_json::to_string(record)?;
        fs::write(self.autosave_path(), json)?;
        log::info!("Autosaved canvas to {}", self.autosave_path().display());
        Ok(())
    }

    /// Load the saved record. `None` if nothing was saved yet.
    pub fn load(&self) -> PersistenceResult<Option<AutosaveRecord>> {
        let path = self.autosave_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| PersistenceError::ReadError(e.to_string()))?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Remove the saved record, if any
    pub fn clear(&self) -> PersistenceResult<()> {
        let path = self.autosave_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
