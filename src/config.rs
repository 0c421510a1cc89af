use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canvas::Color;
use crate::command::MAX_HISTORY;
use crate::error::{PaintError, PaintResult};
use crate::snapshot::SnapshotFormat;
use crate::tools::BrushSettings;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "RASTER_PAINT_CONFIG";

/// Startup configuration. Every field has a default, so a config file only needs the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing fields fall back to their defaults
pub struct PaintConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Initial canvas color as `#rrggbb`
    pub background: String,
    /// Maximum number of undo steps
    pub history_cap: usize,
    pub brush_size: f32,
    /// Initial brush color as `#rrggbb`
    pub brush_color: String,
    pub snapshot_format: SnapshotFormat,
    /// Where the autosave record lives
    pub state_dir: PathBuf,
    /// Where "Save" writes the PNG
    pub export_path: PathBuf,
    /// TrueType/OpenType font for the text tool
    pub font_path: Option<PathBuf>,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            background: "#ffffff".to_owned(),
            history_cap: MAX_HISTORY,
            brush_size: 10.0,
            brush_color: "#000000".to_owned(),
            snapshot_format: SnapshotFormat::Png,
            state_dir: PathBuf::from(".raster_paint"),
            export_path: PathBuf::from("drawing.png"),
            font_path: None,
        }
    }
}

impl PaintConfig {
    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults if it is unset.
    pub fn from_env() -> PaintResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> PaintResult<Self> {
        log::info!("Loading config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> PaintResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PaintResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PaintError::Config(format!(
                "canvas size {}x{} must not be empty",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.brush_size.is_nan() || self.brush_size <= 0.0 {
            return Err(PaintError::Config(format!(
                "brush size {} must be positive",
                self.brush_size
            )));
        }
        Color::from_hex(&self.background)?;
        Color::from_hex(&self.brush_color)?;
        Ok(())
    }

    pub fn background_color(&self) -> PaintResult<Color> {
        Color::from_hex(&self.background)
    }

    pub fn brush(&self) -> PaintResult<BrushSettings> {
        Ok(BrushSettings {
            color: Color::from_hex(&self.brush_color)?,
            size: self.brush_size,
        })
    }
}
