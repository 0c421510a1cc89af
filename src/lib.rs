#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod command;
pub mod components;
pub mod config;
pub mod error;
pub mod file_handler;
pub mod panels;
pub mod snapshot;
pub mod state;
pub mod tools;
pub mod util;

pub use app::PaintApp;
pub use canvas::{Color, FillReport, PixelBuffer, Point, flood_fill};
pub use command::{Command, SnapshotHistory};
pub use config::PaintConfig;
pub use error::{PaintError, PaintResult};
pub use snapshot::{PngCodec, RawCodec, Snapshot, SnapshotCodec, SnapshotFormat};
pub use state::{DrawingSession, EditorState};
pub use tools::{BrushSettings, ToolKind};
