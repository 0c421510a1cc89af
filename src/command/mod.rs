mod commands;
pub mod history;

pub use commands::Command;
pub use history::{MAX_HISTORY, SnapshotHistory};
