mod editor_state;
mod persistence;
mod session;

pub use editor_state::EditorState;
pub use persistence::{
    AUTOSAVE_FILE,
    AutosaveRecord,
    PersistenceError,
    PersistenceResult,
    StatePersistence,
};
pub use session::{DrawingSession, RestoreKind};
