/// The state machine for the drawing session.
///
/// ```text
///              pointer down            pointer up
///   ┌──────┐ ──────────────► ┌─────────┐ ─────────┐
///   │      │                 │ Drawing │          │
///   │ Idle │ ◄───────────────┴─────────┘ ◄────────┘
///   │      │
///   │      │ undo / redo / restore  ┌───────────┐
///   │      │ ─────────────────────► │ Restoring │
///   └──────┘ ◄───────────────────── └───────────┘
///               decode complete
/// ```
///
/// While `Restoring`, the canvas is waiting for a snapshot decode to land and no other
/// mutating action may start.
use crate::canvas::Point;
use crate::tools::ToolKind;

/// The possible states of the session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditorState {
    /// No active operation
    #[default]
    Idle,
    /// The pointer is held down with a freehand or shape tool
    Drawing {
        tool: ToolKind,
        /// Where the pointer went down
        start: Point,
        /// The latest pointer position
        last: Point,
        /// Whether this stroke already recorded its history snapshot
        recorded: bool,
    },
    /// A snapshot decode is in flight
    Restoring {
        generation: u64,
    },
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        match (self, new_state) {
            (EditorState::Idle, EditorState::Idle) => true,
            (EditorState::Idle, EditorState::Drawing { .. }) => true,
            (EditorState::Idle, EditorState::Restoring { .. }) => true,

            // Pointer moves update the drawing state in place
            (EditorState::Drawing { .. }, EditorState::Drawing { .. }) => true,
            (EditorState::Drawing { .. }, EditorState::Idle) => true,

            (EditorState::Restoring { .. }, EditorState::Idle) => true,

            // All other transitions are invalid
            _ => false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "Idle",
            EditorState::Drawing { .. } => "Drawing",
            EditorState::Restoring { .. } => "Restoring",
        }
    }

    /// Returns true if the editor is currently in an idle state
    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    /// Returns true if the editor is currently in a drawing state
    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::Drawing { .. })
    }

    /// Returns true while a snapshot restore is pending
    pub fn is_restoring(&self) -> bool {
        matches!(self, EditorState::Restoring { .. })
    }
}
