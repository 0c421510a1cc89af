use std::collections::VecDeque;

use crate::snapshot::Snapshot;

/// Default number of undo steps kept
pub const MAX_HISTORY: usize = 20;

/// Manages the undo/redo stacks of whole-canvas snapshots.
///
/// The history never touches the live canvas. Callers hand in the current state and
/// restore whatever snapshot comes back.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    /// Snapshots that can be restored by undo, oldest first
    undo_stack: VecDeque<Snapshot>,
    /// Snapshots that can be restored by redo, oldest first
    redo_stack: Vec<Snapshot>,
    cap: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }
}

impl SnapshotHistory {
    /// Creates an empty history with the default cap
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty history keeping at most `cap` undo steps. A cap of zero is raised to one.
    pub fn with_capacity(cap: usize) -> Self {
        if cap == 0 {
            log::warn!("History cap of 0 would disable undo, using 1");
        }
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            cap: cap.max(1),
        }
    }

    /// Records the canvas state from before a mutating action.
    ///
    /// Evicts the oldest entry once the cap is exceeded and always invalidates redo.
    pub fn record_before_action(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.cap {
            self.undo_stack.pop_front();
            log::debug!("History full, dropped oldest snapshot");
        }
        self.redo_stack.clear();
    }

    /// Steps back. `current` is the live state, kept for redo.
    ///
    /// Returns `None` and drops `current` if there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Steps forward. `current` is the live state, kept for undo.
    ///
    /// This push is not subject to the cap: redo only revisits states that were
    /// reachable by undo a moment ago.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    /// Returns true if there are snapshots that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are snapshots that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn undo_stack(&self) -> impl Iterator<Item = &Snapshot> {
        self.undo_stack.iter()
    }

    /// Clear the history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
