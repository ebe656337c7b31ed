//! Linear undo/redo over whole-set snapshots.
//!
//! The log always holds at least one snapshot, the state the document was
//! loaded in. `current_index` points at the snapshot matching the live set.
//!
//! # Example
//!
//! ```
//! use bbat::HistoryLog;
//!
//! let mut log: HistoryLog<Vec<u32>> = HistoryLog::new(vec![], 50);
//! log.push(vec![1]);
//! log.push(vec![1, 2]);
//!
//! assert_eq!(log.undo(), Some(&vec![1]));
//! assert_eq!(log.redo(), Some(&vec![1, 2]));
//! assert_eq!(log.redo(), None);
//! ```

/// Ordered snapshots with a cursor.
///
/// Invariant: `current_index < snapshots.len()`.
#[derive(Debug, Clone)]
pub struct HistoryLog<T: Clone + PartialEq> {
    snapshots: Vec<T>,
    current_index: usize,
    max_history: usize,
}

impl<T: Clone + PartialEq> HistoryLog<T> {
    /// Create a log whose only snapshot is `initial`.
    ///
    /// `max_history` is the number of snapshots kept, at least one.
    pub fn new(initial: T, max_history: usize) -> Self {
        Self {
            snapshots: vec![initial],
            current_index: 0,
            max_history: max_history.max(1),
        }
    }

    /// Record a new snapshot after the current one.
    ///
    /// Snapshots ahead of the cursor are discarded. A snapshot equal to the
    /// current one is ignored. Returns whether anything was recorded.
    pub fn push(&mut self, snapshot: T) -> bool {
        if self.snapshots[self.current_index] == snapshot {
            return false;
        }

        let discarded = self.snapshots.len() - self.current_index - 1;
        self.snapshots.truncate(self.current_index + 1);
        self.snapshots.push(snapshot);
        self.current_index += 1;

        // Limit history size
        while self.snapshots.len() > self.max_history {
            self.snapshots.remove(0);
            self.current_index -= 1;
        }

        if discarded > 0 {
            log::debug!("History: dropped {} redo snapshot(s)", discarded);
        }
        log::trace!(
            "History: push -> {}/{}",
            self.current_index + 1,
            self.snapshots.len()
        );
        true
    }

    /// Step back. Returns the snapshot to restore, or `None` at the start.
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.current_index -= 1;
        log::debug!("History: undo -> {}/{}", self.current_index + 1, self.snapshots.len());
        Some(&self.snapshots[self.current_index])
    }

    /// Step forward. Returns the snapshot to restore, or `None` at the end.
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.current_index += 1;
        log::debug!("History: redo -> {}/{}", self.current_index + 1, self.snapshots.len());
        Some(&self.snapshots[self.current_index])
    }

    /// Drop every snapshot and start over from `snapshot`.
    pub fn reset(&mut self, snapshot: T) {
        self.snapshots.clear();
        self.snapshots.push(snapshot);
        self.current_index = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.snapshots.len()
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> &T {
        &self.snapshots[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; the log holds at least one snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
