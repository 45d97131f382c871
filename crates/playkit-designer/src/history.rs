//! Undo/Redo manager for design mutations.
//!
//! Command-object history: the undo stack holds applied commands, the
//! redo stack holds reverted ones. Depth is bounded; the oldest entries
//! are evicted first. Any new mutation clears the redo stack (no
//! branching history).

use crate::commands::DesignCommand;
use crate::design::Design;

/// Default maximum undo depth.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Manages undo/redo stacks of design commands.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: Vec<DesignCommand>,
    redo_stack: Vec<DesignCommand>,
    max_depth: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    /// Create a new manager with the default depth.
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }

    /// Create with a custom maximum undo depth.
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record an already-applied command on the undo stack.
    ///
    /// Clears the redo stack and evicts the oldest entry when the depth
    /// bound is reached.
    pub fn record(&mut self, command: DesignCommand) {
        self.redo_stack.clear();
        self.undo_stack.push(command);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
    }

    /// Revert the most recent command against the design.
    ///
    /// Returns the name of the undone command, or `None` if the undo
    /// stack was empty.
    pub fn undo(&mut self, design: &mut Design) -> Option<String> {
        let mut command = self.undo_stack.pop()?;
        command.revert(design);
        let name = command.name().to_string();
        self.redo_stack.push(command);
        Some(name)
    }

    /// Re-apply the most recently undone command.
    pub fn redo(&mut self, design: &mut Design) -> Option<String> {
        let mut command = self.redo_stack.pop()?;
        command.apply(design);
        let name = command.name().to_string();
        self.undo_stack.push(command);
        Some(name)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history (used when loading a different design).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
