//! Bounded undo/redo history over editing commands.

use std::collections::VecDeque;

use serde::Serialize;

use crate::command::Command;
use crate::editor::EditorState;
use crate::error::EditorResult;

/// Default maximum number of undoable commands retained.
pub const HISTORY_LIMIT: usize = 50;

/// Undo/redo availability, delivered to listeners after every stack
/// change so UI affordances never have to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryStatus {
    /// Whether at least one command can be undone.
    pub can_undo: bool,
    /// Whether at least one command can be redone.
    pub can_redo: bool,
}

/// Handle returned by [`CommandHistory::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ListenerFn = Box<dyn Fn(HistoryStatus)>;

/// Undo/redo stacks with a bounded capacity.
///
/// Executing a new command clears the redo stack; exceeding the
/// capacity evicts the oldest undoable entry (first in, first out).
pub struct CommandHistory {
    undo_stack: VecDeque<Command>,
    redo_stack: Vec<Command>,
    limit: usize,
    listeners: Vec<(ListenerId, ListenerFn)>,
    next_listener: u64,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("limit", &self.limit)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CommandHistory {
    /// Create a history with the standard capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// Create a history retaining at most `limit` undoable commands.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Apply a command and record it for undo. Any redoable commands
    /// are discarded.
    ///
    /// # Errors
    ///
    /// Returns the command's own error if applying fails; the stacks
    /// are left unchanged in that case.
    pub fn execute(&mut self, mut command: Command, state: &mut EditorState) -> EditorResult<()> {
        command.apply(state)?;
        tracing::debug!(command = command.name(), "executed command");

        self.undo_stack.push_back(command);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        self.notify();
        Ok(())
    }

    /// Undo the most recent command. Returns `false` if there is
    /// nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns an error if reverting fails. The failed entry is dropped
    /// rather than re-queued, so the history never records a partially
    /// undone command.
    pub fn undo(&mut self, state: &mut EditorState) -> EditorResult<bool> {
        let Some(command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        match command.revert(state) {
            Ok(()) => {
                tracing::debug!(command = command.name(), "undid command");
                self.redo_stack.push(command);
                self.notify();
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(command = command.name(), error = %e, "undo failed, dropping entry");
                self.notify();
                Err(e)
            }
        }
    }

    /// Redo the most recently undone command. Returns `false` if there
    /// is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns an error if re-applying fails. The failed entry is
    /// dropped rather than re-queued.
    pub fn redo(&mut self, state: &mut EditorState) -> EditorResult<bool> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        match command.apply(state) {
            Ok(()) => {
                tracing::debug!(command = command.name(), "redid command");
                self.undo_stack.push_back(command);
                self.notify();
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(command = command.name(), error = %e, "redo failed, dropping entry");
                self.notify();
                Err(e)
            }
        }
    }

    /// Drop all undo and redo entries. Used on canvas reset.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify();
    }

    /// Whether at least one command can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether at least one command can be redone.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable commands currently retained.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redoable commands currently retained.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Current undo/redo availability.
    #[must_use]
    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Register a listener invoked with the availability after every
    /// stack mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(HistoryStatus) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() < before
    }

    fn notify(&self) {
        let status = self.status();
        for (_, listener) in &self.listeners {
            listener(status);
        }
    }
}
