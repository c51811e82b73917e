//! Reversible editing commands.
//!
//! Every user-visible edit is expressed as a [`Command`] carrying both
//! its forward and inverse data, so undo never has to re-derive state.

use serde::{Deserialize, Serialize};

use crate::editor::EditorState;
use crate::element::{Element, ElementId, ElementStyle, FontStyle, FontWeight, Position, Transform};
use crate::error::{EditorError, EditorResult};

/// A reversible change to a single style property, carrying the value
/// on both sides of the edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "data", rename_all = "snake_case")]
pub enum StyleChange {
    /// Font size in pixels.
    FontSize {
        /// Value before the edit.
        old: f32,
        /// Value after the edit.
        new: f32,
    },
    /// Font weight.
    Weight {
        /// Value before the edit.
        old: FontWeight,
        /// Value after the edit.
        new: FontWeight,
    },
    /// Font slant.
    Slant {
        /// Value before the edit.
        old: FontStyle,
        /// Value after the edit.
        new: FontStyle,
    },
    /// Text color.
    Color {
        /// Value before the edit.
        old: String,
        /// Value after the edit.
        new: String,
    },
    /// Background color.
    Background {
        /// Value before the edit.
        old: Option<String>,
        /// Value after the edit.
        new: Option<String>,
    },
    /// Opacity.
    Opacity {
        /// Value before the edit.
        old: f32,
        /// Value after the edit.
        new: f32,
    },
}

impl StyleChange {
    fn apply_to(&self, style: &mut ElementStyle) {
        match self {
            Self::FontSize { new, .. } => style.font_size = *new,
            Self::Weight { new, .. } => style.weight = *new,
            Self::Slant { new, .. } => style.style = *new,
            Self::Color { new, .. } => style.color = new.clone(),
            Self::Background { new, .. } => style.background = new.clone(),
            Self::Opacity { new, .. } => style.opacity = *new,
        }
    }

    fn revert_on(&self, style: &mut ElementStyle) {
        match self {
            Self::FontSize { old, .. } => style.font_size = *old,
            Self::Weight { old, .. } => style.weight = *old,
            Self::Slant { old, .. } => style.style = *old,
            Self::Color { old, .. } => style.color = old.clone(),
            Self::Background { old, .. } => style.background = old.clone(),
            Self::Opacity { old, .. } => style.opacity = *old,
        }
    }
}

/// A reversible editing command.
///
/// Commands carry everything needed for both directions. A remove
/// finalizes its stacking slot as it applies, so removes batched
/// against one starting state still record the slots they actually
/// vacate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "lowercase")]
pub enum Command {
    /// Move an element between two positions.
    Move {
        /// Target element.
        id: ElementId,
        /// Position before the move.
        old: Position,
        /// Position after the move.
        new: Position,
    },

    /// Rotate/scale an element between two transforms.
    Transform {
        /// Target element.
        id: ElementId,
        /// Transform before the gesture.
        old: Transform,
        /// Transform after the gesture.
        new: Transform,
    },

    /// Change one style property of an element.
    Style {
        /// Target element.
        id: ElementId,
        /// The property edit, with both sides captured.
        change: StyleChange,
    },

    /// Insert an element as topmost. Redo re-inserts the identical
    /// element, so its id survives remove/undo/redo cycles.
    Insert {
        /// The element to insert, id already assigned.
        element: Box<Element>,
    },

    /// Remove an element, remembering its stacking slot so undo puts it
    /// back exactly where it was.
    Remove {
        /// The removed element.
        element: Box<Element>,
        /// Stacking index the element occupied, recorded at the moment
        /// the removal applies.
        index: usize,
    },

    /// A group of commands applied in order and reverted in strict
    /// reverse order.
    Batch(Vec<Command>),
}

impl Command {
    /// Build an insert command for a fully constructed element.
    #[must_use]
    pub fn insert(element: Element) -> Self {
        Self::Insert {
            element: Box::new(element),
        }
    }

    /// Build a remove command, capturing the element from the state.
    /// The stacking index recorded here is provisional: applying the
    /// command re-reads it at removal time, so earlier removes in a
    /// batch cannot leave it stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn remove(state: &EditorState, id: ElementId) -> EditorResult<Self> {
        let mut element = state
            .get(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?
            .clone();
        element.selected = false;
        let index = state
            .stacking_index(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        Ok(Self::Remove {
            element: Box::new(element),
            index,
        })
    }

    /// Build a batch from a list of commands.
    #[must_use]
    pub fn batch(commands: Vec<Command>) -> Self {
        Self::Batch(commands)
    }

    /// Short name of the command variant, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Transform { .. } => "transform",
            Self::Style { .. } => "style",
            Self::Insert { .. } => "insert",
            Self::Remove { .. } => "remove",
            Self::Batch(_) => "batch",
        }
    }

    /// Apply the command's forward direction to the state. A remove
    /// records the stacking index its element occupies right now, which
    /// [`Command::revert`] later uses to re-insert it.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced element is missing or an insert
    /// is rejected; the state is left as the failing step found it.
    pub fn apply(&mut self, state: &mut EditorState) -> EditorResult<()> {
        match self {
            Self::Move { id, new, .. } => state.update(*id, |e| e.position = *new),
            Self::Transform { id, new, .. } => state.update(*id, |e| e.transform = *new),
            Self::Style { id, change } => state.update(*id, |e| change.apply_to(&mut e.style)),
            Self::Insert { element } => state.insert((**element).clone()).map(|_| ()),
            Self::Remove { element, index } => {
                *index = state
                    .stacking_index(element.id)
                    .ok_or_else(|| EditorError::ElementNotFound(element.id.to_string()))?;
                state.remove(element.id).map(|_| ())
            }
            Self::Batch(commands) => {
                for command in commands.iter_mut() {
                    command.apply(state)?;
                }
                Ok(())
            }
        }
    }

    /// Apply the command's inverse direction to the state. Batches
    /// revert their inner commands in reverse order.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced element is missing; reverting a
    /// batch stops at the first failing step.
    pub fn revert(&self, state: &mut EditorState) -> EditorResult<()> {
        match self {
            Self::Move { id, old, .. } => state.update(*id, |e| e.position = *old),
            Self::Transform { id, old, .. } => state.update(*id, |e| e.transform = *old),
            Self::Style { id, change } => state.update(*id, |e| change.revert_on(&mut e.style)),
            Self::Insert { element } => state.remove(element.id).map(|_| ()),
            Self::Remove { element, index } => {
                state.insert_at((**element).clone(), *index).map(|_| ())
            }
            Self::Batch(commands) => {
                for command in commands.iter().rev() {
                    command.revert(state)?;
                }
                Ok(())
            }
        }
    }
}
