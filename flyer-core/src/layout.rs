//! Safe-area geometry and standard flyer layout.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::editor::EditorState;
use crate::element::{Element, ElementKind, Position};

/// Top inset of the margin-derived fallback text box, as a fraction of
/// the canvas height.
pub const FALLBACK_TOP: f32 = 0.05;

/// Bottom edge of the fallback text box, as a fraction of the canvas
/// height.
pub const FALLBACK_BOTTOM: f32 = 0.85;

/// Side inset of the fallback text box, as a fraction of the canvas
/// width.
pub const FALLBACK_SIDES: f32 = 0.15;

/// Vertical gap between stacked text elements.
pub const ARRANGE_SPACING: f32 = 10.0;

/// Vertical distance between stacked logo slots.
pub const LOGO_SLOT_STEP: f32 = 100.0;

/// A rectangle of the canvas judged safe for overlaying text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeArea {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl SafeArea {
    /// Create a safe area.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check whether a point falls inside this area.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Horizontal center of the area.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Surface in square pixels, for picking the roomiest candidate.
    #[must_use]
    pub fn surface(&self) -> f32 {
        self.width * self.height
    }
}

/// The margin-derived default text box for a canvas of the given size,
/// used when brightness analysis finds no safe region.
#[must_use]
pub fn fallback_area(canvas_width: f32, canvas_height: f32) -> SafeArea {
    let x = canvas_width * FALLBACK_SIDES;
    let y = canvas_height * FALLBACK_TOP;
    SafeArea::new(
        x,
        y,
        canvas_width - 2.0 * x,
        canvas_height * FALLBACK_BOTTOM - y,
    )
}

fn slot_y(kind: &ElementKind) -> f32 {
    match kind {
        ElementKind::Title => 100.0,
        ElementKind::Topic => 200.0,
        ElementKind::Speaker => 300.0,
        ElementKind::Time => 400.0,
        ElementKind::Location => 500.0,
        ElementKind::Food => 600.0,
        ElementKind::Logo { .. } => 700.0,
    }
}

/// Create an element of the given kind at its standard flyer slot,
/// horizontally centered. Logos land on the first logo slot; use
/// [`logo_element`] to stack several.
#[must_use]
pub fn standard_element(kind: ElementKind, canvas_width: f32) -> Element {
    let element = Element::new(kind);
    let x = (canvas_width - element.size.width) / 2.0;
    let y = slot_y(&element.kind);
    element.with_position(Position::new(x, y))
}

/// Create a logo element stacked below `existing_logos` others,
/// horizontally centered.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn logo_element(src: String, existing_logos: usize, canvas_width: f32) -> Element {
    let element = Element::new(ElementKind::Logo { src });
    let x = (canvas_width - element.size.width) / 2.0;
    let y = slot_y(&element.kind) + existing_logos as f32 * LOGO_SLOT_STEP;
    element.with_position(Position::new(x, y))
}

/// Build one batch that stacks the text elements top-down inside the
/// area, horizontally centered with a fixed gap, preserving stacking
/// order. Returns `None` when every text element already sits where the
/// arrangement would put it.
#[must_use]
pub fn arrange_in_area(state: &EditorState, area: &SafeArea) -> Option<Command> {
    let mut y = area.y;
    let mut moves = Vec::new();
    for element in state.elements().filter(|e| e.kind.is_text()) {
        let target = Position::new(area.x + (area.width - element.size.width) / 2.0, y);
        if (target.x - element.position.x).abs() > f32::EPSILON
            || (target.y - element.position.y).abs() > f32::EPSILON
        {
            moves.push(Command::Move {
                id: element.id,
                old: element.position,
                new: target,
            });
        }
        y += element.size.height + ARRANGE_SPACING;
    }
    if moves.is_empty() {
        None
    } else {
        Some(Command::batch(moves))
    }
}

/// Build one batch that inserts the desired text slots that are missing
/// and removes text elements whose kind is no longer desired. Logos are
/// untouched. Returns `None` when the state already matches.
#[must_use]
pub fn sync_text_elements(state: &EditorState, desired: &[ElementKind]) -> Option<Command> {
    let mut commands = Vec::new();

    for element in state.elements().filter(|e| e.kind.is_text()) {
        if !desired.contains(&element.kind) {
            if let Ok(command) = Command::remove(state, element.id) {
                commands.push(command);
            }
        }
    }

    let mut queued: Vec<&ElementKind> = Vec::new();
    for kind in desired.iter().filter(|k| k.is_text()) {
        let present = state.elements().any(|e| e.kind == *kind);
        if !present && !queued.contains(&kind) {
            queued.push(kind);
            commands.push(Command::insert(standard_element(
                kind.clone(),
                state.canvas_width(),
            )));
        }
    }

    if commands.is_empty() {
        None
    } else {
        Some(Command::batch(commands))
    }
}
