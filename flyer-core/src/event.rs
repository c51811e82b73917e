//! Input events for canvas interaction.

use serde::{Deserialize, Serialize};

/// Phase of a contact event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Contact started (finger or button down).
    Start,
    /// Contact moved (dragging).
    Move,
    /// Contact ended (finger or button up).
    End,
    /// Contact cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier, stable across the frames of one contact.
    pub id: u32,
    /// X position in canvas coordinates.
    pub x: f32,
    /// Y position in canvas coordinates.
    pub y: f32,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// A touch event carrying the full set of active contacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds since session start.
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
        }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Find a touch point by its identifier.
    #[must_use]
    pub fn touch(&self, id: u32) -> Option<&TouchPoint> {
        self.touches.iter().find(|t| t.id == id)
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    /// The primary (usually left) button.
    #[default]
    Primary,
    /// The secondary (usually right) button.
    Secondary,
    /// The middle button or wheel.
    Middle,
}

/// A desktop pointer event, expressed in the same phase vocabulary as
/// touch input so both feed one gesture path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// Phase of this pointer event.
    pub phase: TouchPhase,
    /// X position in canvas coordinates.
    pub x: f32,
    /// Y position in canvas coordinates.
    pub y: f32,
    /// Which button drives the event.
    pub button: MouseButton,
    /// Timestamp in milliseconds since session start.
    pub timestamp_ms: u64,
}

impl MouseEvent {
    /// Create a new mouse event.
    #[must_use]
    pub fn new(phase: TouchPhase, x: f32, y: f32, button: MouseButton, timestamp_ms: u64) -> Self {
        Self {
            phase,
            x,
            y,
            button,
            timestamp_ms,
        }
    }
}

/// All input events the editor can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InputEvent {
    /// Raw touch event.
    Touch(TouchEvent),

    /// Desktop pointer event.
    Mouse(MouseEvent),

    /// The host window lost input focus; any in-flight gesture ends.
    FocusLost,
}
