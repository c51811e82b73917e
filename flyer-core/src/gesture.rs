//! # Gesture Transforms
//!
//! Turns raw touch and mouse input into selection, dragging and
//! two-finger rotate/scale edits.
//!
//! Live movement mutates the editor state directly each frame; when the
//! gesture ends, the whole interaction is committed as one undoable
//! command built from the gesture-start and final values.
//!
//! ```text
//! Idle ──contact──▶ Single ──2nd contact──▶ Dual
//!   ▲                 │  ▲                    │
//!   └──────release────┘  └──contact lifted────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::editor::EditorState;
use crate::element::{ElementId, Position, Transform};
use crate::error::EditorResult;
use crate::event::{InputEvent, MouseButton, MouseEvent, TouchEvent, TouchPhase};
use crate::history::CommandHistory;

/// Contact identifier used for synthesized mouse input.
const MOUSE_CONTACT: u32 = u32::MAX;

/// Configuration for gesture handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Distance in pixels within which a dragged element snaps onto the
    /// canvas horizontal center.
    pub snap_threshold: f32,
    /// How long the center guide stays visible, in milliseconds.
    pub guide_duration_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 5.0,
            guide_duration_ms: 1000,
        }
    }
}

/// A transient vertical guide shown while a dragged element sits on the
/// canvas horizontal center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapGuide {
    /// X position of the guide line.
    pub x: f32,
    /// When the guide (re)appeared, in milliseconds since session start.
    pub shown_at_ms: u64,
}

/// The controller's current state-machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    /// No active contacts.
    Idle,
    /// One contact down, dragging.
    Single,
    /// Two contacts down, rotating and scaling.
    Dual,
}

/// Result of processing one input event.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureUpdate {
    /// The contact selected an element or cleared the selection.
    Selected(Option<ElementId>),

    /// An element followed a one-contact drag.
    Moved {
        /// The dragged element.
        id: ElementId,
        /// Its position after this frame.
        position: Position,
        /// Whether it snapped onto the canvas center this frame.
        snapped: bool,
    },

    /// An element followed a two-contact rotate/scale.
    Transformed {
        /// The transformed element.
        id: ElementId,
        /// Its transform after this frame.
        transform: Transform,
    },

    /// The gesture ended. `committed` tells whether an undoable command
    /// was recorded.
    Finished {
        /// Whether a command was pushed to the history.
        committed: bool,
    },

    /// No action needed.
    None,
}

/// Element geometry captured when a gesture starts, used as the `old`
/// side of the committed command.
#[derive(Debug, Clone, Copy)]
struct GestureStart {
    position: Position,
    transform: Transform,
}

/// Baselines captured when the second contact lands.
#[derive(Debug, Clone, Copy)]
struct DualBaseline {
    /// The two contact ids, in the order they landed.
    ids: (u32, u32),
    /// Inter-contact angle at capture, in degrees.
    angle_degrees: f32,
    /// Inter-contact distance at capture, in pixels.
    distance: f32,
    /// The element's transform when the second contact landed. Deltas
    /// compose against this, never frame over frame.
    transform: Transform,
}

#[derive(Debug, Clone, Copy)]
struct Contact {
    id: u32,
    x: f32,
    y: f32,
}

/// Gesture controller driving selection, movement and rotate/scale.
#[derive(Debug)]
pub struct GestureController {
    config: GestureConfig,
    phase: GesturePhase,
    /// Active contacts, in the order they landed. At most two are
    /// tracked; further contacts are ignored.
    contacts: Vec<Contact>,
    target: Option<ElementId>,
    start: Option<GestureStart>,
    baseline: Option<DualBaseline>,
    guide: Option<SnapGuide>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    /// Create a controller with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    /// Create a controller with a custom configuration.
    #[must_use]
    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            config,
            phase: GesturePhase::Idle,
            contacts: Vec::new(),
            target: None,
            start: None,
            baseline: None,
            guide: None,
        }
    }

    /// Get the current configuration.
    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the configuration.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// The current state-machine phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// The element the current gesture manipulates, if any.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        self.target
    }

    /// The snap guide if one is visible at `now_ms`, honoring the
    /// configured auto-dismiss duration.
    #[must_use]
    pub fn active_guide(&self, now_ms: u64) -> Option<SnapGuide> {
        self.guide
            .filter(|g| now_ms.saturating_sub(g.shown_at_ms) < self.config.guide_duration_ms)
    }

    /// Process any input event.
    ///
    /// # Errors
    ///
    /// Returns an error if a state mutation or the commit fails; the
    /// gesture session is discarded either way.
    pub fn process(
        &mut self,
        event: &InputEvent,
        state: &mut EditorState,
        history: &mut CommandHistory,
    ) -> EditorResult<GestureUpdate> {
        match event {
            InputEvent::Touch(touch) => self.process_touch(touch, state, history),
            InputEvent::Mouse(mouse) => self.process_mouse(mouse, state, history),
            InputEvent::FocusLost => self.finish(state, history),
        }
    }

    /// Process a touch event.
    ///
    /// # Errors
    ///
    /// Returns an error if a state mutation or the commit fails.
    pub fn process_touch(
        &mut self,
        event: &TouchEvent,
        state: &mut EditorState,
        history: &mut CommandHistory,
    ) -> EditorResult<GestureUpdate> {
        match event.phase {
            TouchPhase::Start => {
                let mut update = GestureUpdate::None;
                for touch in &event.touches {
                    if self.contact_index(touch.id).is_some() {
                        continue;
                    }
                    update = self.contact_down(touch.id, touch.x, touch.y, state)?;
                }
                Ok(update)
            }
            TouchPhase::Move => match self.phase {
                GesturePhase::Idle => Ok(GestureUpdate::None),
                GesturePhase::Single => self.single_move(event, state),
                GesturePhase::Dual => self.dual_move(event, state),
            },
            TouchPhase::End => {
                // The event carries the contacts still down; everything
                // else has lifted.
                self.contacts.retain(|c| event.touch(c.id).is_some());
                for contact in &mut self.contacts {
                    if let Some(touch) = event.touch(contact.id) {
                        contact.x = touch.x;
                        contact.y = touch.y;
                    }
                }
                if self.contacts.is_empty() {
                    self.finish(state, history)
                } else {
                    // Dual degraded to a one-contact drag.
                    self.phase = GesturePhase::Single;
                    self.baseline = None;
                    Ok(GestureUpdate::None)
                }
            }
            TouchPhase::Cancel => self.finish(state, history),
        }
    }

    /// Process a desktop mouse event. Primary-button drags behave
    /// exactly like one-finger drags.
    ///
    /// # Errors
    ///
    /// Returns an error if a state mutation or the commit fails.
    pub fn process_mouse(
        &mut self,
        event: &MouseEvent,
        state: &mut EditorState,
        history: &mut CommandHistory,
    ) -> EditorResult<GestureUpdate> {
        if event.button != MouseButton::Primary {
            return Ok(GestureUpdate::None);
        }
        let synthetic = TouchEvent::new(
            event.phase,
            match event.phase {
                // End carries the remaining contacts, so lift means empty.
                TouchPhase::End | TouchPhase::Cancel => Vec::new(),
                _ => vec![crate::event::TouchPoint::new(MOUSE_CONTACT, event.x, event.y)],
            },
            event.timestamp_ms,
        );
        self.process_touch(&synthetic, state, history)
    }

    fn contact_index(&self, id: u32) -> Option<usize> {
        self.contacts.iter().position(|c| c.id == id)
    }

    fn contact_down(
        &mut self,
        id: u32,
        x: f32,
        y: f32,
        state: &mut EditorState,
    ) -> EditorResult<GestureUpdate> {
        match self.phase {
            GesturePhase::Idle => {
                self.contacts.push(Contact { id, x, y });
                self.phase = GesturePhase::Single;

                let hit = state.element_at(x, y);
                state.set_selected(hit)?;
                self.target = hit;
                self.start = hit.and_then(|eid| state.get(eid)).map(|e| GestureStart {
                    position: e.position,
                    transform: e.transform,
                });
                tracing::debug!(target = ?self.target, "gesture started");
                Ok(GestureUpdate::Selected(hit))
            }
            GesturePhase::Single => {
                let Some(target) = self.target else {
                    return Ok(GestureUpdate::None);
                };
                let Some(element) = state.get(target) else {
                    return Ok(GestureUpdate::None);
                };
                let Some(first) = self.contacts.first().copied() else {
                    return Ok(GestureUpdate::None);
                };

                let transform = element.transform;
                self.contacts.push(Contact { id, x, y });
                self.baseline = Some(DualBaseline {
                    ids: (first.id, id),
                    angle_degrees: angle_degrees(first.x, first.y, x, y),
                    distance: distance(first.x, first.y, x, y),
                    transform,
                });
                self.phase = GesturePhase::Dual;
                tracing::debug!(target = %target, "dual baselines captured");
                Ok(GestureUpdate::None)
            }
            // A third contact never joins a gesture.
            GesturePhase::Dual => Ok(GestureUpdate::None),
        }
    }

    fn single_move(
        &mut self,
        event: &TouchEvent,
        state: &mut EditorState,
    ) -> EditorResult<GestureUpdate> {
        let Some((x, y)) = self.contacts.first().map(|c| c.id).and_then(|id| {
            event.touch(id).map(|t| (t.x, t.y))
        }) else {
            return Ok(GestureUpdate::None);
        };
        let Some(contact) = self.contacts.first_mut() else {
            return Ok(GestureUpdate::None);
        };
        let dx = x - contact.x;
        let dy = y - contact.y;
        contact.x = x;
        contact.y = y;

        let Some(id) = self.target else {
            return Ok(GestureUpdate::None);
        };

        let canvas_center = state.canvas_width() / 2.0;
        let threshold = self.config.snap_threshold;
        let mut snapped = false;
        let mut position = Position::default();
        state.update(id, |element| {
            let mut next = element.position.offset(dx, dy);
            let center_x = next.x + element.size.width / 2.0;
            if (center_x - canvas_center).abs() <= threshold {
                next.x = canvas_center - element.size.width / 2.0;
                snapped = true;
            }
            element.position = next;
            position = next;
        })?;

        if snapped {
            self.guide = Some(SnapGuide {
                x: canvas_center,
                shown_at_ms: event.timestamp_ms,
            });
        }
        Ok(GestureUpdate::Moved {
            id,
            position,
            snapped,
        })
    }

    fn dual_move(
        &mut self,
        event: &TouchEvent,
        state: &mut EditorState,
    ) -> EditorResult<GestureUpdate> {
        let Some(baseline) = self.baseline else {
            return Ok(GestureUpdate::None);
        };
        let Some(id) = self.target else {
            return Ok(GestureUpdate::None);
        };

        for contact in &mut self.contacts {
            if let Some(touch) = event.touch(contact.id) {
                contact.x = touch.x;
                contact.y = touch.y;
            }
        }
        let (Some(a), Some(b)) = (
            self.contact_index(baseline.ids.0).map(|i| self.contacts[i]),
            self.contact_index(baseline.ids.1).map(|i| self.contacts[i]),
        ) else {
            return Ok(GestureUpdate::None);
        };

        let current_distance = distance(a.x, a.y, b.x, b.y);
        // Coincident contacts have no usable angle or scale; skip the
        // frame rather than divide by zero.
        if baseline.distance <= f32::EPSILON || current_distance <= f32::EPSILON {
            return Ok(GestureUpdate::None);
        }

        let rotation_delta = angle_degrees(a.x, a.y, b.x, b.y) - baseline.angle_degrees;
        let scale_factor = current_distance / baseline.distance;
        let transform = Transform::new(
            baseline.transform.rotation_degrees + rotation_delta,
            baseline.transform.scale * scale_factor,
        );

        state.update(id, |element| element.transform = transform)?;
        Ok(GestureUpdate::Transformed { id, transform })
    }

    /// Finish the gesture: commit one command covering everything the
    /// gesture changed, then return to idle.
    fn finish(
        &mut self,
        state: &mut EditorState,
        history: &mut CommandHistory,
    ) -> EditorResult<GestureUpdate> {
        if self.phase == GesturePhase::Idle {
            return Ok(GestureUpdate::None);
        }

        let target = self.target.take();
        let start = self.start.take();
        self.contacts.clear();
        self.baseline = None;
        self.phase = GesturePhase::Idle;

        let (Some(id), Some(start)) = (target, start) else {
            return Ok(GestureUpdate::Finished { committed: false });
        };
        let Some(element) = state.get(id) else {
            return Ok(GestureUpdate::Finished { committed: false });
        };

        let mut commands = Vec::new();
        if element.position != start.position {
            commands.push(Command::Move {
                id,
                old: start.position,
                new: element.position,
            });
        }
        if element.transform != start.transform {
            commands.push(Command::Transform {
                id,
                old: start.transform,
                new: element.transform,
            });
        }

        let command = match commands.len() {
            0 => None,
            1 => commands.pop(),
            _ => Some(Command::batch(commands)),
        };
        let Some(command) = command else {
            return Ok(GestureUpdate::Finished { committed: false });
        };

        tracing::debug!(target = %id, command = command.name(), "gesture committed");
        history.execute(command, state)?;
        Ok(GestureUpdate::Finished { committed: true })
    }
}

fn angle_degrees(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    (by - ay).atan2(bx - ax).to_degrees()
}

fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
}
