//! # Document Schema
//!
//! Serializable document types for saving and restoring flyers.
//!
//! The on-disk shape is decoupled from the in-memory types so either
//! side can evolve: documents tolerate missing optional fields via
//! serde defaults, and importing validates everything before any state
//! is touched.

use serde::{Deserialize, Serialize};

use crate::editor::{EditorState, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::element::{Element, ElementKind, ElementStyle, Position, Size, Transform};
use crate::error::{EditorError, EditorResult};

/// Schema version written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

fn default_version() -> u32 {
    SCHEMA_VERSION
}

fn default_width() -> f32 {
    320.0
}

fn default_height() -> f32 {
    40.0
}

fn default_scale() -> f32 {
    1.0
}

/// One element as stored in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDocument {
    /// Element identifier as a UUID string.
    pub id: String,
    /// The slot this element fills.
    pub kind: ElementKind,
    /// Left edge in canvas coordinates.
    pub x: f32,
    /// Top edge in canvas coordinates.
    pub y: f32,
    /// Unscaled width in pixels.
    #[serde(default = "default_width")]
    pub width: f32,
    /// Unscaled height in pixels.
    #[serde(default = "default_height")]
    pub height: f32,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Uniform scale factor.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Visual style.
    #[serde(default)]
    pub style: ElementStyle,
}

impl ElementDocument {
    /// Convert back into an editor element.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidDocument`] if the stored id is not
    /// a valid UUID or the geometry is not finite.
    pub fn into_element(self) -> EditorResult<Element> {
        let id = crate::element::ElementId::parse(&self.id).map_err(|e| {
            EditorError::InvalidDocument(format!("bad element id `{}`: {e}", self.id))
        })?;
        let values = [
            self.x,
            self.y,
            self.width,
            self.height,
            self.rotation,
            self.scale,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EditorError::InvalidDocument(format!(
                "non-finite geometry on element {}",
                self.id
            )));
        }
        Ok(Element {
            id,
            kind: self.kind,
            position: Position::new(self.x, self.y),
            size: Size::new(self.width, self.height),
            transform: Transform::new(self.rotation, self.scale),
            style: self.style,
            selected: false,
        })
    }
}

impl From<&Element> for ElementDocument {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.to_string(),
            kind: element.kind.clone(),
            x: element.position.x,
            y: element.position.y,
            width: element.size.width,
            height: element.size.height,
            rotation: element.transform.rotation_degrees,
            scale: element.transform.scale,
            style: element.style.clone(),
        }
    }
}

/// Canvas dimensions as stored in a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

/// A complete flyer document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyerDocument {
    /// Schema version, for forward compatibility.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Canvas dimensions.
    #[serde(default)]
    pub canvas: CanvasDocument,
    /// Canvas background color or image URI, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Elements from bottom to top of the stacking order.
    #[serde(default)]
    pub elements: Vec<ElementDocument>,
    /// When the document was exported, in milliseconds.
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl FlyerDocument {
    /// Capture the current editor state as a document.
    #[must_use]
    pub fn from_state(state: &EditorState, timestamp_ms: u64) -> Self {
        Self {
            version: SCHEMA_VERSION,
            canvas: CanvasDocument {
                width: state.canvas_width(),
                height: state.canvas_height(),
            },
            background: state.background().map(str::to_owned),
            elements: state.elements().map(ElementDocument::from).collect(),
            timestamp_ms,
        }
    }

    /// Build a fresh editor state from this document.
    ///
    /// Elements are inserted bottom to top, so the usual insertion
    /// rules (unique ids, logo limit) apply to loaded documents too.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidDocument`] for unsupported
    /// versions, bad canvas geometry or malformed elements, and
    /// [`EditorError::InvalidOperation`] if the elements violate an
    /// insertion rule.
    pub fn into_state(self) -> EditorResult<EditorState> {
        if self.version > SCHEMA_VERSION {
            return Err(EditorError::InvalidDocument(format!(
                "unsupported schema version {} (newest known is {SCHEMA_VERSION})",
                self.version
            )));
        }
        let (width, height) = (self.canvas.width, self.canvas.height);
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(EditorError::InvalidDocument(format!(
                "bad canvas dimensions {width}x{height}"
            )));
        }

        let mut state = EditorState::with_canvas_size(width, height);
        state.set_background(self.background);
        for document in self.elements {
            state.insert(document.into_element()?)?;
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementId;

    fn sample_state() -> EditorState {
        let mut state = EditorState::new();
        state
            .insert(
                Element::new(ElementKind::Title).with_position(Position::new(200.0, 100.0)),
            )
            .expect("insert title");
        state
            .insert(
                Element::new(ElementKind::Speaker)
                    .with_position(Position::new(240.0, 300.0))
                    .with_transform(Transform::new(15.0, 1.5)),
            )
            .expect("insert speaker");
        state.set_background(Some("#204060".to_string()));
        state
    }

    #[test]
    fn test_document_round_trip_preserves_elements() {
        let state = sample_state();
        let document = FlyerDocument::from_state(&state, 42);

        let json = serde_json::to_string(&document).expect("serialize");
        let parsed: FlyerDocument = serde_json::from_str(&json).expect("parse");
        let restored = parsed.into_state().expect("into state");

        assert_eq!(restored.element_count(), 2);
        assert_eq!(restored.background(), Some("#204060"));

        let original: Vec<&Element> = state.elements().collect();
        let loaded: Vec<&Element> = restored.elements().collect();
        for (a, b) in original.iter().zip(&loaded) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.position, b.position);
            assert_eq!(a.transform, b.transform);
            assert_eq!(a.style, b.style);
        }
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = format!(
            r#"{{"id":"{}","kind":{{"type":"topic"}},"x":10.0,"y":20.0}}"#,
            ElementId::new()
        );
        let document: ElementDocument = serde_json::from_str(&json).expect("parse");
        let element = document.into_element().expect("element");

        assert!((element.size.width - 320.0).abs() < f32::EPSILON);
        assert!((element.size.height - 40.0).abs() < f32::EPSILON);
        assert!(element.transform.is_identity());
        assert!((element.style.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bad_element_id_is_rejected() {
        let document = ElementDocument {
            id: "not-a-uuid".to_string(),
            kind: ElementKind::Title,
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 40.0,
            rotation: 0.0,
            scale: 1.0,
            style: ElementStyle::default(),
        };
        let result = document.into_element();
        assert!(matches!(result, Err(EditorError::InvalidDocument(_))));
    }

    #[test]
    fn test_non_finite_geometry_is_rejected() {
        let document = ElementDocument {
            id: ElementId::new().to_string(),
            kind: ElementKind::Title,
            x: f32::NAN,
            y: 0.0,
            width: 100.0,
            height: 40.0,
            rotation: 0.0,
            scale: 1.0,
            style: ElementStyle::default(),
        };
        assert!(matches!(
            document.into_element(),
            Err(EditorError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let document = FlyerDocument {
            version: SCHEMA_VERSION + 1,
            canvas: CanvasDocument::default(),
            background: None,
            elements: Vec::new(),
            timestamp_ms: 0,
        };
        assert!(matches!(
            document.into_state(),
            Err(EditorError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected_on_load() {
        let element = ElementDocument::from(&Element::new(ElementKind::Title));
        let document = FlyerDocument {
            version: SCHEMA_VERSION,
            canvas: CanvasDocument::default(),
            background: None,
            elements: vec![element.clone(), element],
            timestamp_ms: 0,
        };
        assert!(document.into_state().is_err());
    }

    #[test]
    fn test_import_replaces_content_and_keeps_observers() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let exported = sample_state().export_json(7).expect("export");

        let mut state = EditorState::new();
        state
            .insert(Element::new(ElementKind::Food))
            .expect("insert");
        let notified = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&notified);
        state.subscribe(move |_| *seen.borrow_mut() += 1);

        state.import_json(&exported).expect("import");

        assert_eq!(state.element_count(), 2);
        assert_eq!(state.selected(), None);
        assert_eq!(state.background(), Some("#204060"));
        assert_eq!(*notified.borrow(), 1);
    }

    #[test]
    fn test_bad_import_leaves_state_untouched() {
        let mut state = sample_state();

        let err = state.import_json(r#"{"version": 99}"#);
        assert!(matches!(err, Err(EditorError::InvalidDocument(_))));
        assert_eq!(state.element_count(), 2);

        let err = state.import_json("not json at all");
        assert!(matches!(err, Err(EditorError::Serialization(_))));
        assert_eq!(state.element_count(), 2);
    }

    #[test]
    fn test_stacking_order_survives_round_trip() {
        let mut state = EditorState::new();
        let bottom = state
            .insert(Element::new(ElementKind::Title))
            .expect("insert");
        let top = state
            .insert(Element::new(ElementKind::Topic))
            .expect("insert");

        let document = FlyerDocument::from_state(&state, 0);
        let restored = document.into_state().expect("into state");

        assert_eq!(restored.stacking_index(bottom), Some(0));
        assert_eq!(restored.stacking_index(top), Some(1));
    }
}
