//! Editor state store - the authoritative model of a flyer design.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{EditorError, EditorResult};
use crate::layout::SafeArea;
use crate::{Element, ElementId};

/// Default canvas width in CSS pixels.
pub const CANVAS_WIDTH: f32 = 800.0;

/// Default canvas height in CSS pixels.
pub const CANVAS_HEIGHT: f32 = 1000.0;

/// Handle returned by [`EditorState::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type ObserverFn = Box<dyn Fn(&EditorSnapshot)>;

/// An immutable view of the editor state, delivered to observers after
/// every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSnapshot {
    /// Elements in stacking order (last is topmost).
    pub elements: Vec<Element>,
    /// Currently selected element, if any.
    pub selected: Option<ElementId>,
    /// Background image reference, if set.
    pub background: Option<String>,
    /// Canvas width in pixels.
    pub canvas_width: f32,
    /// Canvas height in pixels.
    pub canvas_height: f32,
    /// Detected safe text areas.
    pub safe_areas: Vec<SafeArea>,
}

/// The element state store.
///
/// Holds every element of the design keyed by id plus an explicit
/// stacking order, the current selection, the background reference and
/// the frozen initial snapshot of each element for [`EditorState::reset`].
/// Observers registered with [`EditorState::subscribe`] run synchronously
/// after each mutation.
pub struct EditorState {
    elements: HashMap<ElementId, Element>,
    /// Stacking order, bottom to top. The last entry is topmost.
    order: Vec<ElementId>,
    /// Snapshot of each element as it was first inserted.
    initial_states: HashMap<ElementId, Element>,
    selected: Option<ElementId>,
    background: Option<String>,
    canvas_width: f32,
    canvas_height: f32,
    safe_areas: Vec<SafeArea>,
    observers: Vec<(ObserverId, ObserverFn)>,
    next_observer: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorState")
            .field("elements", &self.order.len())
            .field("selected", &self.selected)
            .field("canvas_width", &self.canvas_width)
            .field("canvas_height", &self.canvas_height)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EditorState {
    /// Maximum number of logo elements a design may hold.
    pub const MAX_LOGOS: usize = 5;

    /// Create an empty state with the standard flyer canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::with_canvas_size(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    /// Create an empty state with a custom canvas size. Dimensions are
    /// fixed for the lifetime of the state.
    #[must_use]
    pub fn with_canvas_size(width: f32, height: f32) -> Self {
        Self {
            elements: HashMap::new(),
            order: Vec::new(),
            initial_states: HashMap::new(),
            selected: None,
            background: None,
            canvas_width: width,
            canvas_height: height,
            safe_areas: Vec::new(),
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn canvas_height(&self) -> f32 {
        self.canvas_height
    }

    /// Insert an element as topmost.
    ///
    /// # Errors
    ///
    /// Returns an error if an element with the same id already exists,
    /// or if the logo limit would be exceeded.
    pub fn insert(&mut self, element: Element) -> EditorResult<ElementId> {
        self.insert_at(element, usize::MAX)
    }

    /// Insert an element at a specific stacking index (clamped to the
    /// current element count). Used to restore a removed element at its
    /// recorded slot.
    ///
    /// # Errors
    ///
    /// Returns an error if an element with the same id already exists,
    /// or if the logo limit would be exceeded.
    pub fn insert_at(&mut self, element: Element, index: usize) -> EditorResult<ElementId> {
        if self.elements.contains_key(&element.id) {
            return Err(EditorError::InvalidOperation(format!(
                "element {} already exists",
                element.id
            )));
        }
        if element.kind.is_logo() && self.logo_count() >= Self::MAX_LOGOS {
            return Err(EditorError::InvalidOperation(format!(
                "logo limit of {} reached",
                Self::MAX_LOGOS
            )));
        }

        let id = element.id;
        let index = index.min(self.order.len());
        self.order.insert(index, id);
        self.initial_states
            .entry(id)
            .or_insert_with(|| element.clone());
        self.elements.insert(id, element);

        tracing::debug!(element = %id, index, "inserted element");
        self.notify();
        Ok(id)
    }

    /// Remove an element. If it was selected, the selection is cleared
    /// first. Returns the removed element with its selection flag reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn remove(&mut self, id: ElementId) -> EditorResult<Element> {
        let mut element = self
            .elements
            .remove(&id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        self.order.retain(|&eid| eid != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        element.selected = false;

        tracing::debug!(element = %id, "removed element");
        self.notify();
        Ok(element)
    }

    /// Apply a partial update to an element through a closure.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn update<F>(&mut self, id: ElementId, f: F) -> EditorResult<()>
    where
        F: FnOnce(&mut Element),
    {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        f(element);
        self.notify();
        Ok(())
    }

    /// Get an element by id.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// The element's current stacking index, if present.
    #[must_use]
    pub fn stacking_index(&self, id: ElementId) -> Option<usize> {
        self.order.iter().position(|&eid| eid == id)
    }

    /// Elements in stacking order, bottom to top.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Number of elements in the design.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.order.len()
    }

    /// Check if the design has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of logo elements in the design.
    #[must_use]
    pub fn logo_count(&self) -> usize {
        self.elements().filter(|e| e.kind.is_logo()).count()
    }

    /// Change the selection. Passing `None` clears it. Selection state
    /// is mirrored onto the elements' `selected` flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the id does not refer to a known element.
    pub fn set_selected(&mut self, id: Option<ElementId>) -> EditorResult<()> {
        if let Some(id) = id {
            if !self.elements.contains_key(&id) {
                return Err(EditorError::ElementNotFound(id.to_string()));
            }
        }
        if let Some(previous) = self.selected.take() {
            if let Some(element) = self.elements.get_mut(&previous) {
                element.selected = false;
            }
        }
        if let Some(id) = id {
            if let Some(element) = self.elements.get_mut(&id) {
                element.selected = true;
            }
        }
        self.selected = id;
        self.notify();
        Ok(())
    }

    /// Currently selected element, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// Find the topmost element whose screen rectangle contains the
    /// given point. Overlap ties go to the most recently stacked element.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.elements.get(id))
            .find(|e| e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Move an element one slot up in the stacking order.
    ///
    /// Returns `false` (without notifying) if it is already topmost.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn bring_forward(&mut self, id: ElementId) -> EditorResult<bool> {
        let index = self
            .stacking_index(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        if index + 1 >= self.order.len() {
            return Ok(false);
        }
        self.order.swap(index, index + 1);
        self.notify();
        Ok(true)
    }

    /// Move an element one slot down in the stacking order.
    ///
    /// Returns `false` (without notifying) if it is already at the bottom.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn send_backward(&mut self, id: ElementId) -> EditorResult<bool> {
        let index = self
            .stacking_index(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        if index == 0 {
            return Ok(false);
        }
        self.order.swap(index, index - 1);
        self.notify();
        Ok(true)
    }

    /// Clone an element under a fresh id, offset down-right so the copy
    /// is visible next to the original. The clone is not inserted; wrap
    /// it in an insert command to make the duplication undoable.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn duplicate(&self, id: ElementId) -> EditorResult<Element> {
        let element = self
            .elements
            .get(&id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))?;
        let mut copy = element.clone();
        copy.id = ElementId::new();
        copy.position = copy.position.offset(20.0, 20.0);
        copy.selected = false;
        Ok(copy)
    }

    /// Restore every element's position, footprint, transform and style
    /// to the snapshot taken when it was first inserted. Observers are
    /// notified once.
    pub fn reset(&mut self) {
        for id in &self.order {
            let (Some(element), Some(initial)) =
                (self.elements.get_mut(id), self.initial_states.get(id))
            else {
                continue;
            };
            element.position = initial.position;
            element.size = initial.size;
            element.transform = initial.transform;
            element.style = initial.style.clone();
        }
        tracing::debug!(elements = self.order.len(), "reset to initial state");
        self.notify();
    }

    /// Set or clear the background image reference.
    pub fn set_background(&mut self, background: Option<String>) {
        self.background = background;
        self.notify();
    }

    /// Current background image reference.
    #[must_use]
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Replace the detected safe text areas.
    pub fn set_safe_areas(&mut self, areas: Vec<SafeArea>) {
        self.safe_areas = areas;
        self.notify();
    }

    /// Currently known safe text areas.
    #[must_use]
    pub fn safe_areas(&self) -> &[SafeArea] {
        &self.safe_areas
    }

    /// Export the design as a pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self, timestamp_ms: u64) -> EditorResult<String> {
        let document = crate::schema::FlyerDocument::from_state(self, timestamp_ms);
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Replace the design with a document produced by
    /// [`EditorState::export_json`].
    ///
    /// The document is fully validated before anything changes, so a
    /// bad document leaves the state untouched. Observers survive the
    /// import; the selection and any detected safe areas do not.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not parse or the document
    /// fails validation.
    pub fn import_json(&mut self, json: &str) -> EditorResult<()> {
        let document: crate::schema::FlyerDocument = serde_json::from_str(json)?;
        let incoming = document.into_state()?;

        self.elements = incoming.elements;
        self.order = incoming.order;
        self.initial_states = incoming.initial_states;
        self.selected = None;
        self.background = incoming.background;
        self.canvas_width = incoming.canvas_width;
        self.canvas_height = incoming.canvas_height;
        self.safe_areas.clear();
        tracing::debug!(elements = self.order.len(), "document imported");
        self.notify();
        Ok(())
    }

    /// Register an observer. It runs synchronously after every state
    /// mutation with a full snapshot.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: Fn(&EditorSnapshot) + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() < before
    }

    /// Build a full snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            elements: self.elements().cloned().collect(),
            selected: self.selected,
            background: self.background.clone(),
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            safe_areas: self.safe_areas.clone(),
        }
    }

    fn notify(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &self.observers {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::{ElementKind, Position};

    fn title_at(x: f32, y: f32) -> Element {
        Element::new(ElementKind::Title).with_position(Position::new(x, y))
    }

    #[test]
    fn test_insert_remove() {
        let mut state = EditorState::new();
        assert!(state.is_empty());

        let id = state.insert(title_at(0.0, 0.0)).expect("insert");
        assert_eq!(state.element_count(), 1);
        assert!(state.get(id).is_some());

        state.remove(id).expect("remove");
        assert!(state.is_empty());
    }

    #[test]
    fn test_insert_duplicate_id_rejected() {
        let mut state = EditorState::new();
        let element = title_at(0.0, 0.0);
        let copy = element.clone();
        state.insert(element).expect("insert");

        let err = state.insert(copy).expect_err("duplicate id");
        assert!(matches!(err, EditorError::InvalidOperation(_)));
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        // Unknown ids fail loudly rather than silently doing nothing.
        let mut state = EditorState::new();
        let ghost = ElementId::new();

        assert!(matches!(
            state.update(ghost, |_| {}),
            Err(EditorError::ElementNotFound(_))
        ));
        assert!(matches!(
            state.remove(ghost),
            Err(EditorError::ElementNotFound(_))
        ));
        assert!(matches!(
            state.set_selected(Some(ghost)),
            Err(EditorError::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut state = EditorState::new();
        let id = state.insert(title_at(0.0, 0.0)).expect("insert");
        state.set_selected(Some(id)).expect("select");
        assert_eq!(state.selected(), Some(id));

        state.remove(id).expect("remove");
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_selection_flag_mirrored() {
        let mut state = EditorState::new();
        let a = state.insert(title_at(0.0, 0.0)).expect("insert");
        let b = state
            .insert(Element::new(ElementKind::Topic))
            .expect("insert");

        state.set_selected(Some(a)).expect("select");
        assert!(state.get(a).expect("a").selected);

        state.set_selected(Some(b)).expect("select");
        assert!(!state.get(a).expect("a").selected);
        assert!(state.get(b).expect("b").selected);

        state.set_selected(None).expect("clear");
        assert!(!state.get(b).expect("b").selected);
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let mut state = EditorState::new();
        let below = state.insert(title_at(100.0, 100.0)).expect("insert");
        let above = state.insert(title_at(100.0, 100.0)).expect("insert");

        // Both cover the same rectangle; the later insert wins.
        let hit = state.element_at(150.0, 120.0).expect("hit");
        assert_eq!(hit, above);
        assert_ne!(hit, below);

        assert!(state.element_at(700.0, 900.0).is_none());
    }

    #[test]
    fn test_insert_at_restores_stacking_slot() {
        let mut state = EditorState::new();
        let bottom = state.insert(title_at(0.0, 0.0)).expect("insert");
        let middle = state
            .insert(Element::new(ElementKind::Topic))
            .expect("insert");
        let top = state
            .insert(Element::new(ElementKind::Speaker))
            .expect("insert");

        let removed = state.remove(middle).expect("remove");
        state.insert_at(removed, 1).expect("reinsert");

        let order: Vec<_> = state.elements().map(|e| e.id).collect();
        assert_eq!(order, vec![bottom, middle, top]);
    }

    #[test]
    fn test_bring_forward_send_backward() {
        let mut state = EditorState::new();
        let a = state.insert(title_at(0.0, 0.0)).expect("insert");
        let b = state
            .insert(Element::new(ElementKind::Topic))
            .expect("insert");

        assert!(state.bring_forward(a).expect("forward"));
        let order: Vec<_> = state.elements().map(|e| e.id).collect();
        assert_eq!(order, vec![b, a]);

        // Already topmost.
        assert!(!state.bring_forward(a).expect("forward"));

        assert!(state.send_backward(a).expect("backward"));
        assert!(!state.send_backward(a).expect("backward"));
    }

    #[test]
    fn test_duplicate_offsets_copy() {
        let mut state = EditorState::new();
        let id = state.insert(title_at(100.0, 200.0)).expect("insert");

        let copy = state.duplicate(id).expect("duplicate");
        assert_ne!(copy.id, id);
        assert!((copy.position.x - 120.0).abs() < f32::EPSILON);
        assert!((copy.position.y - 220.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_logo_limit() {
        let mut state = EditorState::new();
        for i in 0..EditorState::MAX_LOGOS {
            state
                .insert(Element::new(ElementKind::Logo {
                    src: format!("logo-{i}.png"),
                }))
                .expect("insert logo");
        }

        let err = state
            .insert(Element::new(ElementKind::Logo {
                src: "one-too-many.png".to_string(),
            }))
            .expect_err("over the limit");
        assert!(matches!(err, EditorError::InvalidOperation(_)));
        assert_eq!(state.logo_count(), EditorState::MAX_LOGOS);
    }

    #[test]
    fn test_reset_restores_initial_snapshot() {
        let mut state = EditorState::new();
        let id = state.insert(title_at(10.0, 10.0)).expect("insert");

        state
            .update(id, |e| {
                e.position = Position::new(300.0, 400.0);
                e.transform.rotation_degrees = 45.0;
                e.style.font_size = 64.0;
            })
            .expect("update");

        state.reset();
        let element = state.get(id).expect("element");
        assert!((element.position.x - 10.0).abs() < f32::EPSILON);
        assert!(element.transform.rotation_degrees.abs() < f32::EPSILON);
        assert!((element.style.font_size - 24.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_observers_see_each_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut state = EditorState::new();
        let observer = state.subscribe(move |snapshot: &EditorSnapshot| {
            sink.borrow_mut()
                .push((snapshot.elements.len(), snapshot.selected));
        });

        let id = state.insert(title_at(0.0, 0.0)).expect("insert");
        state.set_selected(Some(id)).expect("select");
        state.remove(id).expect("remove");

        assert_eq!(
            *seen.borrow(),
            vec![(1, None), (1, Some(id)), (0, None)]
        );

        assert!(state.unsubscribe(observer));
        assert!(!state.unsubscribe(observer));
        state.insert(title_at(0.0, 0.0)).expect("insert");
        assert_eq!(seen.borrow().len(), 3);
    }
}
