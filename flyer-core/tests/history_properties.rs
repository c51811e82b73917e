//! Command History Integration Tests
//!
//! Exercises the undo/redo engine end to end:
//! - Round-trip law: undoing a whole command sequence restores the
//!   initial state, and redoing it restores the final state
//! - Bounded history with oldest-first eviction
//! - Batch commands reverting in strict reverse order
//! - Element identity and stacking slot surviving remove/undo/redo

use flyer_core::{
    layout, Command, CommandHistory, EditorState, Element, ElementKind, Position, StyleChange,
    Transform, HISTORY_LIMIT,
};
use proptest::prelude::*;

/// Serialize the observable state so whole states can be compared.
fn fingerprint(state: &EditorState) -> serde_json::Value {
    serde_json::to_value(state.snapshot()).expect("snapshot serializes")
}

// ============================================================================
// Deterministic scenarios
// ============================================================================

#[test]
fn test_cap_evicts_oldest_command() {
    let mut state = EditorState::new();
    let mut history = CommandHistory::new();
    let id = state
        .insert(Element::new(ElementKind::Title))
        .expect("insert");

    // One more command than the history holds.
    for i in 0..=HISTORY_LIMIT {
        let old = state.get(id).expect("element").position;
        let new = Position::new((i + 1) as f32, 0.0);
        history
            .execute(Command::Move { id, old, new }, &mut state)
            .expect("execute");
    }
    assert_eq!(history.undo_depth(), HISTORY_LIMIT);

    while history.undo(&mut state).expect("undo") {}

    // The first move fell off the back of the stack, so undo stops one
    // step short of the origin.
    let position = state.get(id).expect("element").position;
    assert!((position.x - 1.0).abs() < f32::EPSILON);
    assert!(!history.can_undo());
    assert!(history.can_redo());
}

#[test]
fn test_removed_element_returns_with_identity_and_slot() {
    let mut state = EditorState::new();
    let mut history = CommandHistory::new();

    let first = Element::new(ElementKind::Title);
    let first_id = first.id;
    history
        .execute(Command::insert(first), &mut state)
        .expect("insert first");

    let second = Element::new(ElementKind::Topic);
    let second_id = second.id;
    history
        .execute(Command::insert(second), &mut state)
        .expect("insert second");

    let remove = Command::remove(&state, first_id).expect("capture removal");
    history.execute(remove, &mut state).expect("remove");
    assert_eq!(state.stacking_index(second_id), Some(0));

    // Undoing the removal restores the same id in the same slot.
    assert!(history.undo(&mut state).expect("undo remove"));
    assert_eq!(state.stacking_index(first_id), Some(0));
    assert_eq!(state.stacking_index(second_id), Some(1));

    assert!(history.undo(&mut state).expect("undo second insert"));
    assert!(state.get(second_id).is_none());
    assert!(history.undo(&mut state).expect("undo first insert"));
    assert!(state.is_empty());
    assert!(!history.undo(&mut state).expect("undo at floor"));

    for _ in 0..3 {
        assert!(history.redo(&mut state).expect("redo"));
    }
    assert_eq!(state.element_count(), 1);
    assert_eq!(state.stacking_index(second_id), Some(0));
    assert!(state.get(first_id).is_none());
}

#[test]
fn test_multi_remove_batch_undo_restores_stacking_order() {
    let mut state = EditorState::new();
    let mut history = CommandHistory::new();
    let mut ids = Vec::new();
    for kind in [ElementKind::Title, ElementKind::Topic, ElementKind::Speaker] {
        let element = layout::standard_element(kind, state.canvas_width());
        ids.push(state.insert(element).expect("insert"));
    }

    // Keeping only the speaker removes two elements in one batch.
    let batch = layout::sync_text_elements(&state, &[ElementKind::Speaker]).expect("changes");
    history.execute(batch, &mut state).expect("execute");
    let kinds: Vec<_> = state.elements().map(|e| e.kind.clone()).collect();
    assert_eq!(kinds, vec![ElementKind::Speaker]);

    // One undo puts every removed element back in its original slot,
    // even though both removes were captured before either ran.
    assert!(history.undo(&mut state).expect("undo"));
    let order: Vec<_> = state.elements().map(|e| e.id).collect();
    assert_eq!(order, ids);
}

#[test]
fn test_batch_reverts_in_reverse_order() {
    let mut state = EditorState::new();
    let mut history = CommandHistory::new();

    let element = Element::new(ElementKind::Speaker);
    let id = element.id;
    let start = element.position;
    let batch = Command::batch(vec![
        Command::insert(element),
        Command::Move {
            id,
            old: start,
            new: Position::new(250.0, 400.0),
        },
        Command::Style {
            id,
            change: StyleChange::FontSize {
                old: 20.0,
                new: 32.0,
            },
        },
    ]);

    history.execute(batch, &mut state).expect("execute batch");
    let element = state.get(id).expect("element");
    assert!((element.position.x - 250.0).abs() < f32::EPSILON);
    assert!((element.style.font_size - 32.0).abs() < f32::EPSILON);

    // Reverting runs the style change, then the move, then the insert.
    // Any other order would trip over a missing element.
    assert!(history.undo(&mut state).expect("undo"));
    assert!(state.is_empty());

    assert!(history.redo(&mut state).expect("redo"));
    let element = state.get(id).expect("element");
    assert!((element.position.x - 250.0).abs() < f32::EPSILON);
    assert!((element.style.font_size - 32.0).abs() < f32::EPSILON);
}

#[test]
fn test_new_command_discards_redo_branch() {
    let mut state = EditorState::new();
    let mut history = CommandHistory::new();
    let id = state
        .insert(Element::new(ElementKind::Time))
        .expect("insert");
    let origin = state.get(id).expect("element").position;

    history
        .execute(
            Command::Move {
                id,
                old: origin,
                new: Position::new(50.0, 0.0),
            },
            &mut state,
        )
        .expect("first move");
    history.undo(&mut state).expect("undo");
    assert!(history.can_redo());

    history
        .execute(
            Command::Move {
                id,
                old: origin,
                new: Position::new(0.0, 75.0),
            },
            &mut state,
        )
        .expect("second move");

    assert!(!history.can_redo());
    assert!(!history.redo(&mut state).expect("redo is a no-op"));
    let position = state.get(id).expect("element").position;
    assert!((position.y - 75.0).abs() < f32::EPSILON);
}

// ============================================================================
// Round-trip property
// ============================================================================

/// One randomly generated editing step. Element-targeted steps pick one
/// of the live elements by slot; integer payloads keep values exact.
#[derive(Debug, Clone)]
enum Step {
    Move(usize, i32, i32),
    Reshape(usize, i32, i32),
    FontSize(usize, u8),
    InsertTopic,
    Remove(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..8usize, -100..100i32, -100..100i32).prop_map(|(s, dx, dy)| Step::Move(s, dx, dy)),
        (0..8usize, -180..180i32, 50..300i32).prop_map(|(s, deg, pct)| Step::Reshape(s, deg, pct)),
        (0..8usize, 8..64u8).prop_map(|(s, size)| Step::FontSize(s, size)),
        Just(Step::InsertTopic),
        (0..8usize).prop_map(Step::Remove),
    ]
}

/// Turn a step into a concrete command against the current state, or
/// `None` when the step has no element to target.
fn command_for(step: &Step, state: &EditorState) -> Option<Command> {
    let ids: Vec<_> = state.elements().map(|e| e.id).collect();
    let pick = |slot: usize| ids.get(slot % ids.len().max(1)).copied();
    match step {
        Step::Move(slot, dx, dy) => {
            let id = pick(*slot)?;
            let old = state.get(id)?.position;
            Some(Command::Move {
                id,
                old,
                new: old.offset(*dx as f32, *dy as f32),
            })
        }
        Step::Reshape(slot, degrees, percent) => {
            let id = pick(*slot)?;
            let old = state.get(id)?.transform;
            Some(Command::Transform {
                id,
                old,
                new: Transform::new(*degrees as f32, *percent as f32 / 100.0),
            })
        }
        Step::FontSize(slot, size) => {
            let id = pick(*slot)?;
            let old = state.get(id)?.style.font_size;
            Some(Command::Style {
                id,
                change: StyleChange::FontSize {
                    old,
                    new: f32::from(*size),
                },
            })
        }
        Step::InsertTopic => Some(Command::insert(Element::new(ElementKind::Topic))),
        Step::Remove(slot) => {
            let id = pick(*slot)?;
            Command::remove(state, id).ok()
        }
    }
}

proptest! {
    #[test]
    fn undo_all_restores_initial_and_redo_all_restores_final(
        steps in prop::collection::vec(step_strategy(), 1..16),
    ) {
        let mut state = EditorState::new();
        state.insert(Element::new(ElementKind::Title)).expect("seed title");
        state.insert(Element::new(ElementKind::Speaker)).expect("seed speaker");
        let mut history = CommandHistory::new();

        let initial = fingerprint(&state);
        for step in &steps {
            if let Some(command) = command_for(step, &state) {
                history.execute(command, &mut state).expect("execute");
            }
        }
        let last = fingerprint(&state);

        while history.undo(&mut state).expect("undo") {}
        prop_assert_eq!(fingerprint(&state), initial);

        while history.redo(&mut state).expect("redo") {}
        prop_assert_eq!(fingerprint(&state), last);
    }
}
