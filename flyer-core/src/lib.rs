//! # Flyer Core
//!
//! Canvas editing core for a flyer design tool: element state, undoable
//! commands, touch and mouse gestures, layout helpers and JSON
//! persistence.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 flyer-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Editor State    │  Command History         │
//! │  - Elements      │  - Undo / redo stacks    │
//! │  - Stacking      │  - Batch commands        │
//! │  - Observers     │  - Availability status   │
//! ├─────────────────────────────────────────────┤
//! │  Gestures        │  Documents               │
//! │  - Drag + snap   │  - JSON schema           │
//! │  - Rotate/scale  │  - Session files         │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod gesture;
pub mod history;
pub mod layout;
pub mod schema;
pub mod session;

pub use command::{Command, StyleChange};
pub use editor::{EditorSnapshot, EditorState, ObserverId, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use element::{
    Element, ElementId, ElementKind, ElementStyle, FontStyle, FontWeight, Position, Size,
    Transform,
};
pub use error::{EditorError, EditorResult};
pub use event::{InputEvent, MouseButton, MouseEvent, TouchEvent, TouchPhase, TouchPoint};
pub use gesture::{GestureConfig, GestureController, GesturePhase, GestureUpdate, SnapGuide};
pub use history::{CommandHistory, HistoryStatus, ListenerId, HISTORY_LIMIT};
pub use layout::SafeArea;
pub use schema::{CanvasDocument, ElementDocument, FlyerDocument, SCHEMA_VERSION};
pub use session::{SessionStore, DEFAULT_SESSION};

/// Flyer core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
