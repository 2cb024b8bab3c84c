//! Horizon Select - a keyboard-navigable option-list engine.
//!
//! This crate implements the interaction state machine behind searchable and
//! selectable controls (autocomplete fields, comboboxes, multi-select
//! widgets): given an ordered, dynamically changing collection of selectable
//! rows, it maintains a single active (keyboard-highlighted) row, responds
//! to directional and commit input, triggers on-demand loading at the list
//! boundary, and preserves the highlight correctly across concurrent
//! re-renders caused by typing, filtering, or paging.
//!
//! The engine owns no data and renders nothing. The host rebuilds its row
//! set on every content change and hands it to
//! [`OptionListEngine::sync`]; the engine classifies the change
//! (unchanged / appended / replaced / emptied) and keeps, advances, or
//! resets the active row accordingly.
//!
//! # Example
//!
//! ```
//! use horizon_select::{AutoSelection, Direction, OptionKey, OptionListEngine, OptionRow};
//!
//! let engine = OptionListEngine::new()
//!     .with_auto_selection(AutoSelection::First)
//!     .without_scroll_sync();
//!
//! engine.selected.connect(|value| {
//!     println!("selected {value}");
//! });
//!
//! // One render pass of the host's rows.
//! let (apple, banana) = (OptionKey::new(), OptionKey::new());
//! engine.sync(
//!     vec![
//!         OptionRow::new(apple, "apple", "Apple"),
//!         OptionRow::new(banana, "banana", "Banana"),
//!     ],
//!     false,
//! );
//!
//! // Keyboard input moves the highlight and commits it.
//! engine.attention_gained();
//! pollster::block_on(engine.navigate(Direction::Down)).unwrap();
//! engine.commit().unwrap();
//! ```

pub mod engine;
pub mod gate;
pub mod policy;
pub mod prelude;
pub mod snapshot;
pub mod transition;
pub mod viewport;

pub use engine::{ActiveOption, Direction, EngineError, ListToken, NavKey, OptionListEngine};
pub use gate::{KeyboardControl, KeyboardGate};
pub use policy::{AutoSelection, default_active_index};
pub use snapshot::{
    OptionEntry, OptionKey, OptionRow, OptionSnapshot, OptionValue, SnapshotBuilder,
};
pub use transition::{SnapshotTransition, classify};
pub use viewport::{DEFAULT_SCROLL_DEBOUNCE, ScrollCoalescer};
