//! Core systems for Horizon Select.
//!
//! This crate provides the foundational components of the Horizon Select
//! option-list engine:
//!
//! - **Signal/Slot System**: Type-safe outward notifications
//! - **Timers**: One-shot and repeating timers with a caller-owned clock
//! - **Completions**: Host-resolvable one-shot futures for asynchronous work
//! - **Logging**: Per-subsystem `tracing` targets
//!
//! Everything here assumes the single-threaded, cooperative execution model
//! of an interaction engine: state changes are driven by user-interface
//! events on one thread, and the only asynchrony is waiting on work the host
//! performs.
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Completion Example
//!
//! ```
//! use horizon_select_core::completion_pair;
//!
//! let (handle, completion) = completion_pair();
//!
//! // The host resolves the handle when its work is done...
//! handle.resolve();
//!
//! // ...and whoever awaited the completion resumes.
//! assert!(pollster::block_on(completion).is_ok());
//! ```

pub mod completion;
pub mod error;
pub mod logging;
pub mod signal;
pub mod timer;

pub use completion::{Completion, CompletionHandle, LoadError, completion_pair};
pub use error::{CompletionError, CoreError, Result, TimerError};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{TimerId, TimerKind, TimerManager};
