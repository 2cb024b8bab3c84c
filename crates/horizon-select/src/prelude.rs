//! Prelude module for Horizon Select.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```
//! use horizon_select::prelude::*;
//! ```
//!
//! This provides access to:
//! - The engine (`OptionListEngine`, `Direction`, `NavKey`, `EngineError`)
//! - Row and snapshot types (`OptionRow`, `OptionKey`, `OptionValue`, `OptionSnapshot`)
//! - Policies and gating (`AutoSelection`, `KeyboardControl`)
//! - The signal/slot and completion systems from the core crate

// ============================================================================
// Engine
// ============================================================================

pub use crate::engine::{
    ActiveOption, Direction, EngineError, ListToken, NavKey, OptionListEngine,
};

// ============================================================================
// Rows and Snapshots
// ============================================================================

pub use crate::snapshot::{
    OptionEntry, OptionKey, OptionRow, OptionSnapshot, OptionValue, SnapshotBuilder,
};
pub use crate::transition::SnapshotTransition;

// ============================================================================
// Policies and Gating
// ============================================================================

pub use crate::gate::KeyboardControl;
pub use crate::policy::AutoSelection;

// ============================================================================
// Core Systems
// ============================================================================

pub use horizon_select_core::{
    Completion, CompletionHandle, ConnectionGuard, ConnectionId, Signal, completion_pair,
};
