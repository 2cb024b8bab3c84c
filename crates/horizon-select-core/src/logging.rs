//! Logging facilities for Horizon Select.
//!
//! Horizon Select uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Initialize tracing (you can customize this)
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every subsystem logs under its own target so traces can be filtered per
//! concern, e.g. `RUST_LOG=horizon_select::engine=trace`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core systems target.
    pub const CORE: &str = "horizon_select_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_select_core::signal";
    /// Timer system target.
    pub const TIMER: &str = "horizon_select_core::timer";
    /// Option-list engine target.
    pub const ENGINE: &str = "horizon_select::engine";
    /// Keyboard gate target.
    pub const GATE: &str = "horizon_select::gate";
    /// Snapshot reconciliation target.
    pub const RECONCILE: &str = "horizon_select::reconcile";
    /// Scroll coalescing target.
    pub const VIEWPORT: &str = "horizon_select::viewport";
}
