//! Keyboard-enablement gate.
//!
//! Directional and commit keys only reach the engine while the gate is
//! enabled. What drives the gate depends on how the engine is hosted:
//!
//! - [`KeyboardControl::Focus`]: the gate follows attention. Gaining
//!   attention enables it, losing attention disables it.
//! - [`KeyboardControl::Explicit`]: the host toggles the gate itself and it
//!   stays enabled across attention loss until explicitly turned off.
//! - [`KeyboardControl::Activator`]: the engine is embedded inside a
//!   combobox-style activator that owns attention; the gate defers entirely
//!   to the activator's [`set_enabled`](KeyboardGate::set_enabled) calls and
//!   ignores attention changes.

/// Who drives the keyboard gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyboardControl {
    /// Attention gain/loss of the hosting widget drives the gate.
    #[default]
    Focus,
    /// The host toggles the gate explicitly; attention loss is ignored.
    Explicit,
    /// An embedding activator widget drives the gate; attention is ignored
    /// entirely.
    Activator,
}

/// The gate state machine.
///
/// Starts disabled; the host (or its attention routing) must enable it
/// before keys are processed.
#[derive(Debug)]
pub struct KeyboardGate {
    control: KeyboardControl,
    enabled: bool,
}

impl KeyboardGate {
    /// Create a disabled gate with the given control mode.
    pub fn new(control: KeyboardControl) -> Self {
        Self {
            control,
            enabled: false,
        }
    }

    /// The control mode this gate was built with.
    pub fn control(&self) -> KeyboardControl {
        self.control
    }

    /// Whether directional and commit keys are currently live.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The hosting widget gained attention.
    ///
    /// Enables the gate in `Focus` and `Explicit` modes. Ignored in
    /// `Activator` mode, where the activator drives the gate itself.
    /// Returns `true` if the gate transitioned.
    pub fn attention_gained(&mut self) -> bool {
        if self.control == KeyboardControl::Activator {
            return false;
        }
        if self.enabled {
            return false;
        }
        self.enabled = true;
        tracing::debug!(
            target: "horizon_select::gate",
            control = ?self.control,
            "keyboard enabled on attention gain"
        );
        true
    }

    /// The hosting widget lost attention.
    ///
    /// Disables the gate in `Focus` mode only; `Explicit` keeps the gate
    /// enabled until explicitly turned off, and `Activator` ignores attention
    /// entirely. Returns `true` when the loss disabled the gate, which is the
    /// engine's cue to re-anchor the default active option.
    pub fn attention_lost(&mut self) -> bool {
        if self.control != KeyboardControl::Focus || !self.enabled {
            return false;
        }
        self.enabled = false;
        tracing::debug!(
            target: "horizon_select::gate",
            "keyboard disabled on attention loss"
        );
        true
    }

    /// Explicitly set the gate state.
    ///
    /// Works in every mode; in `Activator` mode it is the only input the
    /// gate responds to. Returns `true` if the gate transitioned.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        tracing::debug!(
            target: "horizon_select::gate",
            control = ?self.control,
            enabled,
            "keyboard gate set explicitly"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_mode_follows_attention() {
        let mut gate = KeyboardGate::new(KeyboardControl::Focus);
        assert!(!gate.is_enabled());

        assert!(gate.attention_gained());
        assert!(gate.is_enabled());

        assert!(gate.attention_lost());
        assert!(!gate.is_enabled());
    }

    #[test]
    fn test_explicit_mode_survives_attention_loss() {
        let mut gate = KeyboardGate::new(KeyboardControl::Explicit);

        assert!(gate.set_enabled(true));
        assert!(!gate.attention_lost());
        assert!(gate.is_enabled());

        assert!(gate.set_enabled(false));
        assert!(!gate.is_enabled());
    }

    #[test]
    fn test_explicit_mode_enables_on_attention_gain() {
        let mut gate = KeyboardGate::new(KeyboardControl::Explicit);
        assert!(gate.attention_gained());
        assert!(gate.is_enabled());
    }

    #[test]
    fn test_activator_mode_ignores_attention() {
        let mut gate = KeyboardGate::new(KeyboardControl::Activator);

        assert!(!gate.attention_gained());
        assert!(!gate.is_enabled());

        assert!(gate.set_enabled(true));
        assert!(!gate.attention_lost());
        assert!(gate.is_enabled());
    }

    #[test]
    fn test_transitions_report_change_only() {
        let mut gate = KeyboardGate::new(KeyboardControl::Focus);
        assert!(gate.attention_gained());
        assert!(!gate.attention_gained());
        assert!(!gate.set_enabled(true));
        assert!(gate.set_enabled(false));
        assert!(!gate.attention_lost());
    }
}
