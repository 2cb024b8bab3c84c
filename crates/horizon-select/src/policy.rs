//! Default-active selection policies.

use crate::snapshot::OptionSnapshot;

/// Rule for choosing a default active option when none was chosen explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoSelection {
    /// Prefer the first enabled row the host marks as selected; fall back to
    /// the first enabled row.
    #[default]
    FirstSelected,
    /// The first enabled row, ignoring selection state. Used when the host
    /// supports free-text creation and the top row should always be reachable
    /// with a single commit.
    First,
    /// Never compute a default; the active option is only ever set by
    /// explicit navigation or commit.
    None,
}

/// Compute the default active index for a snapshot under a policy.
///
/// A single pass tracks the first enabled entry as the fallback and, under
/// [`AutoSelection::FirstSelected`], the first enabled and selected entry as
/// the preferred candidate. Returns `None` for an empty or all-disabled
/// snapshot, and always under [`AutoSelection::None`].
pub fn default_active_index(snapshot: &OptionSnapshot, policy: AutoSelection) -> Option<usize> {
    if policy == AutoSelection::None {
        return None;
    }

    let mut fallback = None;
    for entry in snapshot.iter() {
        if entry.disabled {
            continue;
        }
        if fallback.is_none() {
            fallback = Some(entry.index);
        }
        if policy == AutoSelection::FirstSelected && entry.selected {
            return Some(entry.index);
        }
    }

    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{OptionKey, OptionRow, SnapshotBuilder};

    fn snapshot(rows: &[(&str, bool, bool)]) -> OptionSnapshot {
        let mut builder = SnapshotBuilder::new();
        builder.extend(rows.iter().map(|&(value, disabled, selected)| {
            OptionRow::new(OptionKey::new(), value, value)
                .with_disabled(disabled)
                .with_selected(selected)
        }));
        builder.build()
    }

    #[test]
    fn test_first_selected_prefers_selected_enabled() {
        let snapshot = snapshot(&[
            ("apple", false, false),
            ("banana", true, true),
            ("cherry", false, true),
        ]);

        // banana is selected but disabled, so cherry wins.
        assert_eq!(
            default_active_index(&snapshot, AutoSelection::FirstSelected),
            Some(2)
        );
    }

    #[test]
    fn test_first_selected_falls_back_to_first_enabled() {
        let snapshot = snapshot(&[
            ("apple", true, false),
            ("banana", false, false),
            ("cherry", false, false),
        ]);

        assert_eq!(
            default_active_index(&snapshot, AutoSelection::FirstSelected),
            Some(1)
        );
    }

    #[test]
    fn test_first_ignores_selection() {
        let snapshot = snapshot(&[("apple", false, false), ("banana", false, true)]);

        assert_eq!(default_active_index(&snapshot, AutoSelection::First), Some(0));
    }

    #[test]
    fn test_none_policy_never_defaults() {
        let snapshot = snapshot(&[("apple", false, true)]);

        assert_eq!(default_active_index(&snapshot, AutoSelection::None), None);
    }

    #[test]
    fn test_all_disabled_yields_nothing() {
        let snapshot = snapshot(&[("apple", true, true), ("banana", true, false)]);

        assert_eq!(
            default_active_index(&snapshot, AutoSelection::FirstSelected),
            None
        );
        assert_eq!(default_active_index(&snapshot, AutoSelection::First), None);
    }

    #[test]
    fn test_empty_snapshot_yields_nothing() {
        assert_eq!(
            default_active_index(&OptionSnapshot::empty(), AutoSelection::FirstSelected),
            None
        );
    }
}
