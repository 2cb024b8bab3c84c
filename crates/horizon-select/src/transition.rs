//! Snapshot transition classification.
//!
//! Every content render produces a fresh snapshot. Comparing its ordered
//! value sequence with the previous snapshot's tells the engine whether the
//! list was left alone, grew at the tail, was swapped out, or went empty,
//! and that classification alone decides what happens to the active option.

use crate::snapshot::OptionSnapshot;

/// How a freshly built snapshot relates to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotTransition {
    /// Identical ordered value sequence.
    Unchanged,
    /// The previous value sequence is a strict prefix of the new one: rows
    /// were appended at the tail and nothing else moved.
    Appended,
    /// Anything else: the list was filtered, reordered, or rows were removed.
    /// A previously empty list gaining rows also counts as replaced, so a
    /// default active option gets computed for it.
    Replaced,
    /// The new snapshot has no rows while the previous one had some.
    Emptied,
}

/// Classify the transition from `previous` to `next`.
pub fn classify(previous: &OptionSnapshot, next: &OptionSnapshot) -> SnapshotTransition {
    if next.is_empty() {
        return if previous.is_empty() {
            SnapshotTransition::Unchanged
        } else {
            SnapshotTransition::Emptied
        };
    }

    if previous.is_empty() {
        return SnapshotTransition::Replaced;
    }

    if next.len() >= previous.len()
        && previous
            .values()
            .zip(next.values())
            .all(|(prev, new)| prev == new)
    {
        return if next.len() == previous.len() {
            SnapshotTransition::Unchanged
        } else {
            SnapshotTransition::Appended
        };
    }

    SnapshotTransition::Replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{OptionKey, OptionRow, SnapshotBuilder};

    fn snapshot(values: &[&str]) -> OptionSnapshot {
        let mut builder = SnapshotBuilder::new();
        builder.extend(
            values
                .iter()
                .map(|&value| OptionRow::new(OptionKey::new(), value, value)),
        );
        builder.build()
    }

    #[test]
    fn test_identical_sequences_are_unchanged() {
        let prev = snapshot(&["a", "b", "c"]);
        let next = snapshot(&["a", "b", "c"]);
        assert_eq!(classify(&prev, &next), SnapshotTransition::Unchanged);
    }

    #[test]
    fn test_strict_tail_growth_is_appended() {
        let prev = snapshot(&["a", "b"]);
        let next = snapshot(&["a", "b", "c", "d"]);
        assert_eq!(classify(&prev, &next), SnapshotTransition::Appended);
    }

    #[test]
    fn test_filtering_is_replaced() {
        let prev = snapshot(&["a", "b", "c"]);
        assert_eq!(
            classify(&prev, &snapshot(&["x", "y"])),
            SnapshotTransition::Replaced
        );
        // Removing from the middle is not an append.
        assert_eq!(
            classify(&prev, &snapshot(&["a", "c"])),
            SnapshotTransition::Replaced
        );
        // Reordering is not unchanged.
        assert_eq!(
            classify(&prev, &snapshot(&["b", "a", "c"])),
            SnapshotTransition::Replaced
        );
    }

    #[test]
    fn test_prefix_shrink_is_replaced() {
        let prev = snapshot(&["a", "b", "c"]);
        let next = snapshot(&["a", "b"]);
        assert_eq!(classify(&prev, &next), SnapshotTransition::Replaced);
    }

    #[test]
    fn test_going_empty_is_emptied() {
        let prev = snapshot(&["a", "b"]);
        assert_eq!(
            classify(&prev, &OptionSnapshot::empty()),
            SnapshotTransition::Emptied
        );
    }

    #[test]
    fn test_empty_to_empty_is_unchanged() {
        assert_eq!(
            classify(&OptionSnapshot::empty(), &OptionSnapshot::empty()),
            SnapshotTransition::Unchanged
        );
    }

    #[test]
    fn test_first_population_is_replaced() {
        assert_eq!(
            classify(&OptionSnapshot::empty(), &snapshot(&["a"])),
            SnapshotTransition::Replaced
        );
    }
}
