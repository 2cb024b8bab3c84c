//! Option rows, snapshots, and the snapshot builder.
//!
//! A snapshot is the ordered set of selectable rows captured from one render
//! pass of the host. It is rebuilt from scratch on every content change and
//! never patched in place; the engine compares consecutive snapshots to
//! decide what happened to the list.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Identity and value tokens
// ============================================================================

/// Global counter for generating unique option keys.
static NEXT_OPTION_KEY: AtomicU64 = AtomicU64::new(1);

/// A stable identity handle for one rendered option row.
///
/// The host mints a key per row and keeps it stable for as long as that row
/// exists, across re-renders. The engine uses keys to recognize a row again
/// in the next snapshot and to route scroll and activation requests back to
/// the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionKey(u64);

impl OptionKey {
    /// Mint a fresh key. Each call returns a distinct key.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(NEXT_OPTION_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value of this key.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// The domain value of an option, opaque to the engine.
///
/// Values are cheap to clone and compare; the engine treats them as tokens
/// and attaches no meaning beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionValue(Arc<str>);

impl OptionValue {
    /// View the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self(Arc::from(value.as_str()))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Row markers
// ============================================================================

/// The per-render marker a host attaches to each selectable row.
///
/// The flags are read from the marker verbatim; the engine never infers them
/// from row content. `selected` reflects the host's own selection state and
/// feeds the default-active computation.
#[derive(Debug, Clone)]
pub struct OptionRow {
    /// Stable identity of the row.
    pub key: OptionKey,
    /// The domain value this row stands for.
    pub value: OptionValue,
    /// The display text currently rendered for the row.
    pub text: String,
    /// Excludes the row from keyboard reachability and selection commit.
    pub disabled: bool,
    /// Marks a virtual row (e.g. a "create new" affordance) whose text may
    /// change while its value stays stable.
    pub is_action: bool,
    /// Whether the host currently counts this row as selected.
    pub selected: bool,
}

impl OptionRow {
    /// Create a marker for an ordinary, enabled, unselected row.
    pub fn new(
        key: OptionKey,
        value: impl Into<OptionValue>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            key,
            value: value.into(),
            text: text.into(),
            disabled: false,
            is_action: false,
            selected: false,
        }
    }

    /// Set the disabled flag.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Mark the row as a virtual action row.
    pub fn with_action(mut self, is_action: bool) -> Self {
        self.is_action = is_action;
        self
    }

    /// Set the selected flag.
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

// ============================================================================
// Snapshot entries
// ============================================================================

/// One entry in an [`OptionSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    /// Stable identity of the row.
    pub key: OptionKey,
    /// The domain value this row stands for.
    pub value: OptionValue,
    /// The display text captured with this snapshot.
    pub text: String,
    /// Position within the snapshot (0-based).
    pub index: usize,
    /// Whether the row is excluded from navigation and commit.
    pub disabled: bool,
    /// Whether the row is a virtual action row.
    pub is_action: bool,
    /// Whether the host counts the row as selected.
    pub selected: bool,
}

/// The ordered, deduplicated set of selectable rows from one render pass.
///
/// Snapshots are immutable once built. Comparing a snapshot with its
/// predecessor is how the engine classifies a content change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSnapshot {
    entries: Vec<OptionEntry>,
}

impl OptionSnapshot {
    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&OptionEntry> {
        self.entries.get(index)
    }

    /// Iterate the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionEntry> {
        self.entries.iter()
    }

    /// All entries as a slice.
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Find the entry with the given key.
    pub fn entry_by_key(&self, key: OptionKey) -> Option<&OptionEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// The index of the last entry, if the snapshot is non-empty.
    pub fn last_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    /// The ordered value sequence of this snapshot.
    pub fn values(&self) -> impl Iterator<Item = &OptionValue> {
        self.entries.iter().map(|entry| &entry.value)
    }
}

// ============================================================================
// Snapshot builder
// ============================================================================

/// Collects row markers from a render pass and produces an [`OptionSnapshot`].
///
/// Some host compositions render the same row through more than one path;
/// the builder collapses duplicate keys to the first occurrence so each row
/// appears exactly once, in render order.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    rows: Vec<OptionRow>,
    seen: HashSet<OptionKey>,
}

impl SnapshotBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row marker. Rows with an already-seen key are dropped.
    pub fn push(&mut self, row: OptionRow) {
        if !self.seen.insert(row.key) {
            tracing::trace!(
                target: "horizon_select::reconcile",
                key = row.key.as_u64(),
                value = %row.value,
                "dropping duplicate row"
            );
            return;
        }
        self.rows.push(row);
    }

    /// Add each row from an iterator.
    pub fn extend<I: IntoIterator<Item = OptionRow>>(&mut self, rows: I) {
        for row in rows {
            self.push(row);
        }
    }

    /// Assign indices and produce the snapshot.
    pub fn build(self) -> OptionSnapshot {
        let entries = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| OptionEntry {
                key: row.key,
                value: row.value,
                text: row.text,
                index,
                disabled: row.disabled,
                is_action: row.is_action,
                selected: row.selected,
            })
            .collect();

        OptionSnapshot { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: OptionKey, value: &str) -> OptionRow {
        OptionRow::new(key, value, value)
    }

    #[test]
    fn test_builder_preserves_order_and_indices() {
        let (a, b, c) = (OptionKey::new(), OptionKey::new(), OptionKey::new());

        let mut builder = SnapshotBuilder::new();
        builder.extend([row(a, "apple"), row(b, "banana"), row(c, "cherry")]);
        let snapshot = builder.build();

        assert_eq!(snapshot.len(), 3);
        let values: Vec<_> = snapshot.values().map(|v| v.as_str().to_owned()).collect();
        assert_eq!(values, ["apple", "banana", "cherry"]);
        for (expected, entry) in snapshot.iter().enumerate() {
            assert_eq!(entry.index, expected);
        }
    }

    #[test]
    fn test_builder_collapses_duplicate_keys() {
        let (a, b) = (OptionKey::new(), OptionKey::new());

        let mut builder = SnapshotBuilder::new();
        builder.push(row(a, "apple"));
        builder.push(row(b, "banana"));
        builder.push(row(a, "apple"));
        let snapshot = builder.build();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(0).unwrap().key, a);
        assert_eq!(snapshot.get(1).unwrap().key, b);
    }

    #[test]
    fn test_entry_by_key() {
        let (a, b) = (OptionKey::new(), OptionKey::new());

        let mut builder = SnapshotBuilder::new();
        builder.extend([row(a, "apple"), row(b, "banana").with_disabled(true)]);
        let snapshot = builder.build();

        assert_eq!(snapshot.entry_by_key(b).unwrap().index, 1);
        assert!(snapshot.entry_by_key(b).unwrap().disabled);
        assert!(snapshot.entry_by_key(OptionKey::new()).is_none());
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: Vec<_> = (0..100).map(|_| OptionKey::new()).collect();
        let unique: HashSet<_> = keys.iter().copied().collect();
        assert_eq!(unique.len(), keys.len());
    }
}
