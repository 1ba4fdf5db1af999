//! Immutable code → `(name, description)` tables, one per code space.
//!
//! A table is bulk-loaded once from whatever the data source yields and is
//! never mutated afterwards, so concurrent lookups need no synchronization.
//! Entries are kept sorted by code; lookup is an exact-match binary search
//! on the full 32-bit pattern (no ranges, prefixes or masks).
//!
//! # Duplicates
//!
//! Generated source data is not guaranteed to be free of repeated codes. The
//! [`DuplicatePolicy`] chosen at construction decides which row survives, and
//! the decision is deterministic for a given input order.
//!
//! # Example
//!
//! ```rust
//! use rpc_status::{DuplicatePolicy, StatusEntry, StatusTable, spaces};
//!
//! let table = StatusTable::from_entries(
//!     &spaces::WIN32,
//!     [
//!         StatusEntry::new(2, "ERROR_FILE_NOT_FOUND", "The system cannot find the file specified."),
//!         StatusEntry::new(5, "ERROR_ACCESS_DENIED", "Access is denied."),
//!     ],
//!     DuplicatePolicy::default(),
//! );
//!
//! assert_eq!(table.lookup(5).map(|e| e.name()), Some("ERROR_ACCESS_DENIED"));
//! assert!(table.lookup(3).is_none());
//! ```

use crate::{CodeSpace, StatusError};
use std::borrow::Cow;

/// One row of a status table.
///
/// Static data uses borrowed strings (see [`StatusEntry::new`], usable in
/// `static` items); data loaded at run time uses [`StatusEntry::owned`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusEntry {
    code: u32,
    name: Cow<'static, str>,
    description: Cow<'static, str>,
}

impl StatusEntry {
    /// Entry over static strings.
    #[inline]
    pub const fn new(code: u32, name: &'static str, description: &'static str) -> Self {
        Self {
            code,
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
        }
    }

    /// Entry over run-time strings.
    #[inline]
    pub fn owned(code: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code,
            name: Cow::Owned(name.into()),
            description: Cow::Owned(description.into()),
        }
    }

    #[inline]
    pub const fn code(&self) -> u32 {
        self.code
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    // Cloning the Cow keeps static rows allocation-free when they are
    // copied into a StatusError.
    #[inline]
    pub(crate) fn text(&self) -> (Cow<'static, str>, Cow<'static, str>) {
        (self.name.clone(), self.description.clone())
    }
}

/// Which row survives when the source data repeats a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DuplicatePolicy {
    /// The first occurrence in source order is kept.
    FirstWins,
    /// The last occurrence in source order is kept (map-insertion semantics).
    #[default]
    LastWins,
}

/// Read-only status table for one code space.
#[derive(Debug, Clone)]
pub struct StatusTable {
    space: &'static CodeSpace,
    entries: Box<[StatusEntry]>,
    duplicates_collapsed: usize,
}

impl StatusTable {
    /// Bulk-load a table.
    pub fn from_entries<I>(space: &'static CodeSpace, entries: I, policy: DuplicatePolicy) -> Self
    where
        I: IntoIterator<Item = StatusEntry>,
    {
        let mut rows: Vec<StatusEntry> = entries.into_iter().collect();
        let before = rows.len();

        // Stable sort keeps source order within equal codes, which is what
        // makes both policies deterministic.
        rows.sort_by_key(StatusEntry::code);
        match policy {
            DuplicatePolicy::FirstWins => rows.dedup_by_key(|e| e.code),
            DuplicatePolicy::LastWins => {
                // Reversed, each run of equal codes starts with its last
                // source row; the second reverse restores ascending order.
                rows.reverse();
                rows.dedup_by_key(|e| e.code);
                rows.reverse();
            }
        }

        Self {
            space,
            duplicates_collapsed: before - rows.len(),
            entries: rows.into_boxed_slice(),
        }
    }

    /// Bulk-load from a static slice (generated tables).
    #[inline]
    pub fn from_static(
        space: &'static CodeSpace,
        entries: &'static [StatusEntry],
        policy: DuplicatePolicy,
    ) -> Self {
        Self::from_entries(space, entries.iter().cloned(), policy)
    }

    /// Exact-match lookup.
    #[inline]
    pub fn lookup(&self, code: u32) -> Option<&StatusEntry> {
        self.entries
            .binary_search_by_key(&code, StatusEntry::code)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    #[inline]
    pub fn contains(&self, code: u32) -> bool {
        self.lookup(code).is_some()
    }

    /// Structured error for `code`, or `None` when the code is unlisted.
    #[inline]
    pub fn error_for(&self, code: u32) -> Option<StatusError> {
        StatusError::from_code(self, code)
    }

    /// The code space this table belongs to.
    #[inline]
    pub const fn space(&self) -> &'static CodeSpace {
        self.space
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending code order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &StatusEntry> {
        self.entries.iter()
    }

    /// Number of source rows discarded by the duplicate policy.
    #[inline]
    pub const fn duplicates_collapsed(&self) -> usize {
        self.duplicates_collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaces;

    fn rows() -> Vec<StatusEntry> {
        vec![
            StatusEntry::new(0x8007_0005, "E_ACCESSDENIED", "General access denied error."),
            StatusEntry::new(0x8000_4005, "E_FAIL", "Unspecified failure."),
            StatusEntry::new(0x8007_0057, "E_INVALIDARG", "One or more arguments are invalid."),
        ]
    }

    #[test]
    fn lookup_finds_every_loaded_code() {
        let table = StatusTable::from_entries(&spaces::HRESULT, rows(), DuplicatePolicy::default());

        for row in rows() {
            assert_eq!(table.lookup(row.code()), Some(&row));
        }
        assert_eq!(table.len(), 3);
        assert_eq!(table.duplicates_collapsed(), 0);
    }

    #[test]
    fn lookup_is_exact_match_only() {
        let table = StatusTable::from_entries(&spaces::HRESULT, rows(), DuplicatePolicy::default());

        assert!(table.lookup(0x0007_0005).is_none());
        assert!(table.lookup(0x8007_0006).is_none());
        assert!(table.lookup(5).is_none());
    }

    #[test]
    fn iteration_is_sorted_by_code() {
        let table = StatusTable::from_entries(&spaces::HRESULT, rows(), DuplicatePolicy::default());
        let codes: Vec<u32> = table.iter().map(StatusEntry::code).collect();
        assert_eq!(codes, vec![0x8000_4005, 0x8007_0005, 0x8007_0057]);
    }

    fn duplicated() -> Vec<StatusEntry> {
        vec![
            StatusEntry::new(7, "FIRST", "first row"),
            StatusEntry::new(1, "ONE", "one"),
            StatusEntry::new(7, "MIDDLE", "middle row"),
            StatusEntry::new(7, "LAST", "last row"),
        ]
    }

    #[test]
    fn first_wins_keeps_earliest_row() {
        let table = StatusTable::from_entries(&spaces::WIN32, duplicated(), DuplicatePolicy::FirstWins);

        assert_eq!(table.lookup(7).map(StatusEntry::name), Some("FIRST"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.duplicates_collapsed(), 2);
    }

    #[test]
    fn last_wins_keeps_latest_row() {
        let table = StatusTable::from_entries(&spaces::WIN32, duplicated(), DuplicatePolicy::LastWins);

        assert_eq!(table.lookup(7).map(StatusEntry::name), Some("LAST"));
        assert_eq!(table.lookup(1).map(StatusEntry::name), Some("ONE"));
        assert_eq!(table.duplicates_collapsed(), 2);

        let codes: Vec<u32> = table.iter().map(StatusEntry::code).collect();
        assert_eq!(codes, vec![1, 7]);
    }

    #[test]
    fn default_policy_is_last_wins() {
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::LastWins);
    }

    #[test]
    fn owned_and_static_entries_compare_by_content() {
        let a = StatusEntry::new(5, "X", "y");
        let b = StatusEntry::owned(5, "X", String::from("y"));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_table_finds_nothing() {
        let table = StatusTable::from_entries(&spaces::NTSTATUS, Vec::new(), DuplicatePolicy::FirstWins);
        assert!(table.is_empty());
        assert!(!table.contains(0));
        assert!(table.error_for(0).is_none());
    }

    #[test]
    fn error_for_carries_the_table_space() {
        let table = StatusTable::from_entries(&spaces::HRESULT, rows(), DuplicatePolicy::default());
        let err = table.error_for(0x8007_0005).expect("listed code");
        assert_eq!(err.space(), "hresult");
        assert_eq!(err.name(), "E_ACCESSDENIED");
    }
}
