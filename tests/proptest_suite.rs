//! Property-based tests for rpc_status
//!
//! These tests use proptest to generate random inputs and verify invariants hold.

use proptest::prelude::*;
use rpc_status::{
    CodeSpace, DuplicatePolicy, MapperRegistry, ResolutionJournal, ResolveContext, Shapes,
    StatusEntry, StatusError, StatusTable, StatusValue, TableMapper,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

const ALPHA: CodeSpace = CodeSpace::new("alpha", Shapes::NUMERIC);
const BETA: CodeSpace = CodeSpace::new("beta", Shapes::NUMERIC);

fn table_over(space: &'static CodeSpace, codes: &BTreeSet<u32>) -> Arc<StatusTable> {
    Arc::new(StatusTable::from_entries(
        space,
        codes
            .iter()
            .map(|&c| StatusEntry::owned(c, format!("{}_{:08X}", space.as_str().to_uppercase(), c), "generated")),
        DuplicatePolicy::default(),
    ))
}

fn registry_over(tables: &[Arc<StatusTable>]) -> MapperRegistry {
    let registry = MapperRegistry::new();
    for table in tables {
        registry.register(TableMapper::new(Arc::clone(table)));
    }
    registry
}

// ============================================================================
// TABLE PROPERTIES
// ============================================================================

proptest! {
    /// Every loaded code is found, every other code is not
    #[test]
    fn lookup_is_exact(
        codes in prop::collection::btree_set(any::<u32>(), 0..64),
        probe in any::<u32>(),
    ) {
        let table = table_over(&ALPHA, &codes);

        for &c in &codes {
            prop_assert_eq!(table.lookup(c).map(StatusEntry::code), Some(c));
        }
        prop_assert_eq!(table.contains(probe), codes.contains(&probe));
        prop_assert_eq!(table.len(), codes.len());
    }

    /// Duplicate resolution matches first-insert or last-insert map semantics
    #[test]
    fn duplicate_policy_is_deterministic(
        rows in prop::collection::vec((0u32..16, 0u32..1000), 0..64),
    ) {
        let entries = || rows.iter().map(|&(c, tag)| StatusEntry::owned(c, format!("N{}", tag), ""));

        let mut first: BTreeMap<u32, String> = BTreeMap::new();
        let mut last: BTreeMap<u32, String> = BTreeMap::new();
        for &(c, tag) in &rows {
            first.entry(c).or_insert_with(|| format!("N{}", tag));
            last.insert(c, format!("N{}", tag));
        }

        let first_table = StatusTable::from_entries(&ALPHA, entries(), DuplicatePolicy::FirstWins);
        let last_table = StatusTable::from_entries(&ALPHA, entries(), DuplicatePolicy::LastWins);

        for (c, name) in &first {
            prop_assert_eq!(first_table.lookup(*c).map(StatusEntry::name), Some(name.as_str()));
        }
        for (c, name) in &last {
            prop_assert_eq!(last_table.lookup(*c).map(StatusEntry::name), Some(name.as_str()));
        }
        prop_assert_eq!(first_table.duplicates_collapsed(), rows.len() - first.len());
    }
}

// ============================================================================
// RESOLUTION PROPERTIES
// ============================================================================

proptest! {
    /// u32 and i32 renderings of the same bits resolve identically
    #[test]
    fn signed_and_unsigned_agree(
        codes in prop::collection::btree_set(any::<u32>(), 1..32),
        pick in any::<prop::sample::Index>(),
        probe in any::<u32>(),
    ) {
        let registry = registry_over(&[table_over(&ALPHA, &codes)]);
        let ctx = ResolveContext::background();

        let listed = *pick.get(&codes.iter().copied().collect::<Vec<_>>());
        for c in [listed, probe] {
            prop_assert_eq!(registry.resolve(&ctx, c), registry.resolve(&ctx, c as i32));
        }
    }

    /// Repeated resolution with unchanged state returns equal results
    #[test]
    fn resolution_is_idempotent(
        codes in prop::collection::btree_set(any::<u32>(), 0..32),
        probe in any::<u32>(),
    ) {
        let registry = registry_over(&[table_over(&ALPHA, &codes)]);
        let ctx = ResolveContext::for_operation("op");

        let first = registry.resolve(&ctx, probe);
        let second = registry.resolve(&ctx, probe);
        prop_assert_eq!(first, second);
    }

    /// Earlier mapper wins on overlap, later mapper catches the rest
    #[test]
    fn first_match_then_fall_through(
        a in prop::collection::btree_set(0u32..64, 0..32),
        b in prop::collection::btree_set(0u32..64, 0..32),
        probe in 0u32..64,
    ) {
        let registry = registry_over(&[table_over(&ALPHA, &a), table_over(&BETA, &b)]);

        let expected = if a.contains(&probe) {
            Some("alpha")
        } else if b.contains(&probe) {
            Some("beta")
        } else {
            None
        };

        let got = registry.resolve(&ResolveContext::background(), probe);
        prop_assert_eq!(got.as_ref().map(StatusError::space), expected);
        if let Some(err) = got {
            prop_assert_eq!(err.code(), probe);
        }
    }

    /// Textual values never resolve, even when they spell a listed code
    #[test]
    fn text_never_resolves(
        codes in prop::collection::btree_set(any::<u32>(), 1..16),
        s in "\\PC*",
    ) {
        let registry = registry_over(&[table_over(&ALPHA, &codes)]);
        let ctx = ResolveContext::background();

        prop_assert!(registry.resolve(&ctx, s.as_str()).is_none());
        for c in &codes {
            prop_assert!(registry.resolve(&ctx, c.to_string().as_str()).is_none());
        }
        prop_assert!(registry.resolve(&ctx, StatusValue::unrecognized::<u64>()).is_none());
    }

    /// An empty registry resolves nothing
    #[test]
    fn empty_registry_misses_everything(probe in any::<u32>()) {
        let registry = MapperRegistry::new();
        prop_assert!(registry.resolve(&ResolveContext::background(), probe).is_none());
        prop_assert!(registry.resolve(&ResolveContext::background(), probe as i32).is_none());
    }
}

// ============================================================================
// LOGGING PROPERTIES
// ============================================================================

proptest! {
    /// Log lines are valid UTF-8 and bounded regardless of field sizes
    #[test]
    fn log_line_is_bounded_utf8(
        name in "\\PC{0,3000}",
        details in "\\PC{0,3000}",
        operation in "\\PC{0,3000}",
        meta in "\\PC{0,3000}",
    ) {
        let err = StatusError::new(&ALPHA, 1, name, details);
        let ctx = ResolveContext::for_operation(operation).with_metadata("peer", meta);

        let mut buffer = String::new();
        err.log_entry(&ctx).write_to(&mut buffer).unwrap();

        prop_assert!(std::str::from_utf8(buffer.as_bytes()).is_ok());
        // 1024 per field, four fields, plus framing
        prop_assert!(buffer.len() < 4 * 1024 + 128);
    }

    /// Display never panics and keeps the fixed prefix
    #[test]
    fn display_has_fixed_prefix(code in any::<u32>(), name in "[A-Z_]{1,32}") {
        let err = StatusError::new(&BETA, code, name.clone(), "d");
        let rendered = err.to_string();
        let expected_prefix = format!("beta: {} (0x{:08x}): ", name, code);
        prop_assert!(rendered.starts_with(&expected_prefix));
    }
}

// ============================================================================
// JOURNAL PROPERTIES
// ============================================================================

proptest! {
    /// Journal never exceeds capacity and counts every eviction
    #[test]
    fn journal_respects_capacity(
        capacity in 1usize..100,
        num_records in 0usize..200,
    ) {
        let journal = ResolutionJournal::new(capacity, 1024);
        let ctx = ResolveContext::for_operation("op");

        for i in 0..num_records {
            journal.record(&ctx, StatusValue::U32(i as u32), None);
        }

        prop_assert_eq!(journal.len(), num_records.min(capacity));
        prop_assert_eq!(journal.eviction_count() as usize, num_records.saturating_sub(capacity));
    }

    /// Journal memory is bounded by capacity times the per-record cap
    #[test]
    fn journal_memory_bounded(
        capacity in 1usize..50,
        max_entry in 0usize..2048,
        num_records in 0usize..100,
    ) {
        let journal = ResolutionJournal::new(capacity, max_entry);
        let ctx = ResolveContext::for_operation("X".repeat(5000))
            .with_metadata("peer", "Y".repeat(5000));
        let err = StatusError::new(&ALPHA, 7, "Z".repeat(5000), "W".repeat(10_000));

        for _ in 0..num_records {
            journal.record(&ctx, StatusValue::U32(7), Some(&err));
        }

        for record in journal.get_all() {
            prop_assert!(record.size_bytes <= max_entry);
        }
        prop_assert!(journal.payload_bytes() <= capacity * max_entry);
    }

    /// Journal tolerates concurrent writers
    #[test]
    fn concurrent_journal_writes(
        capacity in 10usize..100,
        thread_count in 1usize..8,
        writes_per_thread in 1usize..50,
    ) {
        let journal = ResolutionJournal::new(capacity, 256);

        let handles: Vec<_> = (0..thread_count)
            .map(|t| {
                let journal = journal.clone();
                std::thread::spawn(move || {
                    let ctx = ResolveContext::for_operation(format!("thread_{}", t));
                    for i in 0..writes_per_thread {
                        journal.record(&ctx, StatusValue::I32(i as i32), None);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let total = thread_count * writes_per_thread;
        prop_assert_eq!(journal.len(), total.min(capacity));
        prop_assert_eq!(journal.eviction_count() as usize, total.saturating_sub(capacity));
    }
}

// ============================================================================
// BUILT-IN CODE SPACES
// ============================================================================

#[cfg(feature = "builtin_tables")]
mod builtin {
    use super::*;
    use rpc_status::definitions;

    proptest! {
        /// Every built-in row resolves to itself, in either signedness
        #[test]
        fn builtin_rows_resolve(pick in any::<prop::sample::Index>()) {
            let registry = MapperRegistry::new();
            definitions::register_builtin(&registry);
            let ctx = ResolveContext::background();

            for table in [definitions::hresult::table(), definitions::ntstatus::table(), definitions::win32::table()] {
                let rows: Vec<&StatusEntry> = table.iter().collect();
                let entry = *pick.get(&rows);

                let err = registry.resolve(&ctx, entry.code() as i32).expect("built-in row");
                prop_assert_eq!(err.code(), entry.code());
                prop_assert_eq!(err.name(), entry.name());
            }
        }

        /// Arbitrary text never resolves against the built-in spaces
        #[test]
        fn builtin_text_never_resolves(s in "\\PC*") {
            let registry = MapperRegistry::new();
            definitions::register_builtin(&registry);
            prop_assert!(registry.resolve(&ResolveContext::background(), s.as_str()).is_none());
        }
    }
}
