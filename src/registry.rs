//! Ordered registry of code-space mappers.
//!
//! Interface stubs hand back raw status values with no indication of which
//! namespace they belong to. The registry asks each registered [`Mapper`] in
//! turn; the first one that accepts the value's shape *and* lists the code
//! produces the [`StatusError`]. A mapper that accepts the shape but has no
//! entry simply declines, and the next mapper gets a chance.
//!
//! # Lifecycle
//!
//! Mappers are registered during start-up, typically from independent
//! initialization code, and resolution happens afterwards from any number of
//! threads. Registration takes the write lock; resolution takes the read lock
//! only long enough to snapshot the mapper list, so a mapper may consult the
//! registry itself without deadlocking.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rpc_status::{
//!     DuplicatePolicy, MapperRegistry, ResolveContext, StatusEntry, StatusTable, TableMapper, spaces,
//! };
//!
//! let table = StatusTable::from_entries(
//!     &spaces::HRESULT,
//!     [StatusEntry::new(5, "E_ACCESSDENIED", "Access is denied.")],
//!     DuplicatePolicy::default(),
//! );
//!
//! let registry = MapperRegistry::new();
//! registry.register(TableMapper::new(Arc::new(table)));
//!
//! let ctx = ResolveContext::background();
//! let err = registry.resolve(&ctx, 5_u32).expect("listed code");
//! assert_eq!(err.to_string(), "hresult: E_ACCESSDENIED (0x00000005): Access is denied.");
//!
//! assert!(registry.resolve(&ctx, 999_u32).is_none());
//! assert!(registry.resolve(&ctx, "not-a-code").is_none());
//! ```

use crate::{CodeSpace, ResolutionJournal, ResolveContext, StatusError, StatusTable, StatusValue};
use smallvec::SmallVec;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// Mapper
// ============================================================================

/// Interpreter for one code space.
///
/// Implementations must be pure with respect to `value`: the same input
/// yields the same answer for as long as the mapper is registered. `ctx` is
/// supplied for annotation and must not change the outcome.
pub trait Mapper: Send + Sync {
    /// The code space this mapper is bound to.
    fn space(&self) -> &'static CodeSpace;

    /// Translate `value`, or decline with `None`.
    ///
    /// Declining covers both "shape not accepted" and "code not listed".
    fn map_value(&self, ctx: &ResolveContext, value: StatusValue<'_>) -> Option<StatusError>;
}

/// The stock mapper: one [`StatusTable`], canonicalized through its space.
#[derive(Debug, Clone)]
pub struct TableMapper {
    table: Arc<StatusTable>,
}

impl TableMapper {
    #[inline]
    pub fn new(table: Arc<StatusTable>) -> Self {
        Self { table }
    }

    /// The table this mapper reads.
    #[inline]
    pub fn table(&self) -> &StatusTable {
        &self.table
    }
}

impl Mapper for TableMapper {
    #[inline]
    fn space(&self) -> &'static CodeSpace {
        self.table.space()
    }

    fn map_value(&self, _ctx: &ResolveContext, value: StatusValue<'_>) -> Option<StatusError> {
        let code = self.table.space().canonicalize(value)?;
        self.table.error_for(code)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Mappers tried per resolution before the snapshot spills to the heap.
const INLINE_MAPPERS: usize = 8;

/// Ordered collection of mappers with first-match-wins resolution.
pub struct MapperRegistry {
    mappers: RwLock<Vec<Arc<dyn Mapper>>>,
    journal: Option<Arc<ResolutionJournal>>,
}

impl MapperRegistry {
    /// Empty registry. Usable in `static` items.
    pub const fn new() -> Self {
        Self {
            mappers: RwLock::new(Vec::new()),
            journal: None,
        }
    }

    /// Empty registry that records every resolution into `journal`.
    pub fn with_journal(journal: Arc<ResolutionJournal>) -> Self {
        Self {
            mappers: RwLock::new(Vec::new()),
            journal: Some(journal),
        }
    }

    #[inline]
    fn read_mappers(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn Mapper>>> {
        match self.mappers.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[inline]
    fn write_mappers(&self) -> RwLockWriteGuard<'_, Vec<Arc<dyn Mapper>>> {
        match self.mappers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Append a mapper. Later registrations are tried after earlier ones.
    pub fn register(&self, mapper: impl Mapper + 'static) {
        self.register_shared(Arc::new(mapper));
    }

    /// Append a mapper that is also held elsewhere.
    pub fn register_shared(&self, mapper: Arc<dyn Mapper>) {
        self.write_mappers().push(mapper);
    }

    /// Resolve a raw status value against the registered mappers.
    ///
    /// Returns the first match in registration order, or `None` when no
    /// mapper both accepts the value's shape and lists its code. Never
    /// panics and never reports an error of its own.
    pub fn resolve<'v>(&self, ctx: &ResolveContext, value: impl Into<StatusValue<'v>>) -> Option<StatusError> {
        let value = value.into();

        let snapshot: SmallVec<[Arc<dyn Mapper>; INLINE_MAPPERS]> =
            self.read_mappers().iter().cloned().collect();

        let outcome = snapshot
            .iter()
            .find_map(|mapper| mapper.map_value(ctx, value));

        if let Some(journal) = &self.journal {
            journal.record(ctx, value, outcome.as_ref());
        }

        outcome
    }

    /// Number of registered mappers.
    #[inline]
    pub fn len(&self) -> usize {
        self.read_mappers().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Code spaces of the registered mappers, in resolution order.
    pub fn spaces(&self) -> Vec<&'static CodeSpace> {
        self.read_mappers().iter().map(|m| m.space()).collect()
    }

    /// The attached journal, if any.
    #[inline]
    pub fn journal(&self) -> Option<&ResolutionJournal> {
        self.journal.as_deref()
    }
}

impl Default for MapperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: SmallVec<[&'static str; INLINE_MAPPERS]> =
            self.spaces().into_iter().map(CodeSpace::as_str).collect();
        f.debug_struct("MapperRegistry")
            .field("spaces", &names)
            .field("journal", &self.journal.is_some())
            .finish()
    }
}

// ============================================================================
// Process-wide Registry
// ============================================================================

static GLOBAL: MapperRegistry = MapperRegistry::new();

/// The process-wide registry.
///
/// Prefer an explicitly constructed [`MapperRegistry`] where the caller can
/// thread one through; this instance serves code that cannot.
#[inline]
pub fn global() -> &'static MapperRegistry {
    &GLOBAL
}

/// Register a mapper on the process-wide registry.
#[inline]
pub fn register(mapper: impl Mapper + 'static) {
    GLOBAL.register(mapper);
}

/// Resolve against the process-wide registry.
#[inline]
pub fn resolve<'v>(ctx: &ResolveContext, value: impl Into<StatusValue<'v>>) -> Option<StatusError> {
    GLOBAL.resolve(ctx, value)
}

// ============================================================================
// Tests
// ============================================================================
