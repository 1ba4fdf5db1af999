// src/ring_buffer.rs
//! Bounded journal of resolution outcomes.
//!
//! A dispatch layer can resolve thousands of status values per second, and
//! the interesting question during an incident is usually "what came back
//! recently, and did anything fail to map". [`ResolutionJournal`] keeps the
//! newest N outcomes (hits and misses) with FIFO eviction, so memory stays
//! fixed regardless of traffic.
//!
//! # Design Principles
//!
//! - **Bounded memory**: fixed number of records, per-record byte cap
//! - **FIFO eviction**: oldest records dropped first, eviction count kept
//! - **RwLock-based**: concurrent readers, exclusive writers
//! - **Cheap reads**: records hold `Arc<str>`, so cloning out is refcounting
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rpc_status::{MapperRegistry, ResolveContext, ring_buffer::ResolutionJournal};
//!
//! let journal = Arc::new(ResolutionJournal::new(1000, 512));
//! let registry = MapperRegistry::with_journal(Arc::clone(&journal));
//!
//! let _ = registry.resolve(&ResolveContext::for_operation("epm.ept_map"), 0x16c9a0d6_u32);
//!
//! let recent = journal.get_recent(1);
//! assert_eq!(recent.len(), 1);
//! assert!(!recent[0].is_hit());
//! ```

use crate::{ResolveContext, StatusError, StatusValue};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// What a resolution produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A mapper matched.
    Hit {
        /// Code space of the matching mapper.
        space: &'static str,
        /// Canonical code.
        code: u32,
        /// Symbolic name, possibly truncated.
        name: Arc<str>,
        /// Description, possibly truncated.
        details: Arc<str>,
    },
    /// No mapper matched.
    Miss,
}

/// One journaled resolution.
#[derive(Clone, Debug)]
pub struct ResolutionRecord {
    /// Unix timestamp (milliseconds) of the resolution
    pub timestamp_ms: u64,
    /// Operation from the resolve context
    pub operation: Arc<str>,
    /// Tagged rendering of the input value (e.g. `u32:0x00000005`)
    pub value: Arc<str>,
    /// Hit or miss
    pub outcome: Outcome,
    /// Correlation metadata from the resolve context
    pub metadata: Arc<[(Arc<str>, Arc<str>)]>,
    /// Approximate size in bytes
    pub size_bytes: usize,
}

impl ResolutionRecord {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self.outcome, Outcome::Hit { .. })
    }

    /// Code space of a hit.
    #[inline]
    pub fn space(&self) -> Option<&'static str> {
        match self.outcome {
            Outcome::Hit { space, .. } => Some(space),
            Outcome::Miss => None,
        }
    }
}

/// Fixed-size ring with exact allocation (no growth).
struct RingBuffer {
    entries: Box<[Option<ResolutionRecord>]>,
    tail: usize,
    head: usize,
    len: usize,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            entries: std::iter::repeat_with(|| None)
                .take(capacity)
                .collect::<Box<[Option<ResolutionRecord>]>>(),
            tail: 0,
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, entry: ResolutionRecord) -> Option<ResolutionRecord> {
        let evicted = self.entries[self.tail].replace(entry);
        self.tail = (self.tail + 1) % self.entries.len();

        if self.len < self.entries.len() {
            self.len += 1;
        } else {
            self.head = (self.head + 1) % self.entries.len();
        }

        evicted
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &ResolutionRecord> {
        let head = self.head;
        let len = self.len;
        let cap = self.entries.len();

        (0..len).filter_map(move |i| {
            let idx = (head + i) % cap;
            self.entries[idx].as_ref()
        })
    }

    fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}

/// Ring-buffer journal of resolution outcomes.
///
/// Clones share the same underlying buffer and eviction counter.
pub struct ResolutionJournal {
    buffer: Arc<RwLock<RingBuffer>>,
    max_entries: usize,
    max_entry_bytes: usize,
    eviction_count: Arc<AtomicU64>,
}

impl ResolutionJournal {
    /// Create a journal.
    ///
    /// * `max_entries` - records kept before FIFO eviction (at least 1)
    /// * `max_entry_bytes` - byte budget per record for text fields
    pub fn new(max_entries: usize, max_entry_bytes: usize) -> Self {
        let bounded_entries = max_entries.max(1);
        Self {
            buffer: Arc::new(RwLock::new(RingBuffer::new(bounded_entries))),
            max_entries: bounded_entries,
            max_entry_bytes,
            eviction_count: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn read_buffer(&self) -> RwLockReadGuard<'_, RingBuffer> {
        match self.buffer.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[inline]
    fn write_buffer(&self) -> RwLockWriteGuard<'_, RingBuffer> {
        match self.buffer.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Record one resolution, evicting the oldest record when full.
    pub fn record(&self, ctx: &ResolveContext, value: StatusValue<'_>, outcome: Option<&StatusError>) {
        let entry = self.create_entry(ctx, value, outcome);

        let mut buffer = self.write_buffer();
        if buffer.push(entry).is_some() {
            self.eviction_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Build a bounded record. The byte budget is spent in priority order:
    /// name, details, operation, value, then metadata.
    fn create_entry(
        &self,
        ctx: &ResolveContext,
        value: StatusValue<'_>,
        outcome: Option<&StatusError>,
    ) -> ResolutionRecord {
        let mut size = 0usize;
        let mut remaining = self.max_entry_bytes;

        let mut take = |s: &str, cap: usize| -> Arc<str> {
            let t = truncate_to_bytes(s, remaining.min(cap));
            size += t.len();
            remaining = remaining.saturating_sub(t.len());
            Arc::from(t.as_ref())
        };

        let outcome = match outcome {
            Some(err) => {
                let log = err.log_entry(ctx);
                Outcome::Hit {
                    space: log.space(),
                    code: log.code(),
                    name: take(log.name(), 128),
                    details: take(log.details(), 512),
                }
            }
            None => Outcome::Miss,
        };

        let operation = take(ctx.operation(), 256);
        let rendered_value = value.to_string();
        let value = take(&rendered_value, 128);

        let mut metadata_vec: SmallVec<[(Arc<str>, Arc<str>); 8]> = SmallVec::new();
        for (k, v) in ctx.metadata() {
            let key_len = k.len();
            if key_len >= remaining {
                break;
            }
            let value_cap = (remaining - key_len).min(128);
            let v = truncate_to_bytes(v.as_str(), value_cap);
            let used = key_len + v.len();
            size += used;
            remaining = remaining.saturating_sub(used);

            metadata_vec.push((Arc::from(*k), Arc::from(v.as_ref())));
        }

        ResolutionRecord {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_millis() as u64),
            operation,
            value,
            outcome,
            metadata: metadata_vec.into_vec().into_boxed_slice().into(),
            size_bytes: size,
        }
    }

    /// The N most recent records, newest first.
    pub fn get_recent(&self, count: usize) -> Vec<ResolutionRecord> {
        let buffer = self.read_buffer();
        buffer.iter().rev().take(count).cloned().collect()
    }

    /// All records, newest first.
    pub fn get_all(&self) -> Vec<ResolutionRecord> {
        let buffer = self.read_buffer();
        buffer.iter().rev().cloned().collect()
    }

    /// Records matching a predicate, oldest first.
    pub fn get_filtered<F>(&self, predicate: F) -> Vec<ResolutionRecord>
    where
        F: Fn(&ResolutionRecord) -> bool,
    {
        let buffer = self.read_buffer();
        buffer.iter().filter(|e| predicate(e)).cloned().collect()
    }

    /// Hits attributed to one code space, oldest first.
    pub fn get_by_space(&self, space: &str) -> Vec<ResolutionRecord> {
        self.get_filtered(|e| e.space() == Some(space))
    }

    /// Number of misses currently retained.
    pub fn miss_count(&self) -> usize {
        let buffer = self.read_buffer();
        buffer.iter().filter(|e| !e.is_hit()).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.read_buffer().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload bytes (lower-bound estimate).
    pub fn payload_bytes(&self) -> usize {
        let buffer = self.read_buffer();
        buffer.iter().map(|e| e.size_bytes).sum()
    }

    /// Evictions since creation.
    #[inline]
    pub fn eviction_count(&self) -> u64 {
        self.eviction_count.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.write_buffer().clear();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.max_entries
    }
}

impl Clone for ResolutionJournal {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
            max_entries: self.max_entries,
            max_entry_bytes: self.max_entry_bytes,
            eviction_count: Arc::clone(&self.eviction_count),
        }
    }
}

impl std::fmt::Debug for ResolutionJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionJournal")
            .field("len", &self.len())
            .field("capacity", &self.max_entries)
            .field("max_entry_bytes", &self.max_entry_bytes)
            .field("evictions", &self.eviction_count())
            .finish()
    }
}

/// Truncate string to maximum byte length, respecting UTF-8 boundaries.
fn truncate_to_bytes(s: &str, max_bytes: usize) -> Cow<'_, str> {
    if max_bytes == 0 {
        return Cow::Borrowed("");
    }
    if s.len() <= max_bytes {
        return Cow::Borrowed(s);
    }

    let indicator = "...[TRUNC]";
    if max_bytes <= indicator.len() {
        return Cow::Borrowed(&indicator[..max_bytes]);
    }
    let max_content = max_bytes - indicator.len();

    let mut idx = max_content;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(indicator);
    }

    let mut out = String::with_capacity(idx + indicator.len());
    out.push_str(&s[..idx]);
    out.push_str(indicator);
    Cow::Owned(out)
}
