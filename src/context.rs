//! Resolution context.
//!
//! Call-dispatch layers pass a context along with every status value they
//! resolve, following the propagation conventions of the surrounding system.
//! The context never influences which mapper matches. It only annotates what
//! gets logged and journaled: the operation that produced the status value
//! and a few correlation fields (call id, peer, session tag).
//!
//! # Example
//!
//! ```rust
//! use rpc_status::ResolveContext;
//!
//! let ctx = ResolveContext::for_operation("svcctl.ROpenServiceW")
//!     .with_metadata("call_id", "42")
//!     .with_metadata("peer", String::from("dc01.corp.local"));
//!
//! assert_eq!(ctx.operation(), "svcctl.ROpenServiceW");
//! assert_eq!(ctx.metadata_value("peer"), Some("dc01.corp.local"));
//! ```

use crate::ContextField;
use smallvec::SmallVec;
use std::borrow::Cow;
use zeroize::Zeroize;

/// Context accompanying a resolution request.
///
/// Metadata keys are `&'static str` so the set of keys stays greppable.
/// Owned metadata values are zeroized when the context drops.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    operation: Cow<'static, str>,
    metadata: SmallVec<[(&'static str, ContextField); 4]>,
}

impl ResolveContext {
    /// Empty context, for callers with nothing to propagate.
    #[inline]
    pub fn background() -> Self {
        Self::default()
    }

    /// Context naming the operation whose status value is being resolved.
    #[inline]
    pub fn for_operation(operation: impl Into<Cow<'static, str>>) -> Self {
        Self {
            operation: operation.into(),
            metadata: SmallVec::new(),
        }
    }

    /// Add a correlation field. Later values for the same key do not replace
    /// earlier ones; both are kept in insertion order.
    #[inline]
    pub fn with_metadata(mut self, key: &'static str, value: impl Into<Cow<'static, str>>) -> Self {
        self.metadata.push((key, ContextField::from(value.into())));
        self
    }

    /// Operation name, empty for a background context.
    #[inline]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    #[inline]
    pub fn metadata(&self) -> &[(&'static str, ContextField)] {
        &self.metadata
    }

    /// First value recorded under `key`.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Drop for ResolveContext {
    fn drop(&mut self) {
        if let Cow::Owned(ref mut s) = self.operation {
            s.zeroize();
        }
        // ContextField zeroizes itself on drop
        self.metadata.clear();
    }
}
