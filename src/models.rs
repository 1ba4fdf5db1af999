//! The structured error produced by a successful resolution.
//!
//! A [`StatusError`] is a plain value: the code space name, the canonical
//! code, the symbolic name and the description. It keeps no reference to the
//! table or mapper that produced it, so it can be cloned, compared, sent
//! across threads and returned from anywhere an error can be reported.
//!
//! # Textual Form
//!
//! `Display` renders a fixed template used for log diffing:
//!
//! ```text
//! <space>: <name> (0x<8 lowercase hex digits>): <details>
//! ```
//!
//! The rendering is deterministic for a given value. It is a diagnostic
//! format, not a wire contract.

use crate::{CodeSpace, ResolveContext, StatusLog, StatusTable};
use std::borrow::Cow;
use std::fmt;

/// Structured error for a status code found in some code space's table.
///
/// # Example
///
/// ```rust
/// use rpc_status::{StatusError, spaces};
///
/// let err = StatusError::new(&spaces::HRESULT, 5, "E_ACCESSDENIED", "Access is denied.");
/// assert_eq!(err.to_string(), "hresult: E_ACCESSDENIED (0x00000005): Access is denied.");
/// ```
#[must_use = "resolved status errors should be reported or logged"]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusError {
    space: &'static str,
    code: u32,
    name: Cow<'static, str>,
    details: Cow<'static, str>,
}

impl StatusError {
    /// Build a structured error directly. Always succeeds.
    #[inline]
    pub fn new(
        space: &CodeSpace,
        code: u32,
        name: impl Into<Cow<'static, str>>,
        details: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            space: space.as_str(),
            code,
            name: name.into(),
            details: details.into(),
        }
    }

    /// Look `code` up in `table` and build the error from the entry found.
    ///
    /// Returns `None` for an unlisted code. Absence is not a failure here:
    /// the caller decides whether an unmapped code means success, failure or
    /// "unknown".
    pub fn from_code(table: &StatusTable, code: u32) -> Option<Self> {
        let entry = table.lookup(code)?;
        let (name, details) = entry.text();
        Some(Self::new(table.space(), entry.code(), name, details))
    }

    /// Name of the code space that produced this error.
    #[inline]
    pub const fn space(&self) -> &'static str {
        self.space
    }

    /// Canonical code.
    #[inline]
    pub const fn code(&self) -> u32 {
        self.code
    }

    /// Symbolic name (e.g. `E_ACCESSDENIED`).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[inline]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Structured log view tying this error to the context it was resolved in.
    ///
    /// The returned view borrows from both and cannot outlive either.
    #[inline]
    pub fn log_entry<'a>(&'a self, ctx: &'a ResolveContext) -> StatusLog<'a> {
        StatusLog::new(self, ctx)
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (0x{:08x}): {}",
            self.space, self.name, self.code, self.details
        )
    }
}

impl std::error::Error for StatusError {}
