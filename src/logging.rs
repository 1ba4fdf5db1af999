//! Structured log view for resolved status errors.
//!
//! [`StatusLog`] borrows the error and the [`ResolveContext`] it was resolved
//! in. It cannot outlive either, so a logger has to consume it during the
//! logging call. Fields are exposed individually for structured loggers, and
//! [`StatusLog::write_to`] renders a bounded single-line form without
//! intermediate allocation when no field needs truncating.
//!
//! Context metadata values are held in [`ContextField`], which zeroizes owned
//! data on drop. Correlation identifiers and session tags travel in metadata
//! and should not linger in freed memory.

use crate::{ResolveContext, StatusError};
use std::borrow::Cow;
use std::fmt;
use zeroize::Zeroize;

/// Maximum length for any individual field in formatted output
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Metadata value wrapper with zeroization for owned data.
///
/// Borrowed values are assumed static and are not zeroized.
#[derive(Debug, Clone)]
pub struct ContextField {
    value: Cow<'static, str>,
}

impl ContextField {
    #[inline]
    pub fn as_str(&self) -> &str {
        self.value.as_ref()
    }
}

impl From<&'static str> for ContextField {
    fn from(value: &'static str) -> Self {
        Self {
            value: Cow::Borrowed(value),
        }
    }
}

impl From<String> for ContextField {
    fn from(value: String) -> Self {
        Self {
            value: Cow::Owned(value),
        }
    }
}

impl From<Cow<'static, str>> for ContextField {
    fn from(value: Cow<'static, str>) -> Self {
        Self { value }
    }
}

impl Zeroize for ContextField {
    fn zeroize(&mut self) {
        if let Cow::Owned(ref mut s) = self.value {
            s.zeroize();
        }
    }
}

impl Drop for ContextField {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Structured log entry borrowing a [`StatusError`] and its [`ResolveContext`].
///
/// # Example
///
/// ```rust
/// use rpc_status::{ResolveContext, StatusError, spaces};
///
/// let ctx = ResolveContext::for_operation("winreg.BaseRegOpenKey").with_metadata("call_id", "17");
/// let err = StatusError::new(&spaces::WIN32, 2, "ERROR_FILE_NOT_FOUND", "The system cannot find the file specified.");
///
/// let mut line = String::new();
/// err.log_entry(&ctx).write_to(&mut line).unwrap();
/// assert!(line.starts_with("[win32:0x00000002] name='ERROR_FILE_NOT_FOUND'"));
/// assert!(line.ends_with("call_id='17'"));
/// ```
#[derive(Debug)]
pub struct StatusLog<'a> {
    error: &'a StatusError,
    ctx: &'a ResolveContext,
}

impl<'a> StatusLog<'a> {
    #[inline]
    pub(crate) const fn new(error: &'a StatusError, ctx: &'a ResolveContext) -> Self {
        Self { error, ctx }
    }

    /// Format for human-readable logs in trusted debug contexts.
    ///
    /// Materializes metadata values into a String. Only available with the
    /// `trusted_debug` feature AND debug assertions enabled.
    #[cfg(all(feature = "trusted_debug", debug_assertions))]
    pub fn format_for_trusted_debug(&self) -> String {
        let mut output = self.error.to_string();
        output.push_str(&format!(
            " operation='{}'",
            truncate_with_indicator(self.operation())
        ));
        for (key, value) in self.metadata() {
            output.push_str(&format!(" {}='{}'", key, value.as_str()));
        }
        output
    }

    /// Write structured log data to a formatter.
    ///
    /// Every field is truncated to a bounded length on a UTF-8 boundary.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{}:0x{:08x}] name='{}' details='{}'",
            self.error.space(),
            self.error.code(),
            truncate_with_indicator(self.error.name()),
            truncate_with_indicator(self.error.details())
        )?;

        if !self.operation().is_empty() {
            write!(f, " operation='{}'", truncate_with_indicator(self.operation()))?;
        }

        for (key, value) in self.metadata() {
            write!(f, " {}='{}'", key, truncate_with_indicator(value.as_str()))?;
        }

        Ok(())
    }

    // Accessors for structured logging. Fields are not truncated here;
    // truncation is the logging framework's job when it serializes.

    #[inline]
    pub const fn error(&self) -> &StatusError {
        self.error
    }

    #[inline]
    pub const fn space(&self) -> &'static str {
        self.error.space()
    }

    #[inline]
    pub const fn code(&self) -> u32 {
        self.error.code()
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.error.name()
    }

    #[inline]
    pub fn details(&self) -> &str {
        self.error.details()
    }

    #[inline]
    pub fn operation(&self) -> &str {
        self.ctx.operation()
    }

    #[inline]
    pub fn metadata(&self) -> &[(&'static str, ContextField)] {
        self.ctx.metadata()
    }
}

/// Truncate a string for display to bound log line size.
///
/// Returns a Cow<str> to avoid allocation when no truncation is needed.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    // Last char boundary at or before the limit
    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}
