//! Code space identity and status value canonicalization.
//!
//! A status value arrives off the wire with no type information attached to
//! its meaning: the same 32 bits may be handed over as `u32` by one stub and
//! as `i32` by another. Code spaces are keyed on the bit pattern, so every
//! accepted representation collapses to one canonical `u32` before lookup.
//!
//! # Shapes
//!
//! The set of representations is closed. A [`StatusValue`] is one of:
//!
//! - `U32`: unsigned 32-bit code
//! - `I32`: signed 32-bit code (reinterpreted, never sign-extended)
//! - `Text`: a string, which no numeric code space accepts
//! - `Unrecognized`: any other runtime type, identified by type name
//!
//! Each [`CodeSpace`] declares which numeric [`Shape`]s it accepts. Values of
//! any other shape never match that space.
//!
//! # Example
//!
//! ```rust
//! use rpc_status::{CodeSpace, Shapes, StatusValue};
//!
//! const DEMO: CodeSpace = CodeSpace::new("demo", Shapes::NUMERIC);
//!
//! assert_eq!(DEMO.canonicalize(StatusValue::from(-1_i32)), Some(0xFFFF_FFFF));
//! assert_eq!(DEMO.canonicalize(StatusValue::from(0xFFFF_FFFF_u32)), Some(0xFFFF_FFFF));
//! assert_eq!(DEMO.canonicalize(StatusValue::from("-1")), None);
//! ```

use std::any::Any;
use std::fmt;

// ============================================================================
// Shapes
// ============================================================================

/// A numeric representation a code space may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 32-bit integer.
    I32,
}

impl Shape {
    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Self::U32 => 0b01,
            Self::I32 => 0b10,
        }
    }

    /// Stable lowercase label.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::U32 => "u32",
            Self::I32 => "i32",
        }
    }
}

/// Set of [`Shape`]s accepted by a code space.
///
/// Const-constructible so code spaces can be declared as `const` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shapes(u8);

impl Shapes {
    /// Accepts nothing. A space declared with this never matches.
    pub const NONE: Shapes = Shapes(0);
    /// Unsigned 32-bit only.
    pub const UNSIGNED: Shapes = Shapes(0b01);
    /// Signed 32-bit only.
    pub const SIGNED: Shapes = Shapes(0b10);
    /// Both 32-bit representations.
    pub const NUMERIC: Shapes = Shapes(0b11);

    /// Add a shape to the set.
    #[inline]
    pub const fn with(self, shape: Shape) -> Self {
        Self(self.0 | shape.bit())
    }

    /// Check membership.
    #[inline]
    pub const fn contains(self, shape: Shape) -> bool {
        self.0 & shape.bit() != 0
    }

    /// True when no shape is accepted.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// ============================================================================
// Status Value
// ============================================================================

/// A raw status value as handed over by a caller.
///
/// This is the closed replacement for "any value": callers convert whatever
/// they hold into one of these variants, and code spaces decide per variant
/// whether they recognize it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusValue<'a> {
    /// Unsigned 32-bit code.
    U32(u32),
    /// Signed 32-bit code.
    I32(i32),
    /// Textual value. Never canonicalized.
    Text(&'a str),
    /// Any other runtime type, carried by type name for diagnostics.
    Unrecognized(&'static str),
}

impl<'a> StatusValue<'a> {
    /// Inspect a dynamically typed value.
    ///
    /// Recognizes `u32`, `i32`, `&str` and `String`. Everything else is
    /// reported as [`StatusValue::Unrecognized`]; no numeric coercion is
    /// attempted (an `i64` holding 5 is not code 5).
    pub fn from_any(value: &'a dyn Any) -> Self {
        if let Some(v) = value.downcast_ref::<u32>() {
            Self::U32(*v)
        } else if let Some(v) = value.downcast_ref::<i32>() {
            Self::I32(*v)
        } else if let Some(v) = value.downcast_ref::<&'static str>() {
            Self::Text(*v)
        } else if let Some(v) = value.downcast_ref::<String>() {
            Self::Text(v.as_str())
        } else {
            Self::Unrecognized("dyn Any")
        }
    }

    /// Placeholder for a value of type `T` that no code space can accept.
    #[inline]
    pub fn unrecognized<T: ?Sized>() -> Self {
        Self::Unrecognized(std::any::type_name::<T>())
    }

    /// The numeric shape of this value, if it has one.
    #[inline]
    pub const fn shape(&self) -> Option<Shape> {
        match self {
            Self::U32(_) => Some(Shape::U32),
            Self::I32(_) => Some(Shape::I32),
            Self::Text(_) | Self::Unrecognized(_) => None,
        }
    }

    /// Canonical bit pattern, regardless of which space would accept it.
    #[inline]
    pub const fn bit_pattern(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            Self::I32(v) => Some(*v as u32),
            Self::Text(_) | Self::Unrecognized(_) => None,
        }
    }
}

impl From<u32> for StatusValue<'_> {
    #[inline]
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<i32> for StatusValue<'_> {
    #[inline]
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl<'a> From<&'a str> for StatusValue<'a> {
    #[inline]
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for StatusValue<'a> {
    #[inline]
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl fmt::Display for StatusValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U32(v) => write!(f, "u32:0x{:08x}", v),
            Self::I32(v) => write!(f, "i32:0x{:08x}", *v as u32),
            Self::Text(s) => write!(f, "text:{:?}", s),
            Self::Unrecognized(ty) => write!(f, "unrecognized:{}", ty),
        }
    }
}

// ============================================================================
// Code Space (Identity)
// ============================================================================

/// One numeric error namespace.
///
/// Code spaces are plain const values so that independent components can
/// declare their own without central coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeSpace {
    name: &'static str,
    accepts: Shapes,
}

impl CodeSpace {
    /// Declare a code space.
    #[inline]
    pub const fn new(name: &'static str, accepts: Shapes) -> Self {
        Self { name, accepts }
    }

    /// Name used as the prefix of rendered errors (e.g. `hresult`).
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.name
    }

    /// Accepted shapes.
    #[inline]
    pub const fn accepts(&self) -> Shapes {
        self.accepts
    }

    /// Canonical code for `value` if its shape belongs to this space.
    #[inline]
    pub const fn canonicalize(&self, value: StatusValue<'_>) -> Option<u32> {
        match value.shape() {
            Some(shape) if self.accepts.contains(shape) => value.bit_pattern(),
            _ => None,
        }
    }
}

impl fmt::Display for CodeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Canonical code spaces used by MS-RPC return values.
pub mod spaces {
    use super::{CodeSpace, Shapes};

    /// HRESULT values (COM and DCOM methods).
    pub const HRESULT: CodeSpace = CodeSpace::new("hresult", Shapes::NUMERIC);

    /// NTSTATUS values (LSA, SAMR and other NT-native interfaces).
    pub const NTSTATUS: CodeSpace = CodeSpace::new("ntstatus", Shapes::NUMERIC);

    /// Win32 error codes (most RPC interfaces returning `DWORD`).
    pub const WIN32: CodeSpace = CodeSpace::new("win32", Shapes::NUMERIC);
}

// ============================================================================
// HRESULT Bit Fields
// ============================================================================

/// HRESULT with its bit fields exposed.
///
/// ```text
///  3 3 2 2 2 2 2 2 2 2 2 2 1 1 1 1 1 1 1 1 1 1
///  1 0 9 8 7 6 5 4 3 2 1 0 9 8 7 6 5 4 3 2 1 0 9 8 7 6 5 4 3 2 1 0
/// +-+-+-+-+-+---------------------+-------------------------------+
/// |S|R|C|N|X|      Facility       |              Code             |
/// +-+-+-+-+-+---------------------+-------------------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hresult(pub u32);

impl Hresult {
    const SEVERITY_BIT: u32 = 0x8000_0000;
    const N_BIT: u32 = 0x1000_0000;
    const WIN32_FACILITY: u32 = 7;

    /// Severity bit set.
    #[inline]
    pub const fn is_failure(self) -> bool {
        self.0 & Self::SEVERITY_BIT != 0
    }

    /// 11-bit facility.
    #[inline]
    pub const fn facility(self) -> u16 {
        ((self.0 >> 16) & 0x7FF) as u16
    }

    /// Low 16 bits.
    #[inline]
    pub const fn code(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// `HRESULT_FROM_WIN32`.
    ///
    /// Zero stays zero, and values that already carry the severity bit are
    /// assumed to be HRESULTs and pass through unchanged.
    #[inline]
    pub const fn from_win32(code: u32) -> Self {
        if code == 0 || code & Self::SEVERITY_BIT != 0 {
            Self(code)
        } else {
            Self((code & 0xFFFF) | (Self::WIN32_FACILITY << 16) | Self::SEVERITY_BIT)
        }
    }

    /// `HRESULT_FROM_NT`.
    #[inline]
    pub const fn from_nt(status: u32) -> Self {
        Self(status | Self::N_BIT)
    }
}

impl fmt::Display for Hresult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// NTSTATUS severity from the top two bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NtSeverity {
    /// `00`
    Success,
    /// `01`
    Informational,
    /// `10`
    Warning,
    /// `11`
    Error,
}

/// Severity of an NTSTATUS value.
#[inline]
pub const fn ntstatus_severity(status: u32) -> NtSeverity {
    match status >> 30 {
        0 => NtSeverity::Success,
        1 => NtSeverity::Informational,
        2 => NtSeverity::Warning,
        _ => NtSeverity::Error,
    }
}

// ============================================================================
// Tests
// ============================================================================
