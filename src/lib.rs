//! # RPC Status
//!
//! Pluggable resolution of numeric RPC status codes into structured errors.
//!
//! MS-RPC interface stubs hand back a raw 32-bit return value. Whether that
//! value is an HRESULT, an NTSTATUS or a Win32 error depends on the interface,
//! and the stub may surface it as `u32` or `i32`. This crate keeps one
//! read-only table per code space and an ordered registry of mappers that
//! decide, value by value, which space recognizes it.
//!
//! ## Design Principles
//!
//! 1. **Tables are immutable** after a one-time bulk load, so lookups need no locking
//! 2. **Registration order is resolution order**, first match wins
//! 3. **A miss is not a failure**: unknown codes and foreign shapes resolve to `None`
//! 4. **Signed and unsigned inputs agree**: keys are the 32-bit pattern
//! 5. **Errors are plain values** with no back-reference to their table
//!
//! ## Quick Start
//!
//! ```rust
//! use rpc_status::{MapperRegistry, ResolveContext, definitions};
//!
//! let registry = MapperRegistry::new();
//! definitions::register_builtin(&registry);
//!
//! let ctx = ResolveContext::for_operation("lsarpc.LsarOpenPolicy2");
//! let err = registry.resolve(&ctx, 0xC000_0022_u32 as i32).expect("listed code");
//!
//! assert_eq!(err.space(), "ntstatus");
//! assert_eq!(err.name(), "STATUS_ACCESS_DENIED");
//!
//! // Success and unknown codes are not errors.
//! assert!(registry.resolve(&ctx, 0_u32).is_none());
//! ```
//!
//! ## Custom Code Spaces
//!
//! ```rust
//! use std::sync::Arc;
//! use rpc_status::{CodeSpace, MapperRegistry, ResolveContext, Shapes, TableMapper, status_table};
//!
//! const EPM: CodeSpace = CodeSpace::new("epm", Shapes::UNSIGNED);
//!
//! status_table! {
//!     static EPM_ERRORS: &EPM;
//!     {
//!         0x16c9a0d6 => ("EPT_S_NOT_REGISTERED", "There are no more endpoints available from the endpoint mapper."),
//!     }
//! }
//!
//! let registry = MapperRegistry::new();
//! registry.register(TableMapper::new(Arc::clone(&EPM_ERRORS)));
//!
//! let err = registry.resolve(&ResolveContext::background(), 0x16c9a0d6_u32);
//! assert_eq!(err.map(|e| e.space()), Some("epm"));
//! ```
//!
//! ## Features
//!
//! - `builtin_tables` (default): HRESULT, NTSTATUS and Win32 code spaces in [`definitions`]
//! - `trusted_debug`: [`StatusLog::format_for_trusted_debug`] in debug builds

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codes;
pub mod context;
pub mod convenience;
#[cfg(feature = "builtin_tables")]
pub mod definitions;
pub mod logging;
pub mod models;
pub mod registry;
pub mod ring_buffer;
pub mod table;

pub use codes::*;
pub use context::*;
pub use logging::*;
pub use models::*;
pub use registry::{Mapper, MapperRegistry, TableMapper};
pub use ring_buffer::*;
pub use table::*;
