//! Declaration macro for static status tables.
//!
//! Generated code-space data is usually a long list of literal rows. The
//! [`status_table!`](crate::status_table) macro turns such a list into a
//! lazily built `static` table, so the sort and duplicate resolution run once
//! on first use and every later reader shares the same `Arc<StatusTable>`.
//!
//! # Usage
//!
//! ```rust
//! use rpc_status::{status_table, spaces};
//!
//! status_table! {
//!     /// Service control manager failures.
//!     pub static SCM_ERRORS: &spaces::WIN32;
//!     {
//!         1060 => ("ERROR_SERVICE_DOES_NOT_EXIST", "The specified service does not exist as an installed service."),
//!         1056 => ("ERROR_SERVICE_ALREADY_RUNNING", "An instance of the service is already running."),
//!     }
//! }
//!
//! assert_eq!(SCM_ERRORS.len(), 2);
//! assert_eq!(SCM_ERRORS.lookup(1056).map(|e| e.name()), Some("ERROR_SERVICE_ALREADY_RUNNING"));
//! ```
//!
//! A duplicate policy other than the default is given with `policy = ...;`
//! after the space:
//!
//! ```rust
//! use rpc_status::{DuplicatePolicy, status_table, spaces};
//!
//! status_table! {
//!     static FIRST: &spaces::NTSTATUS; policy = DuplicatePolicy::FirstWins;
//!     {
//!         0xC000_0022 => ("STATUS_ACCESS_DENIED", "first"),
//!         0xC000_0022 => ("STATUS_ACCESS_DENIED", "second"),
//!     }
//! }
//!
//! assert_eq!(FIRST.lookup(0xC000_0022).map(|e| e.description()), Some("first"));
//! ```
//!
//! Rows must be literals. Tables assembled at run time go through
//! [`StatusTable::from_entries`](crate::StatusTable::from_entries) instead.

/// Declare a lazily built `static` [`StatusTable`](crate::StatusTable).
///
/// The static has type `LazyLock<Arc<StatusTable>>`; clone the `Arc` to hand
/// the table to a [`TableMapper`](crate::TableMapper).
#[macro_export]
macro_rules! status_table {
    (
        $(#[$meta:meta])*
        $vis:vis static $name:ident: $space:expr; policy = $policy:expr;
        { $($code:expr => ($sym:literal, $desc:literal)),* $(,)? }
    ) => {
        $(#[$meta])*
        $vis static $name: ::std::sync::LazyLock<::std::sync::Arc<$crate::StatusTable>> =
            ::std::sync::LazyLock::new(|| {
                static ENTRIES: &[$crate::StatusEntry] = &[
                    $($crate::StatusEntry::new($code, $sym, $desc)),*
                ];
                ::std::sync::Arc::new($crate::StatusTable::from_static($space, ENTRIES, $policy))
            });
    };
    (
        $(#[$meta:meta])*
        $vis:vis static $name:ident: $space:expr;
        { $($code:expr => ($sym:literal, $desc:literal)),* $(,)? }
    ) => {
        $crate::status_table! {
            $(#[$meta])*
            $vis static $name: $space; policy = $crate::DuplicatePolicy::LastWins;
            { $($code => ($sym, $desc)),* }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{DuplicatePolicy, MapperRegistry, ResolveContext, TableMapper, spaces};
    use std::sync::Arc;

    status_table! {
        static DEMO: &spaces::WIN32;
        {
            5 => ("ERROR_ACCESS_DENIED", "Access is denied."),
            2 => ("ERROR_FILE_NOT_FOUND", "The system cannot find the file specified."),
            5 => ("ERROR_ACCESS_DENIED", "Access is denied (later row)."),
        }
    }

    status_table! {
        static FIRST: &spaces::WIN32; policy = DuplicatePolicy::FirstWins;
        {
            5 => ("ERROR_ACCESS_DENIED", "Access is denied."),
            5 => ("ERROR_ACCESS_DENIED", "Access is denied (later row)."),
        }
    }

    status_table! {
        static EMPTY: &spaces::HRESULT;
        {}
    }

    #[test]
    fn macro_table_defaults_to_last_wins() {
        assert_eq!(DEMO.len(), 2);
        assert_eq!(DEMO.duplicates_collapsed(), 1);
        assert_eq!(
            DEMO.lookup(5).map(|e| e.description()),
            Some("Access is denied (later row).")
        );
        assert_eq!(DEMO.space().as_str(), "win32");
    }

    #[test]
    fn macro_table_honors_explicit_policy() {
        assert_eq!(FIRST.lookup(5).map(|e| e.description()), Some("Access is denied."));
    }

    #[test]
    fn empty_macro_table() {
        assert!(EMPTY.is_empty());
    }

    #[test]
    fn macro_table_is_shared_not_rebuilt() {
        let a = Arc::clone(&DEMO);
        let b = Arc::clone(&DEMO);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn macro_table_plugs_into_registry() {
        let registry = MapperRegistry::new();
        registry.register(TableMapper::new(Arc::clone(&DEMO)));

        let err = registry
            .resolve(&ResolveContext::background(), 2_i32)
            .expect("listed code");
        assert_eq!(err.name(), "ERROR_FILE_NOT_FOUND");
    }
}
