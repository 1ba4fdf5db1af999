//! Built-in code spaces for MS-RPC return values.
//!
//! RPC interfaces report failure through one of three numeric namespaces:
//!
//! - [`hresult`]: COM/DCOM methods (`E_*`, `RPC_E_*`, `WBEM_E_*`, ...)
//! - [`ntstatus`]: NT-native interfaces such as LSA and SAMR (`STATUS_*`)
//! - [`win32`]: most remaining interfaces returning a `DWORD` (`ERROR_*`)
//!
//! Each module carries a curated table of the codes these interfaces return
//! in practice. The complete upstream catalogs are external data; callers
//! that need them load their own rows with
//! [`StatusTable::from_entries`](crate::StatusTable::from_entries) and
//! register them ahead of, or instead of, these tables.
//!
//! # Governance
//!
//! Success codes are never listed: a zero return is not a failure indicator
//! and must not resolve to an error. Per-space range rules (HRESULT rows carry
//! the severity bit, NTSTATUS rows are warnings or errors, Win32 rows fit in
//! 16 bits) are checked by the `tests` module at the bottom of this file.
//!
//! # Registration Order
//!
//! [`register_builtin`] registers HRESULT, then NTSTATUS, then Win32. A small
//! value like `5` is therefore tried as an HRESULT first, does not match (no
//! HRESULT is that small), and resolves as `ERROR_ACCESS_DENIED`.

use crate::registry::{self, MapperRegistry, TableMapper};
use std::sync::{Arc, Once};

/// HRESULT values.
pub mod hresult {
    use crate::{StatusError, StatusTable, spaces, status_table};
    use std::sync::Arc;

    status_table! {
        /// Curated HRESULT table.
        pub static TABLE: &spaces::HRESULT;
        {
            0x8000_000A => ("E_PENDING", "The data necessary to complete this operation is not yet available."),
            0x8000_4001 => ("E_NOTIMPL", "Not implemented."),
            0x8000_4002 => ("E_NOINTERFACE", "No such interface supported."),
            0x8000_4003 => ("E_POINTER", "Invalid pointer."),
            0x8000_4004 => ("E_ABORT", "Operation aborted."),
            0x8000_4005 => ("E_FAIL", "Unspecified error."),
            0x8000_FFFF => ("E_UNEXPECTED", "Catastrophic failure."),
            0x8001_0105 => ("RPC_E_SERVERFAULT", "The server threw an exception."),
            0x8001_0108 => ("RPC_E_DISCONNECTED", "The object invoked has disconnected from its clients."),
            0x8001_011B => ("RPC_E_ACCESS_DENIED", "Access is denied."),
            0x8001_011F => ("RPC_E_TIMEOUT", "This operation returned because the time-out period expired."),
            0x8004_0110 => ("CLASS_E_NOAGGREGATION", "Class does not support aggregation (or class object is remote)."),
            0x8004_0154 => ("REGDB_E_CLASSNOTREG", "Class not registered."),
            0x8004_01F0 => ("CO_E_NOTINITIALIZED", "CoInitialize has not been called."),
            0x8004_1001 => ("WBEM_E_FAILED", "The call failed."),
            0x8004_1002 => ("WBEM_E_NOT_FOUND", "The object could not be found."),
            0x8004_1003 => ("WBEM_E_ACCESS_DENIED", "The current user does not have permission to perform the action."),
            0x8007_0005 => ("E_ACCESSDENIED", "General access denied error."),
            0x8007_0006 => ("E_HANDLE", "Invalid handle."),
            0x8007_000E => ("E_OUTOFMEMORY", "Ran out of memory."),
            0x8007_0057 => ("E_INVALIDARG", "One or more arguments are invalid."),
        }
    }

    /// Shared handle to the table.
    #[inline]
    pub fn table() -> Arc<StatusTable> {
        Arc::clone(&TABLE)
    }

    /// Structured error for a listed HRESULT.
    #[inline]
    pub fn from_code(code: u32) -> Option<StatusError> {
        TABLE.error_for(code)
    }
}

/// NTSTATUS values.
pub mod ntstatus {
    use crate::{StatusError, StatusTable, spaces, status_table};
    use std::sync::Arc;

    status_table! {
        /// Curated NTSTATUS table.
        pub static TABLE: &spaces::NTSTATUS;
        {
            0x8000_0005 => ("STATUS_BUFFER_OVERFLOW", "The data was too large to fit into the specified buffer."),
            0x8000_001A => ("STATUS_NO_MORE_ENTRIES", "No more entries are available from an enumeration operation."),
            0xC000_0001 => ("STATUS_UNSUCCESSFUL", "The requested operation was unsuccessful."),
            0xC000_0002 => ("STATUS_NOT_IMPLEMENTED", "The requested operation is not implemented."),
            0xC000_0008 => ("STATUS_INVALID_HANDLE", "An invalid HANDLE was specified."),
            0xC000_000D => ("STATUS_INVALID_PARAMETER", "An invalid parameter was passed to a service or function."),
            0xC000_0017 => ("STATUS_NO_MEMORY", "Not enough virtual memory or paging file quota is available to complete the specified operation."),
            0xC000_0022 => ("STATUS_ACCESS_DENIED", "A process has requested access to an object but has not been granted those access rights."),
            0xC000_0023 => ("STATUS_BUFFER_TOO_SMALL", "The buffer is too small to contain the entry. No information has been written to the buffer."),
            0xC000_0034 => ("STATUS_OBJECT_NAME_NOT_FOUND", "The object name is not found."),
            0xC000_0035 => ("STATUS_OBJECT_NAME_COLLISION", "The object name already exists."),
            0xC000_0064 => ("STATUS_NO_SUCH_USER", "The specified account does not exist."),
            0xC000_006A => ("STATUS_WRONG_PASSWORD", "When trying to update a password, this return status indicates that the value provided as the current password is not correct."),
            0xC000_006D => ("STATUS_LOGON_FAILURE", "The attempted logon is invalid. This is either due to a bad username or authentication information."),
            0xC000_0071 => ("STATUS_PASSWORD_EXPIRED", "The user account password has expired."),
            0xC000_0072 => ("STATUS_ACCOUNT_DISABLED", "The referenced account is currently disabled and cannot be logged on to."),
            0xC000_0073 => ("STATUS_NONE_MAPPED", "None of the information to be translated has been translated."),
            0xC000_0078 => ("STATUS_INVALID_SID", "The security ID structure is invalid."),
            0xC000_009A => ("STATUS_INSUFFICIENT_RESOURCES", "Insufficient system resources exist to complete the API."),
            0xC000_00BB => ("STATUS_NOT_SUPPORTED", "The request is not supported."),
            0xC000_00DF => ("STATUS_NO_SUCH_DOMAIN", "The specified domain did not exist."),
        }
    }

    /// Shared handle to the table.
    #[inline]
    pub fn table() -> Arc<StatusTable> {
        Arc::clone(&TABLE)
    }

    /// Structured error for a listed NTSTATUS.
    #[inline]
    pub fn from_code(code: u32) -> Option<StatusError> {
        TABLE.error_for(code)
    }
}

/// Win32 error codes.
pub mod win32 {
    use crate::{StatusError, StatusTable, spaces, status_table};
    use std::sync::Arc;

    status_table! {
        /// Curated Win32 error table.
        pub static TABLE: &spaces::WIN32;
        {
            1 => ("ERROR_INVALID_FUNCTION", "Incorrect function."),
            2 => ("ERROR_FILE_NOT_FOUND", "The system cannot find the file specified."),
            3 => ("ERROR_PATH_NOT_FOUND", "The system cannot find the path specified."),
            4 => ("ERROR_TOO_MANY_OPEN_FILES", "The system cannot open the file."),
            5 => ("ERROR_ACCESS_DENIED", "Access is denied."),
            6 => ("ERROR_INVALID_HANDLE", "The handle is invalid."),
            8 => ("ERROR_NOT_ENOUGH_MEMORY", "Not enough memory resources are available to process this command."),
            13 => ("ERROR_INVALID_DATA", "The data is invalid."),
            14 => ("ERROR_OUTOFMEMORY", "Not enough storage is available to complete this operation."),
            50 => ("ERROR_NOT_SUPPORTED", "The request is not supported."),
            53 => ("ERROR_BAD_NETPATH", "The network path was not found."),
            87 => ("ERROR_INVALID_PARAMETER", "The parameter is incorrect."),
            122 => ("ERROR_INSUFFICIENT_BUFFER", "The data area passed to a system call is too small."),
            123 => ("ERROR_INVALID_NAME", "The filename, directory name, or volume label syntax is incorrect."),
            124 => ("ERROR_INVALID_LEVEL", "The system call level is not correct."),
            183 => ("ERROR_ALREADY_EXISTS", "Cannot create a file when that file already exists."),
            234 => ("ERROR_MORE_DATA", "More data is available."),
            259 => ("ERROR_NO_MORE_ITEMS", "No more data is available."),
            1010 => ("ERROR_BADKEY", "The configuration registry key is invalid."),
            1011 => ("ERROR_CANTOPEN", "The configuration registry key could not be opened."),
            1012 => ("ERROR_CANTREAD", "The configuration registry key could not be read."),
            1056 => ("ERROR_SERVICE_ALREADY_RUNNING", "An instance of the service is already running."),
            1060 => ("ERROR_SERVICE_DOES_NOT_EXIST", "The specified service does not exist as an installed service."),
            1062 => ("ERROR_SERVICE_NOT_ACTIVE", "The service has not been started."),
            1317 => ("ERROR_NO_SUCH_USER", "The specified account does not exist."),
            1326 => ("ERROR_LOGON_FAILURE", "The user name or password is incorrect."),
            1332 => ("ERROR_NONE_MAPPED", "No mapping between account names and security IDs was done."),
            1355 => ("ERROR_NO_SUCH_DOMAIN", "The specified domain either does not exist or could not be contacted."),
            1722 => ("RPC_S_SERVER_UNAVAILABLE", "The RPC server is unavailable."),
            1726 => ("RPC_S_CALL_FAILED", "The remote procedure call failed."),
            1745 => ("RPC_S_UNKNOWN_IF", "The interface is unknown."),
            2221 => ("NERR_UserNotFound", "The user name could not be found."),
        }
    }

    /// Shared handle to the table.
    #[inline]
    pub fn table() -> Arc<StatusTable> {
        Arc::clone(&TABLE)
    }

    /// Structured error for a listed Win32 code.
    #[inline]
    pub fn from_code(code: u32) -> Option<StatusError> {
        TABLE.error_for(code)
    }
}

/// Register the built-in mappers on `registry`: HRESULT, NTSTATUS, Win32.
///
/// Calling this twice registers the mappers twice. Resolution results do not
/// change (the duplicates never get a chance to match), only the cost of a
/// miss does.
pub fn register_builtin(registry: &MapperRegistry) {
    registry.register(TableMapper::new(hresult::table()));
    registry.register(TableMapper::new(ntstatus::table()));
    registry.register(TableMapper::new(win32::table()));
}

/// Register the built-in mappers on the process-wide registry, once.
///
/// Safe to call from independent initialization code; only the first call
/// registers anything.
pub fn install() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| register_builtin(registry::global()));
}

/// Mapper over the built-in HRESULT table, for callers composing their own
/// registry order.
#[inline]
pub fn hresult_mapper() -> Arc<TableMapper> {
    Arc::new(TableMapper::new(hresult::table()))
}

// ============================================================================
// Governance Tests
// ============================================================================
