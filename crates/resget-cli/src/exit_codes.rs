//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - a name, URL, priority or authentication was rejected
pub const VALIDATION_ERROR: i32 = 2;

/// Store error - the repository store is missing, corrupt or unwritable
pub const STORE_ERROR: i32 = 3;

/// Partial failure - some items of a batch failed, the rest succeeded
pub const PARTIAL_FAILURE: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
