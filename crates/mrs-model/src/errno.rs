//! Diagnostic codes written to the `out_errno` slot of `mrs_model_run`.
//!
//! Zero means success. Positive values are OS `errno` values lifted from I/O
//! errors. Negative values are the sentinels below.

pub const NONE: i32 = 0;
/// Panic or otherwise uncategorized failure.
pub const UNSPECIFIED: i32 = -1;
pub const NULL_ARGUMENT: i32 = -2;
pub const INVALID_UTF8: i32 = -3;
pub const NOT_INITIALIZED: i32 = -4;
pub const EMPTY_MODEL_ID: i32 = -5;
pub const MODEL_NOT_FOUND: i32 = -6;
pub const NOT_A_DIRECTORY: i32 = -7;
pub const INIT_FAILED: i32 = -8;

/// Map an I/O error onto the diagnostic table.
pub fn from_io(err: &std::io::Error) -> i32 {
    match err.raw_os_error() {
        Some(code) if code > 0 => code,
        _ => UNSPECIFIED,
    }
}
