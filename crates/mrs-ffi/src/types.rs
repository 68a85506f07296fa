use std::os::raw::{c_char, c_int, c_void};

use mrs_engine::Status;

/// Status codes returned by every FFI function.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MrsStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorNotInitialized = 2,
    ErrorInitFailed = 3,
    ErrorModelLoad = 4,
    ErrorModelNotLoaded = 5,
    ErrorGenerate = 6,
    ErrorReentrant = 7,
    ErrorInternal = 8,
}

impl From<Status> for MrsStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => MrsStatus::Ok,
            Status::InvalidArgument => MrsStatus::ErrorInvalidArgument,
            Status::NotInitialized => MrsStatus::ErrorNotInitialized,
            Status::InitFailed => MrsStatus::ErrorInitFailed,
            Status::ModelLoad => MrsStatus::ErrorModelLoad,
            Status::ModelNotLoaded => MrsStatus::ErrorModelNotLoaded,
            Status::Generate => MrsStatus::ErrorGenerate,
            Status::Reentrant => MrsStatus::ErrorReentrant,
            Status::Internal => MrsStatus::ErrorInternal,
        }
    }
}

// Diagnostic codes written through `out_errno` by `mrs_model_run`.
// Positive values are OS errno values.
pub const MRS_ERRNO_NONE: i32 = 0;
pub const MRS_ERRNO_UNSPECIFIED: i32 = -1;
pub const MRS_ERRNO_NULL_ARGUMENT: i32 = -2;
pub const MRS_ERRNO_INVALID_UTF8: i32 = -3;
pub const MRS_ERRNO_NOT_INITIALIZED: i32 = -4;
pub const MRS_ERRNO_EMPTY_MODEL_ID: i32 = -5;
pub const MRS_ERRNO_MODEL_NOT_FOUND: i32 = -6;
pub const MRS_ERRNO_NOT_A_DIRECTORY: i32 = -7;
pub const MRS_ERRNO_INIT_FAILED: i32 = -8;

/// Receives one generated fragment as a NUL-terminated UTF-8 string.
/// Returning non-zero stops generation.
pub type MrsTokenCallback =
    Option<extern "C" fn(token_utf8: *const c_char, user_ctx: *mut c_void) -> c_int>;

/// Receives the final status of a generation. Always the last call.
pub type MrsDoneCallback = Option<extern "C" fn(status: i32, user_ctx: *mut c_void)>;

/// Callback bundle passed by value to `mrs_generate_text`.
///
/// `user_ctx` is handed back to both callbacks untouched and is not kept
/// once `mrs_generate_text` returns.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Callbacks {
    pub on_token: MrsTokenCallback,
    pub on_done: MrsDoneCallback,
    pub user_ctx: *mut c_void,
}
