mod context;
mod error;
mod streaming;
mod types;

pub use error::{set_last_error, take_last_error};
pub use types::*;

use std::any::Any;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe, UnwindSafe};

use mrs_engine::{errno, ArgumentError, BridgeError, GenerateResult, GenerationGuard};
use tracing::{debug, error};

use crate::error::report;
use crate::streaming::CallbackSink;

/// Run `f`, turning a panic into [`BridgeError::Internal`].
fn catch_panic<T, F>(f: F) -> Result<T, BridgeError>
where
    F: FnOnce() -> Result<T, BridgeError> + UnwindSafe,
{
    catch_unwind(f).unwrap_or_else(|payload| {
        let message = panic_message(&*payload);
        error!(panic = %message, "panic caught at the FFI boundary");
        Err(BridgeError::Internal(message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Borrow a C string argument as UTF-8.
unsafe fn str_arg<'a>(ptr: *const c_char, name: &'static str) -> Result<&'a str, BridgeError> {
    if ptr.is_null() {
        return Err(ArgumentError::Null(name).into());
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|source| ArgumentError::Utf8 { name, source }.into())
}

/// Initialize the process-wide engine.
///
/// Reads the `MRS_*` environment variables and installs logging. Safe to call
/// any number of times: once it has succeeded, later calls return `Ok`
/// without doing anything. A failed call may be retried.
#[no_mangle]
pub extern "C" fn mrs_init_engine() -> i32 {
    match catch_panic(|| context::init().map(|_| ())) {
        Ok(()) => MrsStatus::Ok as i32,
        Err(e) => report(&e),
    }
}

/// Generate text for `prompt` using the active model, streaming through `cbs`.
///
/// Blocks until generation ends. `on_token` is invoked once per fragment, in
/// order, on the calling thread; a non-zero return stops generation.
/// `on_done` is invoked exactly once, last, on every path, including when
/// generation never starts. The return value equals the status passed to
/// `on_done`. Calling this from inside either callback fails with
/// `MRS_STATUS_ERROR_REENTRANT`.
///
/// # Safety
///
/// `prompt` must be null or point to a NUL-terminated string. The callbacks
/// must be safe to call with `cbs.user_ctx` until this function returns.
#[no_mangle]
pub unsafe extern "C" fn mrs_generate_text(prompt: *const c_char, cbs: Callbacks) -> i32 {
    let mut sink = CallbackSink::new(cbs);
    // Held until `on_done` has returned, so the callback cannot start a
    // nested generation on any path.
    let Some(guard) = GenerationGuard::enter() else {
        let status = report(&BridgeError::Reentrant);
        sink.finish(status);
        return status;
    };
    let result = catch_panic(AssertUnwindSafe(|| unsafe {
        generate(&guard, prompt, &mut sink)
    }));
    let status = match &result {
        Ok(completion) => {
            debug!(fragments = completion.fragments, "mrs_generate_text done");
            MrsStatus::Ok as i32
        }
        Err(e) => report(e),
    };
    sink.finish(status);
    drop(guard);
    status
}

unsafe fn generate(
    guard: &GenerationGuard,
    prompt: *const c_char,
    sink: &mut CallbackSink,
) -> GenerateResult {
    let bridge = context::bridge()?;
    let prompt = unsafe { str_arg(prompt, "prompt") }?;
    let model = bridge.active_model()?;
    let engine = bridge.engine();
    engine.generate_guarded(guard, &model, prompt, &engine.config().generate, sink)
}

/// Load the model named by `model_id` and make it the active model.
///
/// For the default loader `model_id` is a model directory path. Returns
/// `MRS_STATUS_OK` on success. On failure the previously active model, if
/// any, stays active. When `out_errno` is non-null it always receives a
/// diagnostic code: `0` on success, a positive OS errno, or one of the
/// negative `MRS_ERRNO_*` sentinels.
///
/// # Safety
///
/// `model_id` must be null or point to a NUL-terminated string. `out_errno`
/// must be null or valid for a write of one `int32_t`.
#[no_mangle]
pub unsafe extern "C" fn mrs_model_run(model_id: *const c_char, out_errno: *mut i32) -> i32 {
    let (status, diagnostic) = match catch_panic(|| unsafe { run_model(model_id) }) {
        Ok(()) => (MrsStatus::Ok as i32, errno::NONE),
        Err(e) => (report(&e), e.errno()),
    };
    if !out_errno.is_null() {
        unsafe { *out_errno = diagnostic };
    }
    status
}

unsafe fn run_model(model_id: *const c_char) -> Result<(), BridgeError> {
    let bridge = context::bridge()?;
    let model_id = unsafe { str_arg(model_id, "model_id") }?;
    let model = bridge.engine().load_model(model_id)?;
    bridge.activate(model);
    Ok(())
}

/// Retrieve the last error message recorded on the calling thread.
///
/// Returns null if there is none. Retrieval clears the message. The caller
/// must free the returned string with `mrs_free_string`.
#[no_mangle]
pub extern "C" fn mrs_last_error() -> *mut c_char {
    match take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by `mrs_last_error`.
///
/// # Safety
///
/// `s` must be null or a pointer obtained from `mrs_last_error` that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn mrs_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}
