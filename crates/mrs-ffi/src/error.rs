use std::cell::RefCell;
use std::ffi::CString;

use mrs_engine::BridgeError;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `mrs_last_error`.
pub fn set_last_error(msg: impl Into<Vec<u8>>) {
    let mut bytes = msg.into();
    bytes.retain(|&b| b != 0);
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(bytes).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Record `err` for `mrs_last_error` and return its status code.
pub(crate) fn report(err: &BridgeError) -> i32 {
    set_last_error(err.to_string());
    err.status().code()
}
