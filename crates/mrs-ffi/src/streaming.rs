use std::ffi::CString;

use mrs_engine::{Flow, GenerateResult, Status, TokenSink};

use crate::types::Callbacks;

/// Adapts a C callback bundle to the engine's sink.
///
/// Tracks whether `on_done` went out so the boundary can deliver it for
/// failures that happen before the engine is reached.
pub(crate) struct CallbackSink {
    callbacks: Callbacks,
    done: bool,
}

impl CallbackSink {
    pub(crate) fn new(callbacks: Callbacks) -> Self {
        Self {
            callbacks,
            done: false,
        }
    }

    /// Deliver `on_done(status)` unless it was already delivered.
    pub(crate) fn finish(&mut self, status: i32) {
        if !self.done {
            self.deliver_done(status);
        }
    }

    fn deliver_done(&mut self, status: i32) {
        self.done = true;
        if let Some(cb) = self.callbacks.on_done {
            cb(status, self.callbacks.user_ctx);
        }
    }
}

impl TokenSink for CallbackSink {
    fn on_token(&mut self, fragment: &str) -> Flow {
        let Some(cb) = self.callbacks.on_token else {
            return Flow::Continue;
        };
        let text = to_c_string(fragment);
        if cb(text.as_ptr(), self.callbacks.user_ctx) == 0 {
            Flow::Continue
        } else {
            Flow::Stop
        }
    }

    fn on_done(&mut self, result: &GenerateResult) {
        self.deliver_done(Status::of(result).code());
    }
}

/// Convert a fragment for C, dropping interior NUL bytes.
fn to_c_string(fragment: &str) -> CString {
    match CString::new(fragment) {
        Ok(c) => c,
        Err(e) => {
            let mut bytes = e.into_vec();
            bytes.retain(|&b| b != 0);
            CString::new(bytes).unwrap_or_default()
        }
    }
}
