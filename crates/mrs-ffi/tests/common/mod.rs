#![allow(dead_code)]

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};

use mrs_bridge::{mrs_free_string, mrs_generate_text, mrs_last_error, Callbacks};

/// Everything the callbacks observed during one `mrs_generate_text` call.
#[derive(Default)]
pub struct Recorder {
    pub tokens: Vec<String>,
    pub dones: Vec<i32>,
    pub stop_after: Option<usize>,
    pub token_after_done: bool,
    pub nested: Vec<i32>,
}

impl Recorder {
    pub fn stopping_after(k: usize) -> Self {
        Self {
            stop_after: Some(k),
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.tokens.concat()
    }
}

fn recorder<'a>(ctx: *mut c_void) -> &'a mut Recorder {
    unsafe { &mut *(ctx as *mut Recorder) }
}

pub extern "C" fn on_token(token: *const c_char, ctx: *mut c_void) -> c_int {
    let rec = recorder(ctx);
    if !rec.dones.is_empty() {
        rec.token_after_done = true;
    }
    let text = unsafe { CStr::from_ptr(token) }.to_string_lossy().into_owned();
    rec.tokens.push(text);
    match rec.stop_after {
        Some(k) if rec.tokens.len() >= k => 1,
        _ => 0,
    }
}

pub extern "C" fn on_done(status: i32, ctx: *mut c_void) {
    recorder(ctx).dones.push(status);
}

/// Token callback that tries to start another generation from inside.
pub extern "C" fn on_token_nested(_token: *const c_char, ctx: *mut c_void) -> c_int {
    let outer = recorder(ctx);
    let mut inner = Recorder::default();
    let prompt = CString::new("nested").unwrap();
    let status = unsafe { mrs_generate_text(prompt.as_ptr(), callbacks(&mut inner)) };
    outer.nested.push(status);
    outer.nested.extend(inner.dones);
    0
}

/// Done callback that records the status, then retries the generation.
pub extern "C" fn retry_on_done(status: i32, ctx: *mut c_void) {
    let outer = recorder(ctx);
    outer.dones.push(status);
    let mut inner = Recorder::default();
    let prompt = CString::new("retry from on_done").unwrap();
    let status = unsafe { mrs_generate_text(prompt.as_ptr(), callbacks(&mut inner)) };
    outer.nested.push(status);
    outer.nested.extend(inner.dones);
    outer.tokens.extend(inner.tokens);
}

pub fn callbacks(rec: &mut Recorder) -> Callbacks {
    Callbacks {
        on_token: Some(on_token),
        on_done: Some(on_done),
        user_ctx: rec as *mut Recorder as *mut c_void,
    }
}

/// Run `mrs_generate_text` with a fresh recorder.
pub fn generate(prompt: &str) -> (i32, Recorder) {
    generate_into(prompt, Recorder::default())
}

pub fn generate_into(prompt: &str, mut rec: Recorder) -> (i32, Recorder) {
    let prompt = CString::new(prompt).unwrap();
    let status = unsafe { mrs_generate_text(prompt.as_ptr(), callbacks(&mut rec)) };
    (status, rec)
}

/// Fetch and free the calling thread's last error message.
pub fn last_error() -> Option<String> {
    let ptr = mrs_last_error();
    if ptr.is_null() {
        return None;
    }
    let msg = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    unsafe { mrs_free_string(ptr) };
    Some(msg)
}

pub fn echo_of(prompt: &str) -> Vec<String> {
    ["Hello", ",", " ", "tokens", "!", "  You said: ", prompt]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
