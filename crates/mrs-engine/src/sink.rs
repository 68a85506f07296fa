use crate::engine::GenerateResult;

/// What the sink wants after receiving a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Receiver for a streamed generation.
///
/// The engine calls `on_token` once per fragment, in order, from the thread
/// that called `generate`. `on_done` follows exactly once and is always the
/// last call, including when generation never started.
pub trait TokenSink {
    fn on_token(&mut self, fragment: &str) -> Flow;

    fn on_done(&mut self, _result: &GenerateResult) {}
}

/// Sink backed by a closure; `on_done` is ignored.
pub struct FnSink<F>(F);

/// Wrap a closure as a [`TokenSink`].
pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: FnMut(&str) -> Flow,
{
    FnSink(f)
}

impl<F> TokenSink for FnSink<F>
where
    F: FnMut(&str) -> Flow,
{
    fn on_token(&mut self, fragment: &str) -> Flow {
        (self.0)(fragment)
    }
}
