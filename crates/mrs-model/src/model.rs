use crate::error::Result;

/// Lazily produced sequence of text fragments.
pub type Fragments<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

/// Trait for text generators that can stream output for a prompt.
///
/// Implementations only produce fragments. Ordering, delivery, stop
/// handling and serialization of concurrent callers are owned by the engine
/// that drives them.
pub trait TextModel: Send + Sync {
    /// Returns a short name for this model, used in logs.
    fn name(&self) -> &str;

    /// Start producing fragments for `prompt`.
    ///
    /// Returns an error if generation cannot start at all. Failures after the
    /// first fragment are reported through the iterator, and the engine stops
    /// pulling after the first `Err`.
    fn fragments<'a>(&'a self, prompt: &'a str) -> Result<Fragments<'a>>;
}
