use crate::error::{ModelError, Result};
use crate::model::{Fragments, TextModel};

const GREETING: [&str; 6] = ["Hello", ",", " ", "tokens", "!", "  You said: "];

/// Stand-in generator: streams a fixed greeting, then echoes the prompt.
///
/// This is what the bridge serves until a real engine is registered behind
/// a [`crate::ModelLoader`].
#[derive(Debug, Clone)]
pub struct EchoModel {
    name: String,
}

impl EchoModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl TextModel for EchoModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn fragments<'a>(&'a self, prompt: &'a str) -> Result<Fragments<'a>> {
        let iter = GREETING
            .iter()
            .map(|s| Ok((*s).to_string()))
            .chain(std::iter::once(Ok(prompt.to_string())));
        Ok(Box::new(iter))
    }
}

/// Generator that replays a fixed list of fragments, ignoring the prompt.
///
/// Optionally fails after emitting `fail_after` fragments, which lets hosts
/// exercise their error paths.
#[derive(Debug, Clone)]
pub struct ScriptedModel {
    name: String,
    script: Vec<String>,
    fail_after: Option<(usize, String)>,
}

impl ScriptedModel {
    pub fn new<I, S>(name: impl Into<String>, script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            script: script.into_iter().map(Into::into).collect(),
            fail_after: None,
        }
    }

    /// Emit `count` fragments, then yield a generation error with `message`.
    pub fn failing_after(mut self, count: usize, message: impl Into<String>) -> Self {
        self.fail_after = Some((count, message.into()));
        self
    }

    pub fn script(&self) -> &[String] {
        &self.script
    }
}

impl TextModel for ScriptedModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn fragments<'a>(&'a self, _prompt: &'a str) -> Result<Fragments<'a>> {
        match &self.fail_after {
            Some((0, message)) => Err(ModelError::Generation(message.clone())),
            Some((count, message)) => {
                let iter = self
                    .script
                    .iter()
                    .take(*count)
                    .map(|s| Ok(s.clone()))
                    .chain(std::iter::once(Err(ModelError::Generation(
                        message.clone(),
                    ))));
                Ok(Box::new(iter))
            }
            None => Ok(Box::new(self.script.iter().map(|s| Ok(s.clone())))),
        }
    }
}
