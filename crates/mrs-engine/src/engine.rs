use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use mrs_model::{DirectoryLoader, ModelId, ModelLoader, TextModel};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, GenerateParams};
use crate::error::BridgeError;
use crate::logging;
use crate::reentrancy::GenerationGuard;
use crate::sink::{Flow, TokenSink};

/// Why a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The model produced all of its output.
    Exhausted,
    /// The sink returned [`Flow::Stop`].
    Stopped,
    /// The model produced `max_tokens` fragments, counting empty ones.
    MaxTokens,
}

/// Summary of a generation that ran to an orderly end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Number of fragments handed to the sink.
    pub fragments: usize,
    pub finish: FinishReason,
}

pub type GenerateResult = Result<Completion, BridgeError>;

struct LoadedModel {
    id: ModelId,
    model: Arc<dyn TextModel>,
    // Serializes generations on this model.
    gate: Mutex<()>,
}

/// A loaded model, ready to be passed to [`Engine::generate`].
///
/// Cloning is cheap and clones share one generation gate.
#[derive(Clone)]
pub struct ModelHandle {
    inner: Arc<LoadedModel>,
}

impl ModelHandle {
    fn new(id: ModelId, model: Arc<dyn TextModel>) -> Self {
        Self {
            inner: Arc::new(LoadedModel {
                id,
                model,
                gate: Mutex::new(()),
            }),
        }
    }

    pub fn id(&self) -> &ModelId {
        &self.inner.id
    }

    pub fn name(&self) -> &str {
        self.inner.model.name()
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("id", &self.inner.id)
            .field("model", &self.inner.model.name())
            .finish()
    }
}

/// Loads models and drives streamed generations.
pub struct Engine {
    config: EngineConfig,
    loader: Arc<dyn ModelLoader>,
}

impl Engine {
    /// Engine serving models from directories on disk.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_loader(config, DirectoryLoader::new())
    }

    pub fn with_loader(config: EngineConfig, loader: impl ModelLoader + 'static) -> Self {
        Self {
            config,
            loader: Arc::new(loader),
        }
    }

    /// Install logging from `config`, then build a directory-backed engine.
    pub fn init(config: EngineConfig) -> Result<Self, BridgeError> {
        let installed = logging::init_logging(&config.log)?;
        info!(
            subscriber_installed = installed,
            max_tokens = config.generate.max_tokens,
            token_delay_ms = config.generate.token_delay.as_millis() as u64,
            "engine initialized"
        );
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve and load the model named by `model_id`.
    pub fn load_model(&self, model_id: &str) -> Result<ModelHandle, BridgeError> {
        let started = Instant::now();
        let id = ModelId::new(model_id).map_err(|source| BridgeError::ModelLoad {
            model_id: model_id.to_string(),
            source,
        })?;
        let model = self.loader.load(&id).map_err(|source| {
            warn!(model = %id, error = %source, "model load failed");
            BridgeError::ModelLoad {
                model_id: id.to_string(),
                source,
            }
        })?;
        info!(
            model = %id,
            name = model.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model loaded"
        );
        Ok(ModelHandle::new(id, model))
    }

    /// Stream a generation for `prompt` into `sink` with the configured
    /// parameters.
    pub fn generate(
        &self,
        model: &ModelHandle,
        prompt: &str,
        sink: &mut dyn TokenSink,
    ) -> GenerateResult {
        self.generate_with(model, prompt, &self.config.generate, sink)
    }

    /// Stream a generation for `prompt` into `sink`.
    ///
    /// Blocks until the sink has seen every fragment and its `on_done`.
    /// The returned result is the same value passed to `on_done`. Calls on
    /// the same model are serialized; a call made from inside a sink
    /// callback fails with [`BridgeError::Reentrant`].
    pub fn generate_with(
        &self,
        model: &ModelHandle,
        prompt: &str,
        params: &GenerateParams,
        sink: &mut dyn TokenSink,
    ) -> GenerateResult {
        match GenerationGuard::enter() {
            Some(guard) => self.generate_guarded(&guard, model, prompt, params, sink),
            None => {
                let result = Err(BridgeError::Reentrant);
                warn!(model = %model.id(), "re-entrant generation refused");
                sink.on_done(&result);
                result
            }
        }
    }

    /// [`Engine::generate_with`] for a caller that already holds this
    /// thread's [`GenerationGuard`] and keeps it until its own `on_done`
    /// delivery is over.
    pub fn generate_guarded(
        &self,
        _guard: &GenerationGuard,
        model: &ModelHandle,
        prompt: &str,
        params: &GenerateParams,
        sink: &mut dyn TokenSink,
    ) -> GenerateResult {
        let result = stream(model, prompt, params, sink);
        if let Err(e) = &result {
            warn!(model = %model.id(), error = %e, "generation failed");
        }
        sink.on_done(&result);
        result
    }
}

fn stream(
    model: &ModelHandle,
    prompt: &str,
    params: &GenerateParams,
    sink: &mut dyn TokenSink,
) -> GenerateResult {
    let _gate = model
        .inner
        .gate
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let started = Instant::now();

    let mut fragments = model
        .inner
        .model
        .fragments(prompt)
        .map_err(|source| BridgeError::Generate {
            delivered: 0,
            source,
        })?;

    // Every pulled fragment counts toward the cap, empty ones included, and
    // nothing is pulled once the cap is reached.
    let max = params.max_tokens as usize;
    let mut produced = 0usize;
    let mut delivered = 0usize;
    let finish = loop {
        if produced >= max {
            break FinishReason::MaxTokens;
        }
        let Some(item) = fragments.next() else {
            break FinishReason::Exhausted;
        };
        produced += 1;
        let fragment = item.map_err(|source| BridgeError::Generate { delivered, source })?;
        if fragment.is_empty() {
            continue;
        }
        if !params.token_delay.is_zero() {
            thread::sleep(params.token_delay);
        }
        delivered += 1;
        if sink.on_token(&fragment) == Flow::Stop {
            break FinishReason::Stopped;
        }
    };

    debug!(
        model = %model.id(),
        fragments = delivered,
        finish = ?finish,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generation finished"
    );
    Ok(Completion {
        fragments: delivered,
        finish,
    })
}
