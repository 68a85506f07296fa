use std::sync::{Mutex, OnceLock, PoisonError, RwLock};

use mrs_engine::{BridgeError, Engine, EngineConfig, ModelHandle};
use tracing::info;

static BRIDGE: OnceLock<Bridge> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Process-wide state behind the C entry points: the engine and the model
/// most recently activated by `mrs_model_run`.
pub struct Bridge {
    engine: Engine,
    active: RwLock<Option<ModelHandle>>,
}

impl Bridge {
    fn new(engine: Engine) -> Self {
        Self {
            engine,
            active: RwLock::new(None),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The active model. The returned handle stays valid if another caller
    /// activates a different model meanwhile.
    pub fn active_model(&self) -> Result<ModelHandle, BridgeError> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(BridgeError::ModelNotLoaded)
    }

    pub fn activate(&self, model: ModelHandle) {
        info!(model = %model.id(), "model activated");
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(model);
    }
}

/// Initialize the bridge from the environment. Later calls are no-ops; a
/// failed call leaves the bridge uninitialized.
pub fn init() -> Result<&'static Bridge, BridgeError> {
    if let Some(bridge) = BRIDGE.get() {
        return Ok(bridge);
    }
    let _lock = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(bridge) = BRIDGE.get() {
        return Ok(bridge);
    }
    let config = EngineConfig::from_env()?;
    let engine = Engine::init(config)?;
    Ok(BRIDGE.get_or_init(|| Bridge::new(engine)))
}

/// The initialized bridge.
pub fn bridge() -> Result<&'static Bridge, BridgeError> {
    BRIDGE.get().ok_or(BridgeError::NotInitialized)
}

/// Install `engine` as the bridge unless one is already installed.
#[cfg(test)]
pub(crate) fn init_with(engine: Engine) -> &'static Bridge {
    BRIDGE.get_or_init(|| Bridge::new(engine))
}
