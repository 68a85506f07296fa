use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static IN_GENERATION: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as delivering a generation.
///
/// Held across every sink call, so a sink that calls back into the engine is
/// refused instead of deadlocking on the model gate. Boundaries that deliver
/// `on_done` themselves take the guard first and hand it to
/// [`crate::Engine::generate_guarded`].
#[derive(Debug)]
pub struct GenerationGuard {
    // Tied to the thread that set the flag.
    _not_send: PhantomData<*const ()>,
}

impl GenerationGuard {
    /// Returns `None` if this thread already holds a guard.
    pub fn enter() -> Option<GenerationGuard> {
        IN_GENERATION.with(|flag| {
            if flag.get() {
                None
            } else {
                flag.set(true);
                Some(GenerationGuard {
                    _not_send: PhantomData,
                })
            }
        })
    }
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        IN_GENERATION.with(|flag| flag.set(false));
    }
}

/// Returns true while the calling thread is inside a generation.
pub fn in_generation() -> bool {
    IN_GENERATION.with(Cell::get)
}
