//! Ctrl-C while an action runs
//!
//! The terminal sends SIGINT to the whole foreground process group, so the menu receives it
//! along with the child. SIGINT keeps its default action while no child is running; while a
//! [`ChildGuard`] is held it is swallowed and only the child reacts to it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use log::warn;
use parking_lot::Mutex;

/// Set while no child is running; SIGINT terminates the menu only then
static IDLE: LazyLock<Arc<AtomicBool>> = LazyLock::new(|| {
    let idle = Arc::new(AtomicBool::new(true));
    register(&idle);
    idle
});

static RUNNING: Mutex<usize> = parking_lot::const_mutex(0);

#[cfg(unix)]
fn register(idle: &Arc<AtomicBool>) {
    use signal_hook::consts::SIGINT;
    if let Err(e) = signal_hook::flag::register_conditional_default(SIGINT, Arc::clone(idle)) {
        warn!("Unable to keep the menu alive across interrupts: {e}");
    }
}

#[cfg(not(unix))]
fn register(_idle: &Arc<AtomicBool>) {}

/// Shields the menu from SIGINT until dropped
#[must_use = "the menu is only shielded while the guard is held"]
pub struct ChildGuard {
    _private: (),
}

impl ChildGuard {
    pub fn enter() -> Self {
        let mut running = RUNNING.lock();
        *running += 1;
        IDLE.store(false, Ordering::SeqCst);
        Self { _private: () }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let mut running = RUNNING.lock();
        *running -= 1;
        if *running == 0 {
            IDLE.store(true, Ordering::SeqCst);
        }
    }
}
