//! Screen lifecycle flag.
//!
//! A caption submission outlives the dialog that started it and may outlive
//! the whole screen. The continuation that shows the failure toast checks
//! this flag first: once the screen is retired the outcome is discarded
//! silently instead of being queued or crashing into a dead UI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag tracking whether the hosting screen is still alive.
#[derive(Debug, Clone)]
pub struct ScreenLifecycle(Arc<AtomicBool>);

impl ScreenLifecycle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Whether the screen is still active and may receive UI side effects.
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Mark the screen as torn down. Pending continuations will drop their
    /// user-visible side effects.
    pub fn retire(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl Default for ScreenLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_active() {
        assert!(ScreenLifecycle::new().is_active());
    }

    #[test]
    fn retire_is_visible_through_clones() {
        let lifecycle = ScreenLifecycle::new();
        let observer = lifecycle.clone();
        lifecycle.retire();
        assert!(!observer.is_active());
    }
}
