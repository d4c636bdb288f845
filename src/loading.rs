//! Asset-readiness tracking.
//!
//! Every outstanding load (audio bytes, each model+material pair) registers a
//! [`LoadToken`] up front. Tokens always resolve: explicitly with
//! [`LoadToken::resolve`], or as a failure when dropped unresolved, so a
//! load task that errors or panics cannot stall the scene forever. Once the
//! gate is sealed and the last token resolves, [`LoadGate::take_ready`]
//! yields the ready signal exactly once.

use std::sync::{Arc, Mutex};

/// How a single load ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    Failed,
}

/// The one-shot ready signal. `Degraded` means the scene can start but some
/// assets are missing; callers decide what that looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyState {
    Complete,
    Degraded { failed: usize },
}

#[derive(Debug, Default)]
struct GateInner {
    pending: usize,
    failed: usize,
    sealed: bool,
    fired: bool,
}

/// Counted aggregator over in-flight loads. Cheap to clone; clones share the
/// same count.
#[derive(Clone, Debug, Default)]
pub struct LoadGate {
    inner: Arc<Mutex<GateInner>>,
}

impl LoadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track one outstanding load. Must be called before [`Self::seal`].
    pub fn register(&self, label: impl Into<String>) -> LoadToken {
        let label = label.into();
        let mut inner = self.inner.lock().expect("load gate poisoned");
        assert!(
            !inner.sealed,
            "registered load '{label}' after the gate was sealed"
        );
        inner.pending += 1;
        LoadToken {
            gate: Arc::clone(&self.inner),
            label,
            resolved: false,
        }
    }

    /// Declare the token set complete. Readiness can only fire afterwards,
    /// which closes the race where the first load finishes before the second
    /// was registered.
    pub fn seal(&self) {
        self.inner.lock().expect("load gate poisoned").sealed = true;
    }

    pub fn pending(&self) -> usize {
        self.inner.lock().expect("load gate poisoned").pending
    }

    /// The single-fire ready signal.
    ///
    /// Returns `Some` on exactly one call, the first one made after the gate
    /// is sealed and every token has resolved; `None` before that and `None`
    /// forever after.
    pub fn take_ready(&self) -> Option<ReadyState> {
        let mut inner = self.inner.lock().expect("load gate poisoned");
        if inner.fired || !inner.sealed || inner.pending > 0 {
            return None;
        }
        inner.fired = true;
        Some(if inner.failed == 0 {
            ReadyState::Complete
        } else {
            ReadyState::Degraded {
                failed: inner.failed,
            }
        })
    }
}

/// Handle for one outstanding load.
#[derive(Debug)]
pub struct LoadToken {
    gate: Arc<Mutex<GateInner>>,
    label: String,
    resolved: bool,
}

impl LoadToken {
    pub fn resolve(mut self, status: LoadStatus) {
        self.mark(status);
    }

    fn mark(&mut self, status: LoadStatus) {
        if self.resolved {
            return;
        }
        self.resolved = true;
        let mut inner = self.gate.lock().expect("load gate poisoned");
        inner.pending -= 1;
        if status == LoadStatus::Failed {
            inner.failed += 1;
            log::error!("load '{}' failed; continuing without it", self.label);
        } else {
            log::info!("load '{}' finished", self.label);
        }
    }
}

impl Drop for LoadToken {
    fn drop(&mut self) {
        if !self.resolved {
            log::warn!("load '{}' dropped without resolving", self.label);
            self.mark(LoadStatus::Failed);
        }
    }
}
