//! Lifecycle State Machine
//!
//! Tracks the embedded module from page load to a terminal outcome:
//!
//! ```text
//! Unloaded ──► Loading(%) ──► Ready
//!     │            │            │
//!     └────────────┴────────────┴──► Errored(msg) | Crashed   (terminal)
//! ```
//!
//! Two independent readiness signals exist. Plugin transports fire a
//! `load` event; binary-module runtimes count outstanding dependencies
//! down to zero. Either one may fire first, or only one may fire at all.
//! Both reach `Ready` at most once and share a single surface reveal.
//!
//! The machine is pure. Every operation returns a [`Transition`]
//! describing the UI effects; the bridge applies them to its surfaces.

use serde::Serialize;

use crate::progress::{compute_percent, DependencyTracker, ProgressSample, COMPLETE_PERCENT};

/// Current lifecycle state of the embedded module.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Unloaded,
    Loading {
        percent: f64,
    },
    Ready,
    Errored {
        message: String,
    },
    Crashed,
}

impl LifecycleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Errored { .. } | LifecycleState::Crashed)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LifecycleState::Ready)
    }

    /// Load percentage implied by this state, if meaningful.
    pub fn percent(&self) -> Option<f64> {
        match self {
            LifecycleState::Loading { percent } => Some(*percent),
            LifecycleState::Ready => Some(COMPLETE_PERCENT),
            _ => None,
        }
    }
}

/// UI effects produced by a lifecycle operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transition {
    /// State changed (not merely re-emitted)
    pub changed: bool,
    /// New status line text
    pub status: Option<String>,
    /// New progress indicator value
    pub progress: Option<f64>,
    /// Hide the spinner, show canvas and output
    pub reveal: bool,
    /// Hide the spinner without revealing anything (failure)
    pub hide_spinner: bool,
}

impl Transition {
    fn none() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
    revealed: bool,
    spinner_hidden: bool,
    deps: DependencyTracker,
    last_error: Option<String>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// Surfaces have been revealed and the module accepts messages.
    pub fn is_usable(&self) -> bool {
        self.revealed
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dependencies(&self) -> &DependencyTracker {
        &self.deps
    }

    /// Transport started fetching the module.
    pub fn on_load_start(&mut self) -> Transition {
        if self.state != LifecycleState::Unloaded {
            return Transition::none();
        }
        self.state = LifecycleState::Loading { percent: 0.0 };
        Transition {
            changed: true,
            status: Some("Loading...".to_string()),
            progress: Some(0.0),
            ..Transition::none()
        }
    }

    /// Progress tick. Re-emits `Loading` with the recomputed percentage.
    ///
    /// A tick before `loadstart` implicitly starts loading; ticks after
    /// `Ready` or a terminal state are ignored.
    pub fn on_progress(&mut self, sample: &ProgressSample) -> Transition {
        let changed = match self.state {
            LifecycleState::Unloaded => true,
            LifecycleState::Loading { .. } => false,
            _ => return Transition::none(),
        };
        let percent = compute_percent(sample);
        self.state = LifecycleState::Loading { percent };
        Transition {
            changed,
            status: Some(format!("Loading... {:.0}%", percent)),
            progress: Some(percent),
            ..Transition::none()
        }
    }

    /// Transport signalled completion. Forces 100% regardless of the last sample.
    pub fn on_load(&mut self) -> Transition {
        self.become_ready("Running")
    }

    /// Dependency counter tick; zero is the authoritative usable signal.
    pub fn on_dependencies(&mut self, remaining: u32) -> Transition {
        if self.state.is_terminal() {
            return Transition::none();
        }
        let status = self.deps.update(remaining);
        if self.state.is_ready() {
            // Late ticks only update the counter; the status line stays
            return Transition::none();
        }
        if remaining > 0 {
            let changed = self.state == LifecycleState::Unloaded;
            if changed {
                self.state = LifecycleState::Loading { percent: 0.0 };
            }
            return Transition {
                changed,
                status: Some(status),
                ..Transition::none()
            };
        }
        self.become_ready(&status)
    }

    /// Load failure. Terminal; never transitions back.
    pub fn on_error(&mut self, message: &str) -> Transition {
        if self.state.is_terminal() {
            return Transition::none();
        }
        self.last_error = Some(message.to_string());
        self.state = LifecycleState::Errored {
            message: message.to_string(),
        };
        self.fail(format!("ERROR [{}]", message))
    }

    /// The running module stopped unexpectedly. Terminal.
    pub fn on_crash(&mut self) -> Transition {
        if self.state.is_terminal() {
            return Transition::none();
        }
        self.state = LifecycleState::Crashed;
        self.fail("CRASHED: the module stopped unexpectedly".to_string())
    }

    fn become_ready(&mut self, status: &str) -> Transition {
        let changed = match self.state {
            LifecycleState::Unloaded | LifecycleState::Loading { .. } => true,
            LifecycleState::Ready => false,
            _ => return Transition::none(),
        };
        self.state = LifecycleState::Ready;
        let reveal = !self.revealed;
        self.revealed = true;
        self.spinner_hidden = true;
        Transition {
            changed,
            status: Some(status.to_string()),
            progress: changed.then_some(COMPLETE_PERCENT),
            reveal,
            hide_spinner: false,
        }
    }

    fn fail(&mut self, status: String) -> Transition {
        let hide_spinner = !self.spinner_hidden;
        self.spinner_hidden = true;
        Transition {
            changed: true,
            status: Some(status),
            hide_spinner,
            ..Transition::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_forces_complete() {
        let mut lc = Lifecycle::new();
        lc.on_load_start();
        lc.on_progress(&ProgressSample::bytes(10.0, 1000.0));
        assert_eq!(lc.state(), &LifecycleState::Loading { percent: 1.0 });

        let t = lc.on_load();
        assert!(t.changed);
        assert!(t.reveal);
        assert_eq!(t.progress, Some(100.0));
        assert_eq!(lc.state(), &LifecycleState::Ready);
        assert_eq!(lc.state().percent(), Some(100.0));
    }

    #[test]
    fn test_progress_reemits_without_state_change() {
        let mut lc = Lifecycle::new();
        lc.on_load_start();
        let t = lc.on_progress(&ProgressSample::bytes(50.0, 100.0));
        assert!(!t.changed);
        assert_eq!(t.progress, Some(50.0));
        assert_eq!(t.status.as_deref(), Some("Loading... 50%"));
    }

    #[test]
    fn test_progress_before_load_start_starts_loading() {
        let mut lc = Lifecycle::new();
        let t = lc.on_progress(&ProgressSample::bytes(1.0, 4.0));
        assert!(t.changed);
        assert_eq!(lc.state(), &LifecycleState::Loading { percent: 25.0 });
    }

    #[test]
    fn test_error_is_terminal() {
        let mut lc = Lifecycle::new();
        lc.on_load_start();
        let t = lc.on_error("bad manifest");
        assert!(t.hide_spinner);
        assert_eq!(t.status.as_deref(), Some("ERROR [bad manifest]"));

        assert_eq!(lc.on_progress(&ProgressSample::bytes(5.0, 10.0)), Transition::default());
        assert_eq!(lc.on_load(), Transition::default());
        assert_eq!(lc.on_dependencies(0), Transition::default());
        assert_eq!(lc.on_crash(), Transition::default());
        assert_eq!(
            lc.state(),
            &LifecycleState::Errored { message: "bad manifest".to_string() }
        );
        assert_eq!(lc.last_error(), Some("bad manifest"));
        assert!(!lc.is_usable());
    }

    #[test]
    fn test_crash_after_ready() {
        let mut lc = Lifecycle::new();
        lc.on_load();
        let t = lc.on_crash();
        assert!(t.changed);
        // Spinner already hidden by the reveal
        assert!(!t.hide_spinner);
        assert_eq!(lc.state(), &LifecycleState::Crashed);
        assert_eq!(lc.on_error("late"), Transition::default());
        assert_eq!(lc.state(), &LifecycleState::Crashed);
    }

    #[test]
    fn test_dependencies_reveal_once() {
        let mut lc = Lifecycle::new();
        let t = lc.on_dependencies(3);
        assert!(t.changed);
        assert!(!t.reveal);
        assert_eq!(t.status.as_deref(), Some("Preparing... (0/3)"));

        assert!(lc.on_dependencies(0).reveal);
        assert!(lc.is_usable());
        assert!(!lc.on_dependencies(0).reveal);
        assert!(!lc.on_load().reveal);
        assert_eq!(lc.state(), &LifecycleState::Ready);
    }

    #[test]
    fn test_load_then_dependencies_either_order() {
        let mut a = Lifecycle::new();
        assert!(a.on_load().reveal);
        let t = a.on_dependencies(0);
        assert!(!t.reveal);
        assert!(!t.changed);

        let mut b = Lifecycle::new();
        assert!(b.on_dependencies(0).reveal);
        let t = b.on_load();
        assert!(!t.reveal);
        assert!(!t.changed);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_dependency_ticks_after_ready_keep_status() {
        let mut lc = Lifecycle::new();
        lc.on_load();
        assert_eq!(lc.on_dependencies(2), Transition::none());
        assert_eq!(lc.on_dependencies(0), Transition::none());
        assert_eq!(lc.state(), &LifecycleState::Ready);
        assert!(lc.dependencies().is_resolved());
    }

    #[test]
    fn test_state_json() {
        let json = serde_json::to_string(&LifecycleState::Loading { percent: 42.0 }).unwrap();
        assert_eq!(json, r#"{"state":"loading","percent":42.0}"#);
        let json = serde_json::to_string(&LifecycleState::Crashed).unwrap();
        assert_eq!(json, r#"{"state":"crashed"}"#);
    }
}
