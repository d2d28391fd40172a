//! Activation state
//!
//! One per coordinator. Only the activation operations mutate it.

use serde::{Deserialize, Serialize};

use tabsync_platform::TimerHandle;

/// How an activation was caused.
///
/// | cause                   | trusted | automatic |
/// |-------------------------|---------|-----------|
/// | real click, Enter/Space | yes     | no        |
/// | URL restore, scroll     | no      | yes       |
/// | programmatic call       | no      | no        |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateOptions {
    /// Directly caused by real input
    pub trusted: bool,
    /// Initial load, URL restoration or scroll observation
    pub automatic: bool,
}

impl ActivateOptions {
    pub fn user() -> Self {
        Self {
            trusted: true,
            automatic: false,
        }
    }

    pub fn automatic() -> Self {
        Self {
            trusted: false,
            automatic: true,
        }
    }

    pub fn programmatic() -> Self {
        Self::default()
    }

    pub fn is_user_click(&self) -> bool {
        self.trusted && !self.automatic
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivationState {
    pub active_standard_tab: Option<String>,
    /// Scoped to the active standard panel
    pub active_sticky_tab: Option<String>,
    pub initial_sequence_completed: bool,
    /// Set by a user click on a sticky tab; blocks scroll-driven activation
    pub user_interacting: bool,
    interaction_timer: Option<TimerHandle>,
    nav_scroll_timer: Option<TimerHandle>,
    pub header_height: f64,
    pub is_mobile: bool,
}

impl ActivationState {
    pub fn new(initial_sequence_completed: bool) -> Self {
        Self {
            initial_sequence_completed,
            ..Self::default()
        }
    }

    pub fn complete_initial_sequence(&mut self) {
        if !self.initial_sequence_completed {
            tracing::debug!("Initial activation sequence completed");
        }
        self.initial_sequence_completed = true;
    }

    /// Raise the interacting flag until `timer` fires. Returns the previous
    /// timer, which the caller must cancel.
    pub fn begin_interaction(&mut self, timer: TimerHandle) -> Option<TimerHandle> {
        self.user_interacting = true;
        self.interaction_timer.replace(timer)
    }

    /// Clear the flag if `timer` is the current interaction timer.
    pub fn end_interaction(&mut self, timer: TimerHandle) -> bool {
        if self.interaction_timer != Some(timer) {
            return false;
        }
        self.interaction_timer = None;
        self.user_interacting = false;
        true
    }

    pub fn interaction_timer(&self) -> Option<TimerHandle> {
        self.interaction_timer
    }

    /// Start a nav settle period. Returns the previous timer, which the
    /// caller must cancel.
    pub fn arm_nav_settle(&mut self, timer: TimerHandle) -> Option<TimerHandle> {
        self.nav_scroll_timer.replace(timer)
    }

    /// Abandon the current settle period, returning its timer for cancellation.
    pub fn take_nav_settle(&mut self) -> Option<TimerHandle> {
        self.nav_scroll_timer.take()
    }

    /// End the settle period if `timer` is the current one.
    pub fn settle_nav(&mut self, timer: TimerHandle) -> bool {
        if self.nav_scroll_timer != Some(timer) {
            return false;
        }
        self.nav_scroll_timer = None;
        true
    }

    pub fn nav_scroll_timer(&self) -> Option<TimerHandle> {
        self.nav_scroll_timer
    }

    pub fn snapshot(&self, url_disabled: bool) -> ActivationSnapshot {
        ActivationSnapshot {
            active_standard_tab: self.active_standard_tab.clone(),
            active_sticky_tab: self.active_sticky_tab.clone(),
            initial_sequence_completed: self.initial_sequence_completed,
            user_interacting: self.user_interacting,
            url_disabled,
            header_height: self.header_height,
            is_mobile: self.is_mobile,
        }
    }
}

/// Read-only view of the state, handed to the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationSnapshot {
    pub active_standard_tab: Option<String>,
    pub active_sticky_tab: Option<String>,
    pub initial_sequence_completed: bool,
    pub user_interacting: bool,
    pub url_disabled: bool,
    pub header_height: f64,
    pub is_mobile: bool,
}
