//! Tab Coordinator
//!
//! Control flow:
//! ```text
//! initialize
//!   → initial standard tab (URL, configured default, first tab)
//!   → sticky group of its panel (URL-specified tab, or the watcher)
//! scroll
//!   → watcher activates the sticky tab in view
//! click / key
//!   → takes precedence over the watcher for the cooldown, writes the URL
//! ```

use std::collections::HashMap;

use tabsync_navigation::{InitialResolver, InitialSource, UrlSync, STANDARD_TAB_PARAM};
use tabsync_platform::{FrameHandle, NodeId, ScrollBehavior, TimerHandle};
use tabsync_tabs::{
    ActivateOptions, ActivationSnapshot, ActivationState, Key, KeyCommand, TabRegistry,
};

use crate::config::{Config, MOBILE_MEDIA_QUERY};
use crate::error::CoreError;
use crate::host::Host;
use crate::standard::focus_element;
use crate::Result;

/// Work waiting for the next animation frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FrameTask {
    /// Jump to the section of a sticky tab restored from the URL, once
    /// layout has settled
    RestoreScroll { panel_id: String, tab_id: String },
}

pub struct TabCoordinator {
    pub(crate) config: Config,
    pub(crate) host: Host,
    pub(crate) registry: TabRegistry,
    pub(crate) state: ActivationState,
    pub(crate) url: UrlSync,
    pub(crate) frames: HashMap<FrameHandle, FrameTask>,
    initialized: bool,
}

impl TabCoordinator {
    pub fn new(config: Config, host: Host) -> Result<Self> {
        config.validate()?;
        let url = UrlSync::new(config.update_url);

        Ok(Self {
            config,
            host,
            registry: TabRegistry::default(),
            state: ActivationState::default(),
            url,
            frames: HashMap::new(),
            initialized: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &ActivationState {
        &self.state
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn snapshot(&self) -> ActivationSnapshot {
        self.state.snapshot(self.url.is_disabled())
    }

    /// Discover the page and activate the initial pair. Returns `false` when
    /// the page lacks the panels container; the coordinator then stays inert.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            tracing::debug!("Coordinator already initialized");
            return true;
        }
        match self.try_initialize() {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "Tab coordinator initialization failed");
                false
            }
        }
    }

    fn try_initialize(&mut self) -> Result<()> {
        let structure = self.host.document.discover(&self.config.selectors())?;
        self.registry = TabRegistry::from_structure(&structure);

        self.state.is_mobile = self.host.document.matches_media(MOBILE_MEDIA_QUERY);
        self.state.header_height = self.host.document.header_height();

        let query_was_empty = self.url.query_was_empty(self.host.address.as_ref());
        // A bare address starts an initial sequence that writes nothing
        self.state.initial_sequence_completed = !query_was_empty;
        self.initialized = true;

        tracing::info!(
            tabs = structure.tab_count(),
            bare_address = query_was_empty,
            "Tab coordinator initialized"
        );

        self.activate_initial_standard_tab(query_was_empty);
        Ok(())
    }

    fn activate_initial_standard_tab(&mut self, query_was_empty: bool) {
        let url_tab = if self.url.is_enabled() && !query_was_empty {
            self.url
                .read_param(self.host.address.as_ref(), STANDARD_TAB_PARAM)
        } else {
            None
        };

        let resolver = InitialResolver::new(self.config.default_standard_tab_id.clone());
        let Some(choice) = resolver.resolve(
            url_tab.as_deref(),
            |id| self.registry.contains_tab(id),
            self.registry.first_tab_id(),
        ) else {
            tracing::warn!("No standard tabs to activate");
            return;
        };

        tracing::debug!(tab_id = %choice.tab_id, source = ?choice.source, "Initial standard tab");

        if choice.source == InitialSource::Url {
            self.activate_standard_tab(&choice.tab_id, ActivateOptions::automatic());
            return;
        }

        if query_was_empty {
            self.url.suspend();
            self.activate_standard_tab(&choice.tab_id, ActivateOptions::automatic());
            self.url.resume();
            self.state.complete_initial_sequence();
        } else {
            self.activate_standard_tab(&choice.tab_id, ActivateOptions::automatic());
        }
    }

    /// A click on `node`. Returns whether the click hit a tab, in which case
    /// the host suppresses the default browser action.
    pub fn handle_click(&mut self, node: NodeId, trusted: bool) -> bool {
        let options = if trusted {
            ActivateOptions::user()
        } else {
            ActivateOptions::programmatic()
        };

        if let Some((g, p)) = self.registry.locate_tab_node(node) {
            let Some(tab_id) = self.standard_tab_id(g, p) else {
                return false;
            };
            self.activate_standard_tab(&tab_id, options);
            return true;
        }

        if let Some((panel_id, p)) = self.registry.locate_link_node(node) {
            let Some(tab_id) = self.sticky_tab_id(&panel_id, p) else {
                return false;
            };
            if let Err(err) = self.try_activate_sticky_tab(&panel_id, &tab_id, options) {
                tracing::error!(tab_id = %tab_id, error = %err, "Sticky tab activation failed");
            }
            return true;
        }

        false
    }

    /// A key pressed while `node` has focus. Returns whether the key was
    /// handled, in which case the host suppresses its default action.
    pub fn handle_keydown(&mut self, node: NodeId, key: Key) -> bool {
        if let Some((g, p)) = self.registry.locate_tab_node(node) {
            let len = self.registry.group(g).map_or(0, |group| group.len());
            match key.resolve(p, len) {
                Some(KeyCommand::Focus(target)) => {
                    if let Some(tab) = self.registry.group(g).and_then(|group| group.get(target)) {
                        if target != p {
                            self.host.document.focus(tab.node, false);
                        }
                    }
                }
                Some(KeyCommand::Activate(target)) => {
                    if let Some(tab_id) = self.standard_tab_id(g, target) {
                        self.activate_standard_tab(&tab_id, ActivateOptions::user());
                        self.state.complete_initial_sequence();
                    }
                }
                None => return false,
            }
            return true;
        }

        if let Some((panel_id, p)) = self.registry.locate_link_node(node) {
            let Some(group) = self.registry.sticky_group(&panel_id) else {
                return false;
            };
            match key.resolve(p, group.tabs.len()) {
                Some(KeyCommand::Focus(target)) => {
                    if target != p {
                        let link = group.tabs[target].node;
                        self.host.document.focus(link, false);
                    }
                }
                Some(KeyCommand::Activate(target)) => {
                    let tab_id = group.tabs[target].id.clone();
                    if let Err(err) =
                        self.try_activate_sticky_tab(&panel_id, &tab_id, ActivateOptions::user())
                    {
                        tracing::error!(tab_id = %tab_id, error = %err, "Sticky tab activation failed");
                    }
                    self.state.complete_initial_sequence();
                }
                None => return false,
            }
            return true;
        }

        false
    }

    /// Re-measure the page and refresh the visible panel's sticky group.
    pub fn handle_resize(&mut self) {
        if !self.initialized {
            return;
        }
        self.state.is_mobile = self.host.document.matches_media(MOBILE_MEDIA_QUERY);
        self.state.header_height = self.host.document.header_height();

        let Some(panel_id) = self
            .registry
            .visible_panel()
            .filter(|panel| panel.has_sticky_tabs())
            .map(|panel| panel.id.clone())
        else {
            return;
        };

        self.arm_watcher(&panel_id);

        let active = self
            .registry
            .sticky_group(&panel_id)
            .and_then(|group| group.active().map(|tab| (group.nav, tab.node)));
        if let Some((nav, link)) = active {
            self.center_sticky_link(nav, link, ScrollBehavior::Smooth);
        }

        tracing::debug!(
            panel_id = %panel_id,
            header_height = self.state.header_height,
            is_mobile = self.state.is_mobile,
            "Resized"
        );
    }

    /// A timer handed out through the scheduler came due. Returns whether it
    /// was still current.
    pub fn fire_timer(&mut self, handle: TimerHandle) -> bool {
        if self.state.end_interaction(handle) {
            tracing::debug!("Interaction cooldown elapsed");
            return true;
        }
        if self.state.settle_nav(handle) {
            return true;
        }
        tracing::debug!(timer = handle.0, "Ignoring stale timer");
        false
    }

    /// An animation frame requested through the scheduler arrived.
    pub fn fire_frame(&mut self, handle: FrameHandle) -> bool {
        let Some(task) = self.frames.remove(&handle) else {
            tracing::debug!(frame = handle.0, "Ignoring unknown frame");
            return false;
        };

        match task {
            FrameTask::RestoreScroll { panel_id, tab_id } => {
                let target = self.registry.sticky_group(&panel_id).and_then(|group| {
                    let section = group.get(&tab_id)?.section.as_ref()?.node;
                    Some((group.nav, section))
                });
                let Some((nav, section)) = target else {
                    return false;
                };
                let top = self.section_scroll_top(nav, section);
                self.host.document.scroll_window_to(top, ScrollBehavior::Instant);
                true
            }
        }
    }

    /// Activate a standard tab by id. Unknown tabs and missing panels are
    /// logged and leave the page untouched.
    pub fn activate_standard_tab(&mut self, tab_id: &str, options: ActivateOptions) -> bool {
        if !self.initialized {
            tracing::error!(tab_id = %tab_id, error = %CoreError::NotInitialized, "Standard tab activation failed");
            return false;
        }
        match self.try_activate_standard_tab(tab_id, options) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(tab_id = %tab_id, error = %err, "Standard tab activation failed");
                false
            }
        }
    }

    /// Activate a sticky tab by id. Only links of a visible panel qualify.
    pub fn activate_sticky_tab(&mut self, tab_id: &str, options: ActivateOptions) -> bool {
        let result = match self.registry.locate_link(tab_id).map(str::to_string) {
            Some(panel_id) => self.try_activate_sticky_tab(&panel_id, tab_id, options),
            None => Err(tabsync_tabs::TabError::StickyNotFound(tab_id.to_string()).into()),
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(tab_id = %tab_id, error = %err, "Sticky tab activation failed");
                false
            }
        }
    }

    /// Move focus to an element without scrolling, making it focusable first
    /// when it is not.
    pub fn focus(&mut self, node: NodeId) {
        focus_element(self.host.document.as_mut(), node);
    }

    fn standard_tab_id(&self, group: usize, position: usize) -> Option<String> {
        self.registry
            .group(group)
            .and_then(|g| g.get(position))
            .map(|tab| tab.id.clone())
    }

    fn sticky_tab_id(&self, panel_id: &str, position: usize) -> Option<String> {
        self.registry
            .sticky_group(panel_id)
            .and_then(|group| group.tabs.get(position))
            .map(|tab| tab.id.clone())
    }
}
