//! Sticky tab activation

use tabsync_navigation::{STANDARD_TAB_PARAM, STICKY_TAB_PARAM};
use tabsync_platform::{NodeId, ScrollBehavior};
use tabsync_tabs::{ActivateOptions, TabError};

use crate::config::NAV_SETTLE_DELAY;
use crate::coordinator::{FrameTask, TabCoordinator};
use crate::standard::focus_element;
use crate::Result;

impl TabCoordinator {
    /// Bind the panel's sticky links and restart its watcher.
    pub(crate) fn initialize_sticky_group(&mut self, panel_id: &str) -> Result<()> {
        let group = self
            .registry
            .sticky_group_mut(panel_id)
            .ok_or_else(|| TabError::NoStickyGroup(panel_id.to_string()))?;
        group.bind();

        self.arm_watcher(panel_id);
        Ok(())
    }

    /// Honor a `stickyTab` parameter naming a tab of this panel. Without one
    /// the watcher picks the tab once the page scrolls.
    pub(crate) fn activate_sticky_from_url_or_watcher(&mut self, panel_id: &str) {
        if !self.url.is_active() || !self.state.initial_sequence_completed {
            return;
        }
        let Some(tab_id) = self
            .url
            .read_param(self.host.address.as_ref(), STICKY_TAB_PARAM)
        else {
            return;
        };

        let in_panel = self
            .registry
            .sticky_group(panel_id)
            .is_some_and(|group| group.get(&tab_id).is_some());
        if !in_panel {
            tracing::debug!(tab_id = %tab_id, panel_id = %panel_id, "Sticky tab from URL not in panel");
            return;
        }

        if let Err(err) = self.try_activate_sticky_tab(panel_id, &tab_id, ActivateOptions::automatic()) {
            tracing::error!(tab_id = %tab_id, error = %err, "Sticky tab activation failed");
            return;
        }

        // Layout is not final until the next frame
        let frame = self.host.scheduler.request_frame();
        self.frames.insert(
            frame,
            FrameTask::RestoreScroll {
                panel_id: panel_id.to_string(),
                tab_id,
            },
        );
    }

    pub(crate) fn try_activate_sticky_tab(
        &mut self,
        panel_id: &str,
        tab_id: &str,
        options: ActivateOptions,
    ) -> Result<()> {
        let group = self
            .registry
            .sticky_group(panel_id)
            .ok_or_else(|| TabError::NoStickyGroup(panel_id.to_string()))?;
        let tab = group
            .get(tab_id)
            .ok_or_else(|| TabError::StickyNotFound(tab_id.to_string()))?;
        let section = tab
            .section
            .as_ref()
            .map(|s| s.node)
            .ok_or_else(|| TabError::SectionNotFound(tab_id.to_string()))?;
        let nav = group.nav;
        let link = tab.node;
        let links: Vec<NodeId> = group.tabs.iter().map(|t| t.node).collect();

        let is_user_click = options.is_user_click();
        if is_user_click {
            self.state.complete_initial_sequence();
            let timer = self.host.scheduler.schedule(self.config.cooldown());
            if let Some(previous) = self.state.begin_interaction(timer) {
                self.host.scheduler.cancel(previous);
            }
        }
        if let Some(settle) = self.state.take_nav_settle() {
            self.host.scheduler.cancel(settle);
        }

        let document = self.host.document.as_mut();
        let label_class = &self.config.selected_label_class;
        for node in links {
            document.remove_class(node, &self.config.sticky_link_active_class);
            document.remove_class(node, &self.config.active_class);
            document.set_attribute(node, "aria-selected", "false");
            document.remove_label(node, label_class);
        }

        if let Some(group) = self.registry.sticky_group_mut(panel_id) {
            group.activate(tab_id)?;
        }
        document.add_class(link, &self.config.sticky_link_active_class);
        document.add_class(link, &self.config.active_class);
        document.set_attribute(link, "aria-selected", "true");
        if !document.has_label(link, label_class) {
            document.append_label(link, label_class, &self.config.selected_label_text);
        }

        let in_active_panel = self.registry.panel(panel_id).is_some_and(|p| p.visible);
        if in_active_panel {
            self.state.active_sticky_tab = Some(tab_id.to_string());
        }

        if is_user_click && self.url.is_active() {
            let address = self.host.address.as_mut();
            self.url.write_param(address, STICKY_TAB_PARAM, Some(tab_id));
            if let Some(standard) = self.state.active_standard_tab.as_deref() {
                self.url.write_param(address, STANDARD_TAB_PARAM, Some(standard));
            }
        }

        tracing::debug!(
            tab_id = %tab_id,
            panel_id = %panel_id,
            user_click = is_user_click,
            automatic = options.automatic,
            "Activated sticky tab"
        );

        self.scroll_to_section(nav, section, options);

        let behavior = if is_user_click && self.config.instant_scroll_on_user_click {
            ScrollBehavior::Instant
        } else {
            ScrollBehavior::Smooth
        };
        self.center_sticky_link(nav, link, behavior);

        Ok(())
    }

    /// Window position that puts `section` just under the header and the
    /// pinned nav.
    pub(crate) fn section_scroll_top(&self, nav: NodeId, section: NodeId) -> f64 {
        let document = self.host.document.as_ref();
        document.offset_top(section)
            - self.state.header_height
            - document.offset_height(nav)
            - self.config.sticky_offset
    }

    /// Automatic activations never scroll the window here: a restored tab
    /// jumps on the next frame and a watched one is already in view.
    fn scroll_to_section(&mut self, nav: NodeId, section: NodeId, options: ActivateOptions) {
        if options.automatic {
            return;
        }
        let top = self.section_scroll_top(nav, section);
        self.host
            .document
            .scroll_window_to(top, self.config.scroll_behavior);

        if self.config.focus_section_on_scroll {
            focus_element(self.host.document.as_mut(), section);
        }
    }

    /// Scroll the nav horizontally so `link` sits in its middle.
    pub(crate) fn center_sticky_link(&mut self, nav: NodeId, link: NodeId, behavior: ScrollBehavior) {
        let document = self.host.document.as_mut();
        let nav_rect = document.bounding_rect(nav);
        let link_rect = document.bounding_rect(link);
        let left = document.scroll_left(nav) + (link_rect.left - nav_rect.left) - nav_rect.width / 2.0
            + link_rect.width / 2.0;

        if let Some(settle) = self.state.take_nav_settle() {
            self.host.scheduler.cancel(settle);
        }

        document.scroll_element_to(nav, left, behavior);

        if behavior == ScrollBehavior::Smooth {
            let timer = self.host.scheduler.schedule(NAV_SETTLE_DELAY);
            if let Some(previous) = self.state.arm_nav_settle(timer) {
                self.host.scheduler.cancel(previous);
            }
        }
    }
}
