//! Standard tab activation

use tabsync_navigation::{STANDARD_TAB_PARAM, STICKY_TAB_PARAM};
use tabsync_platform::{Document, NodeId};
use tabsync_tabs::{ActivateOptions, TabError};

use crate::coordinator::TabCoordinator;
use crate::Result;

/// Elements that take focus without a `tabindex`
const NATIVELY_FOCUSABLE: [&str; 5] = ["a", "button", "input", "select", "textarea"];

/// Focus `node` without scrolling the page.
///
/// An element that cannot take focus on its own gets `tabindex="-1"` first,
/// which makes it focusable while keeping it out of the tab order.
pub(crate) fn focus_element(document: &mut dyn Document, node: NodeId) {
    let tabindex = document.attribute(node, "tabindex");
    if tabindex.as_deref() != Some("-1") && !document.is_focused(node) {
        let tag = document.tag_name(node);
        if tabindex.is_none()
            && !NATIVELY_FOCUSABLE.contains(&tag.as_str())
            && document.attribute(node, "contenteditable").is_none()
        {
            document.set_attribute(node, "tabindex", "-1");
        }
    }
    document.focus(node, true);
}

impl TabCoordinator {
    pub(crate) fn try_activate_standard_tab(
        &mut self,
        tab_id: &str,
        options: ActivateOptions,
    ) -> Result<()> {
        let panel_id = self.registry.resolve_panel(tab_id)?.id.clone();
        let (group, _) = self
            .registry
            .locate_tab(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        if options.trusted {
            self.state.complete_initial_sequence();
            self.url
                .write_param(self.host.address.as_mut(), STICKY_TAB_PARAM, None);
        }

        self.deactivate_standard_group(group);
        self.show_standard_tab(group, tab_id, &panel_id)?;

        self.state.active_standard_tab = Some(tab_id.to_string());
        self.state.active_sticky_tab = self
            .registry
            .sticky_group(&panel_id)
            .and_then(|g| g.active())
            .map(|tab| tab.id.clone());

        if self.url.is_active() && (options.trusted || self.state.initial_sequence_completed) {
            self.url
                .write_param(self.host.address.as_mut(), STANDARD_TAB_PARAM, Some(tab_id));
        }

        tracing::info!(tab_id = %tab_id, panel_id = %panel_id, trusted = options.trusted, "Activated standard tab");

        if self.registry.sticky_group(&panel_id).is_some() {
            self.initialize_sticky_group(&panel_id)?;
            self.activate_sticky_from_url_or_watcher(&panel_id);
        }

        Ok(())
    }

    /// Deselect every tab of the group and hide its panels, disposing their
    /// watchers.
    fn deactivate_standard_group(&mut self, group: usize) {
        let Some(tabs) = self.registry.group(group).map(|g| {
            g.tabs()
                .iter()
                .map(|tab| (tab.node, tab.panel_id.clone()))
                .collect::<Vec<_>>()
        }) else {
            return;
        };

        let document = self.host.document.as_mut();
        for (node, panel_id) in tabs {
            document.set_attribute(node, "aria-selected", "false");
            document.remove_class(node, &self.config.standard_tab_active_class);
            document.remove_class(node, &self.config.active_class);

            let Some(panel) = panel_id.and_then(|id| self.registry.panel_mut(&id)) else {
                continue;
            };
            document.remove_class(panel.node, &self.config.standard_panel_active_class);
            document.remove_class(panel.node, &self.config.active_class);
            document.set_hidden(panel.node, true);
            panel.visible = false;

            if let Some(watch) = panel.sticky.as_mut().and_then(|g| g.take_watch()) {
                self.host.intersections.disconnect(watch.handle);
                tracing::debug!(panel_id = %panel.id, "Disposed sticky watcher");
            }
        }
    }

    fn show_standard_tab(&mut self, group: usize, tab_id: &str, panel_id: &str) -> Result<()> {
        let tab_node = self
            .registry
            .group_mut(group)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?
            .activate(tab_id)?
            .node;

        let document = self.host.document.as_mut();
        document.set_attribute(tab_node, "aria-selected", "true");
        document.add_class(tab_node, &self.config.standard_tab_active_class);
        document.add_class(tab_node, &self.config.active_class);

        let panel = self
            .registry
            .panel_mut(panel_id)
            .ok_or_else(|| TabError::PanelNotFound {
                tab: tab_id.to_string(),
                panel: panel_id.to_string(),
            })?;
        document.add_class(panel.node, &self.config.standard_panel_active_class);
        document.add_class(panel.node, &self.config.active_class);
        document.set_hidden(panel.node, false);
        panel.visible = true;

        if self.config.focus_panel_on_activate {
            focus_element(document, panel.focus_target);
        }

        Ok(())
    }
}
