//! Sticky tab groups
//!
//! A sticky group lives inside one standard panel. Each of its tabs points at
//! a section of that panel through `href="#section"`; a tab whose section
//! cannot be found stays in the group (it is still keyboard-reachable) but can
//! never become active.

use std::collections::HashSet;

use tabsync_platform::{NodeId, StickyNavNode, WatchHandle};

use crate::error::TabError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub node: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickyTab {
    pub id: String,
    pub node: NodeId,
    pub section: Option<Section>,
    pub active: bool,
}

/// The live intersection observation of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionWatch {
    pub handle: WatchHandle,
    /// Tab this watch activated last; repeated entries for it are ignored.
    pub last_activated: Option<String>,
}

impl IntersectionWatch {
    pub fn new(handle: WatchHandle) -> Self {
        Self {
            handle,
            last_activated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StickyTabGroup {
    pub panel_id: String,
    /// The nav bar holding the links
    pub nav: NodeId,
    pub tabs: Vec<StickyTab>,
    watch: Option<IntersectionWatch>,
    bound: bool,
}

impl StickyTabGroup {
    pub fn from_nav(panel_id: &str, nav: &StickyNavNode) -> Self {
        let tabs = nav
            .links
            .iter()
            .map(|link| StickyTab {
                id: link.id.clone(),
                node: link.node,
                section: match (&link.target, link.section) {
                    (Some(id), Some(node)) => Some(Section {
                        id: id.clone(),
                        node,
                    }),
                    _ => None,
                },
                active: false,
            })
            .collect();

        Self {
            panel_id: panel_id.to_string(),
            nav: nav.nav,
            tabs,
            watch: None,
            bound: false,
        }
    }

    pub fn position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub fn position_of_node(&self, node: NodeId) -> Option<usize> {
        self.tabs.iter().position(|t| t.node == node)
    }

    pub fn get(&self, tab_id: &str) -> Option<&StickyTab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    /// First tab pointing at the section `node`
    pub fn tab_for_section(&self, node: NodeId) -> Option<&StickyTab> {
        self.tabs
            .iter()
            .find(|t| t.section.as_ref().map(|s| s.node) == Some(node))
    }

    pub fn active(&self) -> Option<&StickyTab> {
        self.tabs.iter().find(|t| t.active)
    }

    /// Every resolvable section, once each, in tab order
    pub fn sections(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        self.tabs
            .iter()
            .filter_map(|t| t.section.as_ref().map(|s| s.node))
            .filter(|node| seen.insert(*node))
            .collect()
    }

    /// Make `tab_id` the only active tab of the group.
    ///
    /// Fails without touching the group when the tab is unknown or its
    /// section is missing.
    pub fn activate(&mut self, tab_id: &str) -> Result<&StickyTab> {
        let position = self
            .position(tab_id)
            .ok_or_else(|| TabError::StickyNotFound(tab_id.to_string()))?;
        if self.tabs[position].section.is_none() {
            return Err(TabError::SectionNotFound(tab_id.to_string()));
        }

        for tab in &mut self.tabs {
            tab.active = false;
        }
        self.tabs[position].active = true;

        Ok(&self.tabs[position])
    }

    pub fn watch(&self) -> Option<&IntersectionWatch> {
        self.watch.as_ref()
    }

    /// Detach the current watch so the caller can disconnect it.
    pub fn take_watch(&mut self) -> Option<IntersectionWatch> {
        self.watch.take()
    }

    /// Install a fresh watch. Any previous watch must have been taken first.
    pub fn install_watch(&mut self, handle: WatchHandle) {
        debug_assert!(self.watch.is_none(), "previous watch was not disposed");
        self.watch = Some(IntersectionWatch::new(handle));
    }

    /// Record the tab the watch just activated. Ignored for a stale handle.
    pub fn record_watch_activation(&mut self, handle: WatchHandle, tab_id: &str) {
        if let Some(watch) = self.watch.as_mut().filter(|w| w.handle == handle) {
            watch.last_activated = Some(tab_id.to_string());
        }
    }

    /// Whether the group's links currently answer clicks and keys
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Route clicks and keys for the group's links. Binding twice replaces the
    /// previous binding rather than adding a second one.
    pub fn bind(&mut self) {
        if self.bound {
            tracing::debug!(panel_id = %self.panel_id, "Rebinding sticky tabs");
        }
        self.bound = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_platform::LinkNode;

    fn group() -> StickyTabGroup {
        let link = |n: usize, id: &str, target: Option<&str>, section: Option<usize>| LinkNode {
            node: NodeId(n),
            id: id.to_string(),
            target: target.map(str::to_string),
            section: section.map(NodeId),
        };
        StickyTabGroup::from_nav(
            "panel-a",
            &StickyNavNode {
                nav: NodeId(10),
                links: vec![
                    link(11, "alpha", Some("sec-alpha"), Some(20)),
                    link(12, "beta", Some("sec-beta"), Some(21)),
                    link(13, "broken", Some("nowhere"), None),
                    link(14, "alpha-again", Some("sec-alpha"), Some(20)),
                ],
            },
        )
    }

    #[test]
    fn test_activate_is_exclusive() {
        let mut group = group();
        group.activate("alpha").unwrap();
        group.activate("beta").unwrap();
        assert_eq!(group.tabs.iter().filter(|t| t.active).count(), 1);
        assert_eq!(group.active().unwrap().id, "beta");
    }

    #[test]
    fn test_missing_section_is_rejected() {
        let mut group = group();
        group.activate("alpha").unwrap();

        assert_eq!(
            group.activate("broken").unwrap_err(),
            TabError::SectionNotFound("broken".to_string())
        );
        assert_eq!(
            group.activate("gamma").unwrap_err(),
            TabError::StickyNotFound("gamma".to_string())
        );
        assert_eq!(group.active().unwrap().id, "alpha");
    }

    #[test]
    fn test_sections_deduplicated() {
        let group = group();
        assert_eq!(group.sections(), vec![NodeId(20), NodeId(21)]);
        // First link wins for a shared section
        assert_eq!(group.tab_for_section(NodeId(20)).unwrap().id, "alpha");
    }

    #[test]
    fn test_watch_lifecycle() {
        let mut group = group();
        group.install_watch(WatchHandle(1));
        group.record_watch_activation(WatchHandle(1), "beta");
        assert_eq!(group.watch().unwrap().last_activated.as_deref(), Some("beta"));

        let old = group.take_watch().unwrap();
        assert_eq!(old.handle, WatchHandle(1));
        group.install_watch(WatchHandle(2));
        // A late entry from the disposed watch changes nothing
        group.record_watch_activation(WatchHandle(1), "alpha");
        assert_eq!(group.watch().unwrap().last_activated, None);
    }
}
