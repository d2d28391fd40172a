//! Registry of every tab discovered on the page

use tabsync_platform::{NodeId, PageStructure, WatchHandle};

use crate::error::TabError;
use crate::group::TabGroup;
use crate::sticky::StickyTabGroup;
use crate::tab::StandardPanel;
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct TabRegistry {
    groups: Vec<TabGroup>,
    panels: Vec<StandardPanel>,
}

impl TabRegistry {
    pub fn from_structure(structure: &PageStructure) -> Self {
        let registry = Self {
            groups: structure
                .tab_groups
                .iter()
                .map(|nodes| TabGroup::from_nodes(nodes))
                .collect(),
            panels: structure.panels.iter().map(StandardPanel::from_node).collect(),
        };

        tracing::info!(
            groups = registry.groups.len(),
            panels = registry.panels.len(),
            sticky_groups = registry.panels.iter().filter(|p| p.has_sticky_tabs()).count(),
            "Registered tabs"
        );

        registry
    }

    pub fn group(&self, index: usize) -> Option<&TabGroup> {
        self.groups.get(index)
    }

    pub fn group_mut(&mut self, index: usize) -> Option<&mut TabGroup> {
        self.groups.get_mut(index)
    }

    /// Group index and position of a standard tab
    pub fn locate_tab(&self, tab_id: &str) -> Option<(usize, usize)> {
        self.groups
            .iter()
            .enumerate()
            .find_map(|(g, group)| group.position(tab_id).map(|p| (g, p)))
    }

    pub fn locate_tab_node(&self, node: NodeId) -> Option<(usize, usize)> {
        self.groups
            .iter()
            .enumerate()
            .find_map(|(g, group)| group.position_of_node(node).map(|p| (g, p)))
    }

    pub fn contains_tab(&self, tab_id: &str) -> bool {
        self.locate_tab(tab_id).is_some()
    }

    /// First standard tab in document order
    pub fn first_tab_id(&self) -> Option<&str> {
        self.groups
            .iter()
            .find_map(|group| group.get(0))
            .map(|tab| tab.id.as_str())
    }

    pub fn panel(&self, panel_id: &str) -> Option<&StandardPanel> {
        self.panels.iter().find(|p| p.id == panel_id)
    }

    pub fn panel_mut(&mut self, panel_id: &str) -> Option<&mut StandardPanel> {
        self.panels.iter_mut().find(|p| p.id == panel_id)
    }

    /// Panel controlled by `tab_id`
    pub fn resolve_panel(&self, tab_id: &str) -> Result<&StandardPanel> {
        let (g, p) = self
            .locate_tab(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        let panel_id = self.groups[g]
            .get(p)
            .and_then(|tab| tab.panel_id.as_deref())
            .unwrap_or_default();

        self.panel(panel_id).ok_or_else(|| TabError::PanelNotFound {
            tab: tab_id.to_string(),
            panel: panel_id.to_string(),
        })
    }

    /// The visible panel, if any
    pub fn visible_panel(&self) -> Option<&StandardPanel> {
        self.panels.iter().find(|p| p.visible)
    }

    pub fn sticky_group(&self, panel_id: &str) -> Option<&StickyTabGroup> {
        self.panel(panel_id).and_then(|p| p.sticky.as_ref())
    }

    pub fn sticky_group_mut(&mut self, panel_id: &str) -> Option<&mut StickyTabGroup> {
        self.panel_mut(panel_id).and_then(|p| p.sticky.as_mut())
    }

    /// Visible panel holding the sticky tab `tab_id`. Links of hidden panels
    /// are never activated.
    pub fn locate_link(&self, tab_id: &str) -> Option<&str> {
        self.panels
            .iter()
            .filter(|panel| panel.visible)
            .find(|panel| {
                panel
                    .sticky
                    .as_ref()
                    .is_some_and(|group| group.position(tab_id).is_some())
            })
            .map(|panel| panel.id.as_str())
    }

    /// Panel id and position of a sticky link whose group is bound
    pub fn locate_link_node(&self, node: NodeId) -> Option<(String, usize)> {
        self.panels.iter().find_map(|panel| {
            let group = panel.sticky.as_ref().filter(|g| g.is_bound())?;
            group
                .position_of_node(node)
                .map(|position| (panel.id.clone(), position))
        })
    }

    /// Panel whose sticky group owns the watch `handle`
    pub fn panel_for_watch(&self, handle: WatchHandle) -> Option<&str> {
        self.panels
            .iter()
            .find(|panel| {
                panel
                    .sticky
                    .as_ref()
                    .and_then(StickyTabGroup::watch)
                    .map(|w| w.handle)
                    == Some(handle)
            })
            .map(|panel| panel.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_platform::{LinkNode, PanelNode, StickyNavNode, TabNode};

    fn structure() -> PageStructure {
        let tab = |n: usize, id: &str, controls: &str| TabNode {
            node: NodeId(n),
            id: id.to_string(),
            controls: Some(controls.to_string()),
        };
        PageStructure {
            tab_groups: vec![vec![
                tab(1, "tab-a", "panel-a"),
                tab(2, "tab-b", "panel-b"),
                tab(3, "tab-c", "panel-gone"),
            ]],
            panels: vec![
                PanelNode {
                    node: NodeId(10),
                    id: "panel-a".to_string(),
                    focus_target: NodeId(11),
                    sticky: Some(StickyNavNode {
                        nav: NodeId(12),
                        links: vec![LinkNode {
                            node: NodeId(13),
                            id: "alpha".to_string(),
                            target: Some("sec-alpha".to_string()),
                            section: Some(NodeId(14)),
                        }],
                    }),
                },
                PanelNode {
                    node: NodeId(20),
                    id: "panel-b".to_string(),
                    focus_target: NodeId(20),
                    sticky: None,
                },
            ],
        }
    }

    #[test]
    fn test_resolve_panel() {
        let registry = TabRegistry::from_structure(&structure());
        assert_eq!(registry.resolve_panel("tab-b").unwrap().id, "panel-b");
        assert_eq!(
            registry.resolve_panel("tab-c").unwrap_err(),
            TabError::PanelNotFound {
                tab: "tab-c".to_string(),
                panel: "panel-gone".to_string(),
            }
        );
        assert_eq!(
            registry.resolve_panel("tab-x").unwrap_err(),
            TabError::NotFound("tab-x".to_string())
        );
    }

    #[test]
    fn test_lookups() {
        let registry = TabRegistry::from_structure(&structure());
        assert_eq!(registry.first_tab_id(), Some("tab-a"));
        assert_eq!(registry.locate_tab_node(NodeId(2)), Some((0, 1)));
        assert!(registry.contains_tab("tab-c"));
        assert!(registry.visible_panel().is_none());
    }

    #[test]
    fn test_links_route_only_when_bound() {
        let mut registry = TabRegistry::from_structure(&structure());
        assert_eq!(registry.locate_link_node(NodeId(13)), None);

        registry.sticky_group_mut("panel-a").unwrap().bind();
        assert_eq!(
            registry.locate_link_node(NodeId(13)),
            Some(("panel-a".to_string(), 0))
        );
    }

    #[test]
    fn test_locate_link_only_in_visible_panel() {
        let mut registry = TabRegistry::from_structure(&structure());
        assert_eq!(registry.locate_link("alpha"), None);

        registry.panel_mut("panel-a").unwrap().visible = true;
        assert_eq!(registry.locate_link("alpha"), Some("panel-a"));
        assert_eq!(registry.locate_link("omega"), None);
    }

    #[test]
    fn test_panel_for_watch() {
        let mut registry = TabRegistry::from_structure(&structure());
        registry
            .sticky_group_mut("panel-a")
            .unwrap()
            .install_watch(WatchHandle(3));
        assert_eq!(registry.panel_for_watch(WatchHandle(3)), Some("panel-a"));
        assert_eq!(registry.panel_for_watch(WatchHandle(4)), None);
    }
}
