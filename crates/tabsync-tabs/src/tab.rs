//! Standard tabs and their panels

use serde::Serialize;

use tabsync_platform::{NodeId, PanelNode, TabNode};

use crate::sticky::StickyTabGroup;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardTab {
    pub id: String,
    pub node: NodeId,
    /// Panel named by `aria-controls`
    pub panel_id: Option<String>,
    /// Index inside the owning group
    pub position: usize,
    pub active: bool,
}

impl StandardTab {
    pub fn from_node(tab: &TabNode, position: usize) -> Self {
        Self {
            id: tab.id.clone(),
            node: tab.node,
            panel_id: tab.controls.clone(),
            position,
            active: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardPanel {
    pub id: String,
    pub node: NodeId,
    /// Element focused when the panel is activated
    pub focus_target: NodeId,
    /// Mirrors the owning tab's active flag
    pub visible: bool,
    pub sticky: Option<StickyTabGroup>,
}

impl StandardPanel {
    pub fn from_node(panel: &PanelNode) -> Self {
        Self {
            id: panel.id.clone(),
            node: panel.node,
            focus_target: panel.focus_target,
            visible: false,
            sticky: panel
                .sticky
                .as_ref()
                .map(|nav| StickyTabGroup::from_nav(&panel.id, nav)),
        }
    }

    pub fn has_sticky_tabs(&self) -> bool {
        self.sticky.is_some()
    }
}
