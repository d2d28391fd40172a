//! A container of standard tabs
//!
//! At most one tab of a group is active at a time.

use tabsync_platform::{NodeId, TabNode};

use crate::error::TabError;
use crate::tab::StandardTab;
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct TabGroup {
    tabs: Vec<StandardTab>,
}

impl TabGroup {
    pub fn from_nodes(nodes: &[TabNode]) -> Self {
        Self {
            tabs: nodes
                .iter()
                .enumerate()
                .map(|(position, node)| StandardTab::from_node(node, position))
                .collect(),
        }
    }

    pub fn tabs(&self) -> &[StandardTab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&StandardTab> {
        self.tabs.get(position)
    }

    pub fn position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub fn position_of_node(&self, node: NodeId) -> Option<usize> {
        self.tabs.iter().position(|t| t.node == node)
    }

    pub fn active(&self) -> Option<&StandardTab> {
        self.tabs.iter().find(|t| t.active)
    }

    /// Panels of every tab in the group, in tab order
    pub fn panel_ids(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().filter_map(|t| t.panel_id.as_deref())
    }

    /// Make `tab_id` the only active tab of the group.
    pub fn activate(&mut self, tab_id: &str) -> Result<&StandardTab> {
        let position = self
            .position(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        for tab in &mut self.tabs {
            tab.active = false;
        }
        self.tabs[position].active = true;

        tracing::debug!(tab_id = %tab_id, position, "Standard tab active in group");

        Ok(&self.tabs[position])
    }
}
