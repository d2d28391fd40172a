//! Structural contract discovered from the page
//!
//! ```text
//! .standard-tabs            [role="tab"] id=… aria-controls=panel
//! .standard-tabpanels
//!   #panel                  (h3 | h2)?
//!     .sticky-tabs          .sticky-tabs__link[role="tab"] id=… href="#section"
//!     #section …
//! ```

use crate::document::NodeId;

/// CSS selectors locating the three structural roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub standard_tabs: String,
    pub standard_panels_container: String,
    pub sticky_tabs_nav: String,
    pub sticky_link: String,
}

impl Selectors {
    /// Tabs inside a standard tab container
    pub const TAB_ROLE: &'static str = r#"[role="tab"]"#;
    /// Candidates for a panel's focus target, in order of preference
    pub const PANEL_HEADINGS: [&'static str; 2] = ["h3", "h2"];
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            standard_tabs: ".standard-tabs".to_string(),
            standard_panels_container: ".standard-tabpanels".to_string(),
            sticky_tabs_nav: ".sticky-tabs".to_string(),
            sticky_link: r#".sticky-tabs__link[role="tab"]"#.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabNode {
    pub node: NodeId,
    pub id: String,
    /// `aria-controls` value
    pub controls: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelNode {
    pub node: NodeId,
    pub id: String,
    /// First `h3`, else first `h2`, else the panel itself
    pub focus_target: NodeId,
    pub sticky: Option<StickyNavNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickyNavNode {
    pub nav: NodeId,
    pub links: Vec<LinkNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkNode {
    pub node: NodeId,
    pub id: String,
    /// Section id taken from `href="#…"`
    pub target: Option<String>,
    /// Resolved section element
    pub section: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStructure {
    /// One entry per standard tab container, tabs in document order
    pub tab_groups: Vec<Vec<TabNode>>,
    /// Every panel referenced by a tab that could be resolved
    pub panels: Vec<PanelNode>,
}

impl PageStructure {
    pub fn tab_count(&self) -> usize {
        self.tab_groups.iter().map(Vec::len).sum()
    }
}

/// Section id referenced by a link's `href`, if it is a same-page fragment.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_target() {
        assert_eq!(fragment_target("#overview"), Some("overview"));
        assert_eq!(fragment_target("#"), None);
        assert_eq!(fragment_target("/elsewhere"), None);
    }
}
