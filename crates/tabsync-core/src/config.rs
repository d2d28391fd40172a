//! Coordinator configuration
//!
//! Keys are camelCase so a page can pass the same options object it always
//! has, e.g. `{"defaultStandardTabId": "tab-b", "updateURL": false}`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use tabsync_platform::{ScrollBehavior, Selectors};

use crate::error::CoreError;
use crate::Result;

/// Viewport query for the mobile layout
pub const MOBILE_MEDIA_QUERY: &str = "(max-width: 767px)";

/// Cooldown after a user click when scrolling is not animated
pub const INSTANT_COOLDOWN: Duration = Duration::from_millis(50);

/// Expected duration of an animated nav scroll
pub const NAV_SETTLE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub standard_tabs_selector: String,
    pub standard_panels_container_selector: String,
    pub sticky_tabs_nav_selector: String,
    pub sticky_link_selector: String,
    /// Generic class added to every active tab, panel and link
    pub active_class: String,
    pub standard_tab_active_class: String,
    pub standard_panel_active_class: String,
    pub sticky_link_active_class: String,
    pub default_standard_tab_id: Option<String>,
    /// Extra space kept above a section scrolled into view, in pixels
    pub sticky_offset: f64,
    pub scroll_behavior: ScrollBehavior,
    #[serde(rename = "updateURL")]
    pub update_url: bool,
    pub focus_panel_on_activate: bool,
    pub focus_section_on_scroll: bool,
    /// Milliseconds a user click keeps scroll-driven activation off
    pub observer_disable_delay: u64,
    pub instant_scroll_on_user_click: bool,
    /// Visually hidden text announcing the active sticky tab
    pub selected_label_text: String,
    pub selected_label_class: String,
}

impl Default for Config {
    fn default() -> Self {
        let selectors = Selectors::default();
        Self {
            standard_tabs_selector: selectors.standard_tabs,
            standard_panels_container_selector: selectors.standard_panels_container,
            sticky_tabs_nav_selector: selectors.sticky_tabs_nav,
            sticky_link_selector: selectors.sticky_link,
            active_class: "active".to_string(),
            standard_tab_active_class: "standard-tabs__button--active".to_string(),
            standard_panel_active_class: "standard-tabpanels__panel--active".to_string(),
            sticky_link_active_class: "active".to_string(),
            default_standard_tab_id: None,
            sticky_offset: 0.0,
            scroll_behavior: ScrollBehavior::Smooth,
            update_url: true,
            focus_panel_on_activate: true,
            focus_section_on_scroll: true,
            observer_disable_delay: 500,
            instant_scroll_on_user_click: true,
            selected_label_text: "selected".to_string(),
            selected_label_class: "blind".to_string(),
        }
    }
}

impl Config {
    /// Parse a JSON options object. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sticky_offset.is_finite() {
            return Err(CoreError::Config(format!(
                "stickyOffset must be a finite number, got {}",
                self.sticky_offset
            )));
        }

        let required = [
            ("standardTabsSelector", &self.standard_tabs_selector),
            (
                "standardPanelsContainerSelector",
                &self.standard_panels_container_selector,
            ),
            ("stickyTabsNavSelector", &self.sticky_tabs_nav_selector),
            ("stickyLinkSelector", &self.sticky_link_selector),
            ("activeClass", &self.active_class),
            ("standardTabActiveClass", &self.standard_tab_active_class),
            ("standardPanelActiveClass", &self.standard_panel_active_class),
            ("stickyLinkActiveClass", &self.sticky_link_active_class),
            ("selectedLabelClass", &self.selected_label_class),
        ];
        if let Some((key, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(CoreError::Config(format!("{} must not be empty", key)));
        }

        Ok(())
    }

    pub fn selectors(&self) -> Selectors {
        Selectors {
            standard_tabs: self.standard_tabs_selector.clone(),
            standard_panels_container: self.standard_panels_container_selector.clone(),
            sticky_tabs_nav: self.sticky_tabs_nav_selector.clone(),
            sticky_link: self.sticky_link_selector.clone(),
        }
    }

    /// How long a user click blocks scroll-driven activation
    pub fn cooldown(&self) -> Duration {
        match self.scroll_behavior {
            ScrollBehavior::Smooth => Duration::from_millis(self.observer_disable_delay),
            _ => INSTANT_COOLDOWN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.update_url);
        assert_eq!(config.scroll_behavior, ScrollBehavior::Smooth);
        assert_eq!(config.cooldown(), Duration::from_millis(500));
        assert_eq!(config.selectors(), Selectors::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_camel_case() {
        let config = Config::from_json(
            r#"{
                "defaultStandardTabId": "tab-b",
                "updateURL": false,
                "stickyOffset": 12,
                "scrollBehavior": "instant"
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_standard_tab_id.as_deref(), Some("tab-b"));
        assert!(!config.update_url);
        assert_eq!(config.sticky_offset, 12.0);
        assert_eq!(config.cooldown(), INSTANT_COOLDOWN);
        // Untouched keys keep their defaults
        assert_eq!(config.active_class, "active");
    }

    #[test]
    fn test_negative_offset_is_accepted() {
        let config = Config::from_json(r#"{"stickyOffset": -4}"#).unwrap();
        assert_eq!(config.sticky_offset, -4.0);
    }

    #[test]
    fn test_validate_rejects() {
        let err = Config {
            sticky_offset: f64::INFINITY,
            ..Config::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("stickyOffset"));

        let err = Config::from_json(r#"{"activeClass": " "}"#).unwrap_err();
        assert!(err.to_string().contains("activeClass"));

        let err = Config::from_json(r#"{"scrollBehavior": "bounce"}"#).unwrap_err();
        assert!(matches!(err, CoreError::Serialization(_)));
    }
}
