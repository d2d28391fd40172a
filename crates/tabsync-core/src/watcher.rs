//! Scroll-intersection watcher
//!
//! One watch per visible sticky group. A section counts as "in view" once it
//! crosses a thin band just below the header and the pinned nav:
//!
//! ```text
//! ┌──────────── viewport ────────────┐
//! │ header + nav + offset + 1        │  top margin (excluded)
//! ├──────────────────────────────────┤
//! │ 50px band                        │  observed
//! ├──────────────────────────────────┤
//! │ rest of the viewport             │  bottom margin (excluded)
//! └──────────────────────────────────┘
//! ```

use tabsync_navigation::{STANDARD_TAB_PARAM, STICKY_TAB_PARAM};
use tabsync_platform::{IntersectionEntry, RootMargin, WatchHandle};
use tabsync_tabs::ActivateOptions;

use crate::coordinator::TabCoordinator;

/// Fraction of a section that must be inside the band
pub const WATCH_THRESHOLD: f64 = 0.01;

/// Root margin of the observed band.
pub fn watch_margin(header_height: f64, nav_height: f64, sticky_offset: f64, viewport_height: f64) -> RootMargin {
    let covered = header_height + nav_height + sticky_offset;
    RootMargin {
        top: -(covered + 1.0),
        right: 0.0,
        bottom: -(viewport_height - covered - 50.0),
        left: 0.0,
    }
}

impl TabCoordinator {
    /// Dispose the group's watch, if any, and observe its sections afresh.
    pub(crate) fn arm_watcher(&mut self, panel_id: &str) {
        let Some(group) = self.registry.sticky_group_mut(panel_id) else {
            return;
        };
        if let Some(old) = group.take_watch() {
            self.host.intersections.disconnect(old.handle);
        }

        let sections = group.sections();
        if sections.is_empty() {
            tracing::debug!(panel_id = %panel_id, "No sections to watch");
            return;
        }

        let nav_height = self.host.document.offset_height(group.nav);
        let margin = watch_margin(
            self.state.header_height,
            nav_height,
            self.config.sticky_offset,
            self.host.document.viewport_height(),
        );
        let handle = self
            .host
            .intersections
            .observe(margin, WATCH_THRESHOLD, &sections);
        group.install_watch(handle);

        tracing::debug!(
            panel_id = %panel_id,
            watch = handle.0,
            sections = sections.len(),
            margin = %margin.to_css(),
            "Armed sticky watcher"
        );
    }

    /// A batch of intersection changes for the watch `handle`. Returns whether
    /// any sticky tab was activated.
    ///
    /// Batches from a disposed watch, and every batch while a user click is
    /// cooling down, are dropped. When nothing intersects the active tab
    /// stays as it is.
    pub fn handle_intersections(&mut self, handle: WatchHandle, entries: &[IntersectionEntry]) -> bool {
        let Some(panel_id) = self.registry.panel_for_watch(handle).map(str::to_string) else {
            tracing::debug!(watch = handle.0, "Ignoring entries from a disposed watch");
            return false;
        };
        if self.state.user_interacting {
            tracing::debug!(panel_id = %panel_id, "User interacting, ignoring scroll");
            return false;
        }

        let mut activated = false;
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some(group) = self.registry.sticky_group(&panel_id) else {
                break;
            };
            let Some(tab) = group.tab_for_section(entry.target) else {
                continue;
            };
            // Compared against the watch's own last activation only. Clicks
            // do not touch it, so scrolling back to that section after a
            // click is still a no-op.
            let already = group
                .watch()
                .and_then(|w| w.last_activated.as_deref())
                .is_some_and(|last| last == tab.id);
            if already {
                continue;
            }
            let tab_id = tab.id.clone();

            if let Err(err) = self.try_activate_sticky_tab(&panel_id, &tab_id, ActivateOptions::automatic()) {
                tracing::error!(tab_id = %tab_id, error = %err, "Sticky tab activation failed");
                continue;
            }
            if let Some(group) = self.registry.sticky_group_mut(&panel_id) {
                group.record_watch_activation(handle, &tab_id);
            }
            activated = true;

            if self.url.is_active() && self.state.initial_sequence_completed {
                let address = self.host.address.as_mut();
                self.url.write_param(address, STICKY_TAB_PARAM, Some(tab_id.as_str()));
                if let Some(standard) = self.state.active_standard_tab.as_deref() {
                    self.url.write_param(address, STANDARD_TAB_PARAM, Some(standard));
                }
            }
        }

        activated
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tabsync_platform::memory::MemoryPage;
    use tabsync_platform::Rect;

    use super::*;
    use crate::fixture::{Fixture, PAGE};

    #[test]
    fn test_watch_margin() {
        let margin = watch_margin(60.0, 48.0, 0.0, 800.0);
        assert_eq!(margin.top, -109.0);
        assert_eq!(margin.bottom, -642.0);
        assert_eq!(margin.to_css(), "-109px 0px -642px 0px");

        // A negative offset lets the band start under the nav
        let margin = watch_margin(60.0, 48.0, -8.0, 800.0);
        assert_eq!(margin.top, -101.0);
        assert_eq!(margin.bottom, -650.0);
    }

    #[test]
    fn test_watcher_armed_for_active_panel() {
        let mut fx = Fixture::new(PAGE, "https://example.com/");
        fx.coordinator.initialize();

        let observation = fx.intersections.active();
        assert_eq!(observation.len(), 1);
        assert_eq!(observation[0].threshold, WATCH_THRESHOLD);
        assert_eq!(observation[0].margin, watch_margin(60.0, 48.0, 0.0, 800.0));
        // ghost has no section
        assert_eq!(
            observation[0].targets,
            vec![fx.node("sec-alpha"), fx.node("sec-beta"), fx.node("sec-gamma")]
        );
    }

    #[test]
    fn test_scroll_activates_without_scrolling_window() {
        let mut fx = Fixture::new(PAGE, "https://example.com/");
        fx.coordinator.initialize();
        fx.page.clear_scrolls();

        assert!(fx.scroll_into("sec-beta"));
        assert_eq!(fx.coordinator.state().active_sticky_tab.as_deref(), Some("beta"));
        assert!(fx.page.window_scrolls().is_empty());
        assert_eq!(fx.page.label_count("beta", "blind"), 1);
        // Bare address: the sequence completed on load, so scrolling persists
        assert_eq!(
            fx.address.current(),
            "https://example.com/?stickyTab=beta&standardTab=tab-a"
        );

        // Same section again is not re-activated
        assert!(!fx.scroll_into("sec-beta"));
        assert!(fx.scroll_into("sec-gamma"));
        assert_eq!(fx.coordinator.state().active_sticky_tab.as_deref(), Some("gamma"));
    }

    #[test]
    fn test_nothing_intersecting_keeps_active_tab() {
        let mut fx = Fixture::new(PAGE, "https://example.com/");
        fx.coordinator.initialize();
        fx.scroll_into("sec-alpha");

        let handle = fx.intersections.active()[0].handle;
        let alpha = fx.node("sec-alpha");
        assert!(!fx
            .coordinator
            .handle_intersections(handle, &[IntersectionEntry::leaving(alpha)]));
        assert_eq!(fx.coordinator.state().active_sticky_tab.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_cooldown_blocks_watcher() {
        let mut fx = Fixture::new(PAGE, "https://example.com/");
        fx.coordinator.initialize();

        fx.click("gamma");
        assert!(!fx.scroll_into("sec-alpha"));
        fx.advance(Duration::from_millis(499));
        assert!(!fx.scroll_into("sec-alpha"));
        assert_eq!(fx.coordinator.state().active_sticky_tab.as_deref(), Some("gamma"));

        fx.advance(Duration::from_millis(1));
        assert!(!fx.coordinator.state().user_interacting);
        assert!(fx.scroll_into("sec-alpha"));
        assert_eq!(fx.coordinator.state().active_sticky_tab.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_click_does_not_reset_last_watch_activation() {
        let mut fx = Fixture::new(PAGE, "https://example.com/");
        fx.coordinator.initialize();

        assert!(fx.scroll_into("sec-beta"));
        fx.click("gamma");
        fx.advance(Duration::from_millis(500));

        // beta is still the watch's last activation
        assert!(!fx.scroll_into("sec-beta"));
        assert_eq!(fx.coordinator.state().active_sticky_tab.as_deref(), Some("gamma"));

        assert!(fx.scroll_into("sec-alpha"));
        assert!(fx.scroll_into("sec-beta"));
        assert_eq!(fx.coordinator.state().active_sticky_tab.as_deref(), Some("beta"));
    }

    #[test]
    fn test_repeated_clicks_extend_cooldown() {
        let mut fx = Fixture::new(PAGE, "https://example.com/");
        fx.coordinator.initialize();

        fx.click("gamma");
        fx.advance(Duration::from_millis(400));
        fx.click("beta");
        fx.advance(Duration::from_millis(400));
        // First timer was replaced, so the flag is still up
        assert!(fx.coordinator.state().user_interacting);
        fx.advance(Duration::from_millis(100));
        assert!(!fx.coordinator.state().user_interacting);
    }

    #[test]
    fn test_switching_panels_disposes_watch() {
        let mut fx = Fixture::new(PAGE, "https://example.com/");
        fx.coordinator.initialize();
        let old = fx.intersections.active()[0].handle;

        fx.click("tab-b");
        assert!(!fx.intersections.get(old).unwrap().connected);
        let active = fx.intersections.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].targets, vec![fx.node("sec-delta")]);

        // Late batch from the disposed watch
        let alpha = fx.node("sec-alpha");
        assert!(!fx
            .coordinator
            .handle_intersections(old, &[IntersectionEntry::entering(alpha)]));
        assert_eq!(fx.coordinator.state().active_sticky_tab, None);
    }

    #[test]
    fn test_resize_rearms_and_recenters() {
        let mut fx = Fixture::new(PAGE, "https://example.com/");
        fx.coordinator.initialize();
        fx.click("gamma");
        let before = fx.intersections.active()[0].handle;

        fx.page.set_header_height(80.0);
        fx.page.set_viewport_height(600.0);
        fx.page.set_media("(max-width: 767px)", true);
        fx.page.set_rect("gamma", Rect::new(260.0, 0.0, 100.0, 48.0));
        fx.coordinator.handle_resize();

        let state = fx.coordinator.state();
        assert_eq!(state.header_height, 80.0);
        assert!(state.is_mobile);

        assert!(!fx.intersections.get(before).unwrap().connected);
        let active = fx.intersections.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].margin, watch_margin(80.0, 48.0, 0.0, 600.0));

        // 100 already scrolled + 260 - 150 + 50
        let call = fx.page.element_scrolls("nav-a").last().copied().unwrap();
        assert_eq!(call.position, 260.0);
        assert_eq!(call.behavior, tabsync_platform::ScrollBehavior::Smooth);
    }

    #[test]
    fn test_resize_before_initialize_is_ignored() {
        let page = MemoryPage::from_html(PAGE);
        let mut fx = Fixture::from_page(page, "https://example.com/", crate::Config::default());
        fx.coordinator.handle_resize();
        assert_eq!(fx.intersections.started(), 0);
    }
}
