//! Test page and host wiring

use std::time::Duration;

use tabsync_platform::memory::{
    ManualIntersections, ManualScheduler, MemoryAddressBar, MemoryPage,
};
use tabsync_platform::{IntersectionEntry, NodeId};
use tabsync_tabs::Key;

use crate::config::Config;
use crate::coordinator::TabCoordinator;
use crate::host::Host;

/// Header 60px, sticky navs 48px/40px, nav-a 300px wide with 100px links.
pub(crate) const PAGE: &str = r##"
<header data-height="60"></header>
<div class="standard-tabs">
    <button role="tab" id="tab-a" aria-controls="panel-a">A</button>
    <button role="tab" id="tab-b" aria-controls="panel-b">B</button>
    <button role="tab" id="tab-c" aria-controls="panel-c">C</button>
</div>
<div class="standard-tabs">
    <button role="tab" id="tab-orphan" aria-controls="panel-missing">Orphan</button>
</div>
<div class="standard-tabpanels">
    <div id="panel-a" hidden>
        <h3 id="panel-a-title">Panel A</h3>
        <nav class="sticky-tabs" id="nav-a" data-height="48" data-width="300">
            <a class="sticky-tabs__link" role="tab" id="alpha" href="#sec-alpha" data-left="0" data-width="100">Alpha</a>
            <a class="sticky-tabs__link" role="tab" id="beta" href="#sec-beta" data-left="100" data-width="100">Beta</a>
            <a class="sticky-tabs__link" role="tab" id="gamma" href="#sec-gamma" data-left="200" data-width="100">Gamma</a>
            <a class="sticky-tabs__link" role="tab" id="ghost" href="#sec-ghost">Ghost</a>
        </nav>
        <section id="sec-alpha" data-offset-top="400" data-height="600"></section>
        <section id="sec-beta" data-offset-top="1000" data-height="600"></section>
        <section id="sec-gamma" data-offset-top="1600" data-height="600"></section>
    </div>
    <div id="panel-b" hidden>
        <h2>Panel B</h2>
        <h3 id="panel-b-title">Panel B details</h3>
        <nav class="sticky-tabs" id="nav-b" data-height="40" data-width="300">
            <a class="sticky-tabs__link" role="tab" id="delta" href="#sec-delta" data-width="100">Delta</a>
        </nav>
        <section id="sec-delta" data-offset-top="500" data-height="400"></section>
    </div>
    <div id="panel-c" hidden>
        <p>No headings here</p>
    </div>
</div>
"##;

pub(crate) struct Fixture {
    pub page: MemoryPage,
    pub address: MemoryAddressBar,
    pub scheduler: ManualScheduler,
    pub intersections: ManualIntersections,
    pub coordinator: TabCoordinator,
}

impl Fixture {
    pub fn new(html: &str, href: &str) -> Self {
        Self::with_config(html, href, Config::default())
    }

    pub fn with_config(html: &str, href: &str, config: Config) -> Self {
        Self::from_page(MemoryPage::from_html(html), href, config)
    }

    pub fn from_page(page: MemoryPage, href: &str, config: Config) -> Self {
        Self::from_parts(page, MemoryAddressBar::new(href), config)
    }

    pub fn from_parts(page: MemoryPage, address: MemoryAddressBar, config: Config) -> Self {
        let scheduler = ManualScheduler::new();
        let intersections = ManualIntersections::new();
        let host = Host::new(
            page.clone(),
            address.clone(),
            scheduler.clone(),
            intersections.clone(),
        );
        let coordinator = TabCoordinator::new(config, host).unwrap();

        Self {
            page,
            address,
            scheduler,
            intersections,
            coordinator,
        }
    }

    pub fn node(&self, id: &str) -> NodeId {
        self.page
            .node(id)
            .unwrap_or_else(|| panic!("no element #{}", id))
    }

    /// Trusted click
    pub fn click(&mut self, id: &str) -> bool {
        let node = self.node(id);
        self.coordinator.handle_click(node, true)
    }

    pub fn key(&mut self, id: &str, key: &str) -> bool {
        let node = self.node(id);
        match Key::from_dom(key) {
            Some(key) => self.coordinator.handle_keydown(node, key),
            None => false,
        }
    }

    /// Move the clock, firing every timer that comes due.
    pub fn advance(&mut self, dt: Duration) {
        for timer in self.scheduler.advance(dt) {
            self.coordinator.fire_timer(timer);
        }
    }

    pub fn run_frames(&mut self) {
        for frame in self.scheduler.take_frames() {
            self.coordinator.fire_frame(frame);
        }
    }

    /// Deliver an entry for `section` entering the band of its watch.
    pub fn scroll_into(&mut self, section: &str) -> bool {
        let node = self.node(section);
        let Some(observation) = self.intersections.watching(node) else {
            return false;
        };
        self.coordinator
            .handle_intersections(observation.handle, &[IntersectionEntry::entering(node)])
    }
}
