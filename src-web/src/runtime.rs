//! Event runtime
//!
//! Page callbacks never call into the coordinator directly. They are turned
//! into [`HostEvent`]s and handed to [`Runtime::dispatch`]; when the
//! coordinator is already busy (a callback raised by one of its own page
//! calls) the event waits in the [`EventQueue`] and is applied, in arrival
//! order, before the busy call returns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tabsync_core::{
    ActivateOptions, FrameHandle, IntersectionEntry, Key, NodeId, TabCoordinator, TimerHandle,
    WatchHandle,
};

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Click { node: NodeId, trusted: bool },
    Key { node: NodeId, key: Key },
    Resize,
    Timer(TimerHandle),
    Frame(FrameHandle),
    Intersections {
        handle: WatchHandle,
        entries: Vec<IntersectionEntry>,
    },
}

/// FIFO of events waiting for the coordinator. Clones share one queue.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Rc<RefCell<VecDeque<HostEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: HostEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    pub fn pop(&self) -> Option<HostEvent> {
        self.inner.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

pub struct Runtime {
    coordinator: TabCoordinator,
    queue: EventQueue,
}

impl Runtime {
    pub fn new(coordinator: TabCoordinator, queue: EventQueue) -> Self {
        Self { coordinator, queue }
    }

    pub fn coordinator(&self) -> &TabCoordinator {
        &self.coordinator
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Discover the page and run the initial activation sequence.
    pub fn initialize(&mut self) -> bool {
        let initialized = self.coordinator.initialize();
        self.drain();
        initialized
    }

    /// Apply `event` after anything already queued, then whatever it queued
    /// in turn. Returns whether `event` itself was handled, meaning the
    /// host should suppress the browser's default action.
    pub fn dispatch(&mut self, event: HostEvent) -> bool {
        self.drain();
        let handled = self.apply(event);
        self.drain();
        handled
    }

    /// Apply queued events until the queue is empty. Returns how many ran.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.queue.pop() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    pub fn activate_standard_tab(&mut self, tab_id: &str) -> bool {
        let activated = self
            .coordinator
            .activate_standard_tab(tab_id, ActivateOptions::programmatic());
        self.drain();
        activated
    }

    pub fn activate_sticky_tab(&mut self, tab_id: &str) -> bool {
        let activated = self
            .coordinator
            .activate_sticky_tab(tab_id, ActivateOptions::programmatic());
        self.drain();
        activated
    }

    fn apply(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::Click { node, trusted } => self.coordinator.handle_click(node, trusted),
            HostEvent::Key { node, key } => self.coordinator.handle_keydown(node, key),
            HostEvent::Resize => {
                self.coordinator.handle_resize();
                false
            }
            HostEvent::Timer(handle) => self.coordinator.fire_timer(handle),
            HostEvent::Frame(handle) => self.coordinator.fire_frame(handle),
            HostEvent::Intersections { handle, entries } => {
                self.coordinator.handle_intersections(handle, &entries)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tabsync_core::{Config, Host, ScrollBehavior};
    use tabsync_platform::memory::{
        ManualIntersections, ManualScheduler, MemoryAddressBar, MemoryPage,
    };

    use super::*;

    const PAGE: &str = r##"
<header data-height="50"></header>
<div class="standard-tabs">
    <button role="tab" id="overview" aria-controls="overview-panel">Overview</button>
    <button role="tab" id="specs" aria-controls="specs-panel">Specs</button>
</div>
<div class="standard-tabpanels">
    <div id="overview-panel" hidden><h3>Overview</h3></div>
    <div id="specs-panel" hidden>
        <h3>Specs</h3>
        <nav class="sticky-tabs" id="specs-nav" data-height="40" data-width="200">
            <a class="sticky-tabs__link" role="tab" id="size" href="#size-section" data-width="100">Size</a>
            <a class="sticky-tabs__link" role="tab" id="weight" href="#weight-section" data-left="100" data-width="100">Weight</a>
        </nav>
        <section id="size-section" data-offset-top="300" data-height="500"></section>
        <section id="weight-section" data-offset-top="800" data-height="500"></section>
    </div>
</div>
"##;

    struct Harness {
        page: MemoryPage,
        address: MemoryAddressBar,
        scheduler: ManualScheduler,
        intersections: ManualIntersections,
        runtime: Runtime,
    }

    impl Harness {
        fn new(href: &str) -> Self {
            let page = MemoryPage::from_html(PAGE);
            let address = MemoryAddressBar::new(href);
            let scheduler = ManualScheduler::new();
            let intersections = ManualIntersections::new();
            let host = Host::new(
                page.clone(),
                address.clone(),
                scheduler.clone(),
                intersections.clone(),
            );
            let coordinator = TabCoordinator::new(Config::default(), host).unwrap();

            Self {
                page,
                address,
                scheduler,
                intersections,
                runtime: Runtime::new(coordinator, EventQueue::new()),
            }
        }

        fn click(&self, id: &str) -> HostEvent {
            HostEvent::Click {
                node: self.page.node(id).unwrap(),
                trusted: true,
            }
        }

        fn entering(&self, section: &str) -> HostEvent {
            let node = self.page.node(section).unwrap();
            let observation = self.intersections.watching(node).unwrap();
            HostEvent::Intersections {
                handle: observation.handle,
                entries: vec![IntersectionEntry::entering(node)],
            }
        }

        /// Feed due timers and requested frames back through the runtime.
        fn advance(&mut self, dt: Duration) {
            for timer in self.scheduler.advance(dt) {
                self.runtime.dispatch(HostEvent::Timer(timer));
            }
            for frame in self.scheduler.take_frames() {
                self.runtime.dispatch(HostEvent::Frame(frame));
            }
        }

        fn active_standard(&self) -> Option<String> {
            self.runtime.coordinator().state().active_standard_tab.clone()
        }

        fn active_sticky(&self) -> Option<String> {
            self.runtime.coordinator().state().active_sticky_tab.clone()
        }
    }

    #[test]
    fn test_click_outcome_is_reported() {
        let mut h = Harness::new("https://shop.example/product");
        assert!(h.runtime.initialize());

        let click = h.click("specs");
        assert!(h.runtime.dispatch(click));
        assert_eq!(h.active_standard().as_deref(), Some("specs"));

        // Not a tab: the browser keeps its default action
        let heading = HostEvent::Click {
            node: h.page.node("overview-panel").unwrap(),
            trusted: true,
        };
        assert!(!h.runtime.dispatch(heading));
    }

    #[test]
    fn test_queued_events_run_first_and_in_order() {
        let mut h = Harness::new("https://shop.example/product");
        h.runtime.initialize();

        let queue = h.runtime.queue().clone();
        queue.push(h.click("specs"));
        queue.push(h.click("weight"));
        assert_eq!(queue.len(), 2);

        // Specs must be showing before its sticky link can answer
        let resize = HostEvent::Resize;
        h.runtime.dispatch(resize);
        assert!(queue.is_empty());
        assert_eq!(h.active_standard().as_deref(), Some("specs"));
        assert_eq!(h.active_sticky().as_deref(), Some("weight"));
        assert_eq!(
            h.address.current(),
            "https://shop.example/product?standardTab=specs&stickyTab=weight"
        );
    }

    #[test]
    fn test_drain_counts_applied_events() {
        let mut h = Harness::new("https://shop.example/product");
        h.runtime.initialize();

        let queue = h.runtime.queue().clone();
        assert_eq!(h.runtime.drain(), 0);
        queue.push(HostEvent::Resize);
        queue.push(h.click("overview"));
        assert_eq!(h.runtime.drain(), 2);
    }

    #[test]
    fn test_timer_events_end_the_cooldown() {
        let mut h = Harness::new("https://shop.example/product");
        h.runtime.initialize();
        let specs = h.click("specs");
        h.runtime.dispatch(specs);
        let weight = h.click("weight");
        h.runtime.dispatch(weight);

        let size = h.entering("size-section");
        assert!(!h.runtime.dispatch(size.clone()));
        assert_eq!(h.active_sticky().as_deref(), Some("weight"));

        h.advance(Duration::from_millis(500));
        assert!(h.runtime.dispatch(size));
        assert_eq!(h.active_sticky().as_deref(), Some("size"));
    }

    #[test]
    fn test_restore_scroll_runs_on_frame_event() {
        let mut h = Harness::new("https://shop.example/product?standardTab=specs&stickyTab=weight");
        h.runtime.initialize();
        assert!(h.page.window_scrolls().is_empty());

        h.advance(Duration::ZERO);
        let scrolls = h.page.window_scrolls();
        assert_eq!(scrolls.len(), 1);
        // 800 - (50 header + 40 nav)
        assert_eq!(scrolls[0].position, 710.0);
        assert_eq!(scrolls[0].behavior, ScrollBehavior::Instant);
    }

    #[test]
    fn test_keyboard_event_activates() {
        let mut h = Harness::new("https://shop.example/product");
        h.runtime.initialize();

        let overview = h.page.node("overview").unwrap();
        let right = HostEvent::Key {
            node: overview,
            key: Key::ArrowRight,
        };
        assert!(h.runtime.dispatch(right));
        assert_eq!(h.page.focused_id().as_deref(), Some("specs"));
        assert_eq!(h.active_standard().as_deref(), Some("overview"));

        let enter = HostEvent::Key {
            node: h.page.node("specs").unwrap(),
            key: Key::Enter,
        };
        assert!(h.runtime.dispatch(enter));
        assert_eq!(h.active_standard().as_deref(), Some("specs"));
    }

    #[test]
    fn test_programmatic_activation_drains_queue() {
        let mut h = Harness::new("https://shop.example/product");
        h.runtime.initialize();

        h.runtime.queue().push(HostEvent::Resize);
        assert!(h.runtime.activate_standard_tab("specs"));
        assert!(h.runtime.queue().is_empty());
        assert!(h.runtime.activate_sticky_tab("size"));
        assert!(!h.runtime.activate_sticky_tab("missing"));

        let snapshot = serde_json::to_value(h.runtime.coordinator().snapshot()).unwrap();
        assert_eq!(snapshot["activeStickyTab"], "size");
    }
}
