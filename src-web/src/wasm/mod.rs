//! `wasm-bindgen` exports
//!
//! ```js
//! import init, { TabSync, initLogging } from "./tabsync_web.js";
//! await init();
//! initLogging("info");
//! const tabs = new TabSync({ updateURL: true, stickyOffset: 12 });
//! tabs.init();
//! ```

mod address;
mod console;
mod intersections;
mod page;
mod schedule;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tabsync_core::{Config, Host, Key, TabCoordinator};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, KeyboardEvent, MouseEvent, Window};

use crate::runtime::{EventQueue, HostEvent, Runtime};
use address::WebAddressBar;
use intersections::WebIntersections;
use page::{NodeTable, WebPage};
use schedule::WebScheduler;

/// What every callback reaches the coordinator through
pub(crate) struct Shared {
    queue: EventQueue,
    runtime: RefCell<Option<Runtime>>,
}

impl Shared {
    /// Apply `event` now, or queue it when the coordinator is busy. Returns
    /// the outcome only when the event ran.
    pub fn deliver(&self, event: HostEvent) -> Option<bool> {
        match self.runtime.try_borrow_mut() {
            Ok(mut guard) => match guard.as_mut() {
                Some(runtime) => Some(runtime.dispatch(event)),
                None => {
                    self.queue.push(event);
                    None
                }
            },
            Err(_) => {
                self.queue.push(event);
                None
            }
        }
    }

    fn with_runtime<T>(&self, f: impl FnOnce(&mut Runtime) -> T) -> Option<T> {
        let mut guard = self.runtime.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    }
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = match info.location() {
                Some(loc) => format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                ),
                None => format!("panic: {info}"),
            };
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn config_from_js(options: &JsValue) -> Result<Config, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(Config::default());
    }
    let json = js_sys::JSON::stringify(options)?
        .as_string()
        .ok_or_else(|| JsValue::from_str("options are not serializable"))?;
    Config::from_json(&json).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Node of the event's target, or of its nearest known ancestor
fn target_node(nodes: &NodeTable, event: &Event) -> Option<tabsync_core::NodeId> {
    let element = event.target()?.dyn_into::<Element>().ok()?;
    nodes.closest(&element)
}

/// Install `console` logging. `filter` takes `tracing` filter directives
/// such as `"debug"` or `"tabsync_core=debug,info"`.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(filter: Option<String>) {
    console::init(filter.as_deref().unwrap_or("info"));
}

/// Tab coordinator bound to the current page
#[wasm_bindgen]
pub struct TabSync {
    shared: Rc<Shared>,
    window: Window,
    document: web_sys::Document,
    nodes: NodeTable,
    listening: bool,
}

#[wasm_bindgen]
impl TabSync {
    /// `options` is the configuration object, camelCase keys, every key
    /// optional.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<TabSync, JsValue> {
        install_panic_hook();
        let config = config_from_js(&options)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let nodes = NodeTable::default();

        let shared = Rc::new(Shared {
            queue: EventQueue::new(),
            runtime: RefCell::new(None),
        });
        let weak = Rc::downgrade(&shared);
        let host = Host::new(
            WebPage::new(window.clone(), document.clone(), nodes.clone()),
            WebAddressBar::new(window.clone()),
            WebScheduler::new(window.clone(), weak.clone()),
            WebIntersections::new(weak, nodes.clone()),
        );
        let coordinator =
            TabCoordinator::new(config, host).map_err(|err| JsValue::from_str(&err.to_string()))?;
        *shared.runtime.borrow_mut() = Some(Runtime::new(coordinator, shared.queue.clone()));

        Ok(Self {
            shared,
            window,
            document,
            nodes,
            listening: false,
        })
    }

    /// Discover the tabs, run the initial activation and start listening for
    /// clicks, keys and resizes. Call once the DOM is ready.
    pub fn init(&mut self) -> Result<bool, JsValue> {
        let initialized = self
            .shared
            .with_runtime(Runtime::initialize)
            .unwrap_or(false);
        if initialized && !self.listening {
            self.listen()?;
            self.listening = true;
        }
        Ok(initialized)
    }

    #[wasm_bindgen(js_name = activateStandardTab)]
    pub fn activate_standard_tab(&self, tab_id: &str) -> bool {
        self.shared
            .with_runtime(|runtime| runtime.activate_standard_tab(tab_id))
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = activateStickyTab)]
    pub fn activate_sticky_tab(&self, tab_id: &str) -> bool {
        self.shared
            .with_runtime(|runtime| runtime.activate_sticky_tab(tab_id))
            .unwrap_or(false)
    }

    /// Re-measure after a layout change the window did not report.
    pub fn resize(&self) {
        self.shared.deliver(HostEvent::Resize);
    }

    /// Current activation state as a plain object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = self
            .shared
            .with_runtime(|runtime| runtime.coordinator().snapshot())
            .ok_or_else(|| JsValue::from_str("coordinator busy"))?;
        let json =
            serde_json::to_string(&snapshot).map_err(|err| JsValue::from_str(&err.to_string()))?;
        js_sys::JSON::parse(&json)
    }
}

impl TabSync {
    /// Delegated listeners on the document, plus `resize` on the window.
    /// They hold the runtime weakly and go quiet once the `TabSync` is freed.
    fn listen(&self) -> Result<(), JsValue> {
        let shared = Rc::downgrade(&self.shared);
        let nodes = self.nodes.clone();
        let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let Some(node) = target_node(&nodes, &event) else {
                return;
            };
            let trusted = event.is_trusted();
            if deliver(&shared, HostEvent::Click { node, trusted }) {
                event.prevent_default();
            }
        });
        self.document
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();

        let shared = Rc::downgrade(&self.shared);
        let nodes = self.nodes.clone();
        let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let Some(key) = Key::from_dom(&event.key()) else {
                return;
            };
            let Some(node) = target_node(&nodes, &event) else {
                return;
            };
            if deliver(&shared, HostEvent::Key { node, key }) {
                event.prevent_default();
            }
        });
        self.document
            .add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
        on_key.forget();

        let shared = Rc::downgrade(&self.shared);
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            deliver(&shared, HostEvent::Resize);
        });
        self.window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();

        tracing::debug!("Listening for page events");
        Ok(())
    }
}

fn deliver(shared: &Weak<Shared>, event: HostEvent) -> bool {
    shared
        .upgrade()
        .and_then(|shared| shared.deliver(event))
        .unwrap_or(false)
}
