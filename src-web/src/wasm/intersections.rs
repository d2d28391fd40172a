//! `IntersectionSource` over `IntersectionObserver`

use std::collections::HashMap;
use std::rc::Weak;

use js_sys::Array;
use tabsync_platform::{IntersectionEntry, IntersectionSource, NodeId, RootMargin, WatchHandle};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::page::NodeTable;
use super::Shared;
use crate::runtime::HostEvent;

pub(crate) struct WebIntersections {
    shared: Weak<Shared>,
    nodes: NodeTable,
    next_id: u64,
    observers: HashMap<WatchHandle, IntersectionObserver>,
}

impl WebIntersections {
    pub fn new(shared: Weak<Shared>, nodes: NodeTable) -> Self {
        Self {
            shared,
            nodes,
            next_id: 0,
            observers: HashMap::new(),
        }
    }

    fn callback(&self, handle: WatchHandle) -> JsValue {
        let shared = self.shared.clone();
        let nodes = self.nodes.clone();
        Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |records: Array, _observer: IntersectionObserver| {
                let entries: Vec<IntersectionEntry> = records
                    .iter()
                    .filter_map(|record| record.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|record| {
                        let target = nodes.lookup(&record.target())?;
                        Some(IntersectionEntry {
                            target,
                            is_intersecting: record.is_intersecting(),
                        })
                    })
                    .collect();
                if entries.is_empty() {
                    return;
                }
                if let Some(shared) = shared.upgrade() {
                    shared.deliver(HostEvent::Intersections { handle, entries });
                }
            },
        )
        .into_js_value()
    }
}

impl IntersectionSource for WebIntersections {
    fn observe(&mut self, margin: RootMargin, threshold: f64, targets: &[NodeId]) -> WatchHandle {
        self.next_id += 1;
        let handle = WatchHandle(self.next_id);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&margin.to_css());
        init.set_threshold(&JsValue::from_f64(threshold));

        let callback = self.callback(handle);
        let observer =
            match IntersectionObserver::new_with_options(callback.unchecked_ref(), &init) {
                Ok(observer) => observer,
                Err(err) => {
                    tracing::error!(watch = handle.0, error = ?err, "IntersectionObserver unavailable");
                    return handle;
                }
            };

        for element in targets.iter().filter_map(|node| self.nodes.get(*node)) {
            observer.observe(&element);
        }
        self.observers.insert(handle, observer);
        handle
    }

    fn disconnect(&mut self, handle: WatchHandle) {
        if let Some(observer) = self.observers.remove(&handle) {
            observer.disconnect();
        }
    }
}
