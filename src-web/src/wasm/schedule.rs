//! `Scheduler` over `setTimeout` and `requestAnimationFrame`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tabsync_platform::{FrameHandle, Scheduler, TimerHandle};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use super::Shared;
use crate::runtime::HostEvent;

/// A `setTimeout` still owned by Rust. Dropping it frees the callback.
struct PendingTimer {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

type Timers = Rc<RefCell<HashMap<TimerHandle, PendingTimer>>>;

pub(crate) struct WebScheduler {
    window: Window,
    shared: Weak<Shared>,
    next_id: u64,
    timers: Timers,
    /// Last timer that fired. A callback cannot free itself while it runs,
    /// so it is freed by the next one to fire.
    retired: Rc<RefCell<Option<PendingTimer>>>,
}

impl WebScheduler {
    pub fn new(window: Window, shared: Weak<Shared>) -> Self {
        Self {
            window,
            shared,
            next_id: 0,
            timers: Rc::default(),
            retired: Rc::default(),
        }
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn timer_callback(&self, handle: TimerHandle) -> Closure<dyn FnMut()> {
        let shared = self.shared.clone();
        let timers = Rc::clone(&self.timers);
        let retired = Rc::clone(&self.retired);
        Closure::new(move || {
            let fired = timers.borrow_mut().remove(&handle);
            let previous = retired.replace(fired);
            drop(previous);
            if let Some(shared) = shared.upgrade() {
                shared.deliver(HostEvent::Timer(handle));
            }
        })
    }
}

impl Scheduler for WebScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next());
        let callback = self.timer_callback(handle);
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            millis,
        ) {
            Ok(id) => {
                self.timers.borrow_mut().insert(
                    handle,
                    PendingTimer {
                        id,
                        _callback: callback,
                    },
                );
            }
            Err(err) => tracing::error!(timer = handle.0, error = ?err, "setTimeout failed"),
        }
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let cancelled = self.timers.borrow_mut().remove(&handle);
        if let Some(timer) = cancelled {
            self.window.clear_timeout_with_handle(timer.id);
        }
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next());
        let shared = self.shared.clone();
        // Frames are never cancelled, so the callback frees itself once run
        let callback: js_sys::Function = Closure::once_into_js(move || {
            if let Some(shared) = shared.upgrade() {
                shared.deliver(HostEvent::Frame(handle));
            }
        })
        .unchecked_into();
        if let Err(err) = self.window.request_animation_frame(&callback) {
            tracing::error!(frame = handle.0, error = ?err, "requestAnimationFrame failed");
        }
        handle
    }
}
