//! Deterministic scheduler
//!
//! Time only moves when the test calls [`ManualScheduler::advance`].

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::schedule::{FrameHandle, Scheduler, TimerHandle};

#[derive(Debug, Default)]
struct SchedulerState {
    now: Duration,
    next_id: u64,
    timers: Vec<(TimerHandle, Duration)>,
    frames: Vec<FrameHandle>,
}

pub struct ManualScheduler {
    inner: Arc<Mutex<SchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerState::default())),
        }
    }

    /// Advance the clock by `dt` and return the timers that came due,
    /// earliest first. Returned timers are no longer pending.
    pub fn advance(&self, dt: Duration) -> Vec<TimerHandle> {
        let mut state = self.inner.lock();
        state.now = state.now.saturating_add(dt);
        let now = state.now;

        let mut due: Vec<(TimerHandle, Duration)> = state
            .timers
            .iter()
            .copied()
            .filter(|(_, at)| *at <= now)
            .collect();
        due.sort_by_key(|(handle, at)| (*at, *handle));
        state.timers.retain(|(_, at)| *at > now);

        due.into_iter().map(|(handle, _)| handle).collect()
    }

    /// Drain requested animation frames.
    pub fn take_frames(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.inner.lock().frames)
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.lock().timers.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.inner.lock().timers.iter().any(|(h, _)| *h == handle)
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ManualScheduler {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let mut state = self.inner.lock();
        state.next_id += 1;
        let handle = TimerHandle(state.next_id);
        let at = state.now.saturating_add(delay);
        state.timers.push((handle, at));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.inner.lock().timers.retain(|(h, _)| *h != handle);
    }

    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.inner.lock();
        state.next_id += 1;
        let handle = FrameHandle(state.next_id);
        state.frames.push(handle);
        handle
    }
}
