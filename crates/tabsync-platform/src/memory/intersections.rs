//! Recorded intersection observations
//!
//! Nothing is computed from layout: the test decides which entries to
//! deliver, using the handles recorded here.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::document::NodeId;
use crate::intersection::{IntersectionSource, RootMargin, WatchHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub handle: WatchHandle,
    pub margin: RootMargin,
    pub threshold: f64,
    pub targets: Vec<NodeId>,
    pub connected: bool,
}

#[derive(Debug, Default)]
struct ObserverState {
    next_id: u64,
    observations: Vec<Observation>,
}

pub struct ManualIntersections {
    inner: Arc<Mutex<ObserverState>>,
}

impl ManualIntersections {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ObserverState::default())),
        }
    }

    /// Observations still connected
    pub fn active(&self) -> Vec<Observation> {
        self.inner
            .lock()
            .observations
            .iter()
            .filter(|o| o.connected)
            .cloned()
            .collect()
    }

    /// The connected observation watching `target`, if any
    pub fn watching(&self, target: NodeId) -> Option<Observation> {
        self.inner
            .lock()
            .observations
            .iter()
            .rev()
            .find(|o| o.connected && o.targets.contains(&target))
            .cloned()
    }

    pub fn get(&self, handle: WatchHandle) -> Option<Observation> {
        self.inner
            .lock()
            .observations
            .iter()
            .find(|o| o.handle == handle)
            .cloned()
    }

    /// Total observations ever started
    pub fn started(&self) -> usize {
        self.inner.lock().observations.len()
    }
}

impl Default for ManualIntersections {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ManualIntersections {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl IntersectionSource for ManualIntersections {
    fn observe(&mut self, margin: RootMargin, threshold: f64, targets: &[NodeId]) -> WatchHandle {
        let mut state = self.inner.lock();
        state.next_id += 1;
        let handle = WatchHandle(state.next_id);
        state.observations.push(Observation {
            handle,
            margin,
            threshold,
            targets: targets.to_vec(),
            connected: true,
        });
        handle
    }

    fn disconnect(&mut self, handle: WatchHandle) {
        if let Some(observation) = self
            .inner
            .lock()
            .observations
            .iter_mut()
            .find(|o| o.handle == handle)
        {
            observation.connected = false;
        }
    }
}
