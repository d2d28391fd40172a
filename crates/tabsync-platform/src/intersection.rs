//! Viewport intersection observation

use serde::{Deserialize, Serialize};

use crate::document::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchHandle(pub u64);

/// Insets applied to the viewport before intersecting, in CSS pixels.
/// Negative values shrink the observed region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    /// CSS shorthand understood by `IntersectionObserver`
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn entering(target: NodeId) -> Self {
        Self {
            target,
            is_intersecting: true,
        }
    }

    pub fn leaving(target: NodeId) -> Self {
        Self {
            target,
            is_intersecting: false,
        }
    }
}

pub trait IntersectionSource {
    /// Start observing `targets`. Batches of entries are delivered by the
    /// host together with the returned handle.
    fn observe(&mut self, margin: RootMargin, threshold: f64, targets: &[NodeId]) -> WatchHandle;

    /// Stop the observation. No entries for `handle` may be delivered afterwards.
    fn disconnect(&mut self, handle: WatchHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_margin_css() {
        let margin = RootMargin {
            top: -121.0,
            right: 0.0,
            bottom: -530.0,
            left: 0.0,
        };
        assert_eq!(margin.to_css(), "-121px 0px -530px 0px");
    }
}
