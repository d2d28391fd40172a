//! TabSync Platform Layer
//!
//! The page is not owned by TabSync. Everything the coordinator needs from it
//! goes through four capabilities:
//! - [`Document`]: structure discovery, attributes, classes, focus, layout, scrolling
//! - [`AddressBar`]: the current address and history replacement
//! - [`Scheduler`]: cancellable timers and animation frames
//! - [`IntersectionSource`]: viewport intersection observation
//!
//! The `memory` module, behind the `testing` feature, implements all four
//! without a browser.

mod address;
mod document;
mod error;
mod intersection;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
mod schedule;
mod structure;

pub use address::{AddressBar, AddressError};
pub use document::{Document, NodeId, Rect, ScrollBehavior};
pub use error::PlatformError;
pub use intersection::{IntersectionEntry, IntersectionSource, RootMargin, WatchHandle};
pub use schedule::{FrameHandle, Scheduler, TimerHandle};
pub use structure::{
    fragment_target, LinkNode, PageStructure, PanelNode, Selectors, StickyNavNode, TabNode,
};

pub type Result<T> = std::result::Result<T, PlatformError>;
