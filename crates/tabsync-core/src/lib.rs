//! TabSync Core
//!
//! [`TabCoordinator`] keeps standard tabs, sticky tabs, scroll position and
//! the address bar consistent. It is single-threaded and event-driven: the
//! host feeds it clicks, keys, resizes, due timers, animation frames and
//! intersection batches, and it answers through the [`Host`] capabilities.

mod config;
mod coordinator;
mod error;
mod host;
mod standard;
mod sticky;
mod watcher;

#[cfg(test)]
mod fixture;

pub use config::{Config, INSTANT_COOLDOWN, MOBILE_MEDIA_QUERY, NAV_SETTLE_DELAY};
pub use coordinator::TabCoordinator;
pub use error::CoreError;
pub use host::Host;
pub use watcher::{watch_margin, WATCH_THRESHOLD};

// Re-export the model and capabilities hosts need
pub use tabsync_navigation::{NavigationError, UrlSync, STANDARD_TAB_PARAM, STICKY_TAB_PARAM};
pub use tabsync_platform::{
    AddressBar, Document, FrameHandle, IntersectionEntry, IntersectionSource, NodeId,
    PlatformError, RootMargin, Scheduler, ScrollBehavior, TimerHandle, WatchHandle,
};
pub use tabsync_tabs::{ActivateOptions, ActivationSnapshot, ActivationState, Key, TabError};

pub type Result<T> = std::result::Result<T, CoreError>;
