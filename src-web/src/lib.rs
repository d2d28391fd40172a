//! TabSync browser host
//!
//! [`Runtime`] owns a [`TabCoordinator`](tabsync_core::TabCoordinator) and
//! the queue of page callbacks waiting for it. On `wasm32` the [`wasm`]
//! module binds the platform capabilities to `web-sys` and exports the
//! `TabSync` class to JavaScript.

mod runtime;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use runtime::{EventQueue, HostEvent, Runtime};

#[cfg(target_arch = "wasm32")]
pub use wasm::TabSync;
