//! TabSync Navigation
//!
//! The address bar mirrors the activation state through two query
//! parameters:
//! - `standardTab`: id of the active standard tab
//! - `stickyTab`: id of the active sticky tab
//!
//! The address is read back once, on load, to restore the pair.

mod error;
mod initial;
mod params;
mod sync;

pub use error::NavigationError;
pub use initial::{InitialChoice, InitialResolver, InitialSource};
pub use params::{
    get_param, parse_address, query_is_empty, set_param, STANDARD_TAB_PARAM, STICKY_TAB_PARAM,
};
pub use sync::UrlSync;

pub type Result<T> = std::result::Result<T, NavigationError>;
