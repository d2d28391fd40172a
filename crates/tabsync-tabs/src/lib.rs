//! TabSync Tab Model
//!
//! Two coupled widgets share one page:
//! - standard tabs, each swapping a whole panel
//! - sticky tabs pinned inside a panel, each pointing at a section
//!
//! This crate holds the entities discovered from the page and the invariants
//! between them. It never touches the page itself.

mod error;
mod group;
mod keyboard;
mod registry;
mod state;
mod sticky;
mod tab;

pub use error::TabError;
pub use group::TabGroup;
pub use keyboard::{Key, KeyCommand};
pub use registry::TabRegistry;
pub use state::{ActivateOptions, ActivationSnapshot, ActivationState};
pub use sticky::{IntersectionWatch, Section, StickyTab, StickyTabGroup};
pub use tab::{StandardPanel, StandardTab};

pub type Result<T> = std::result::Result<T, TabError>;
