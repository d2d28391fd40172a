//! Browser-free implementations of every capability
//!
//! Each type is a shared handle: clone one, hand the clone to the
//! coordinator, and inspect or drive the page through the handle you kept.

mod address;
mod intersections;
mod page;
mod scheduler;

pub use address::MemoryAddressBar;
pub use intersections::{ManualIntersections, Observation};
pub use page::{MemoryPage, ScrollCall};
pub use scheduler::ManualScheduler;
