//! Deferred work
//!
//! The host reports a due timer or frame back to its owner by handle; the
//! owner decides what the handle meant. A cancelled handle must never be
//! reported.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);

    /// Ask for a callback after the next layout pass.
    fn request_frame(&mut self) -> FrameHandle;
}
