//! Address bar capability

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The page origin forbids reading or rewriting its address
    /// (local files, sandboxed frames, `blob:` documents).
    #[error("Security restriction: {0}")]
    Security(String),

    #[error("{0}")]
    Other(String),
}

pub trait AddressBar {
    /// Full current address.
    fn href(&self) -> Result<String, AddressError>;

    /// Replace the current history entry's address without adding a new one.
    fn replace_state(&mut self, href: &str) -> Result<(), AddressError>;
}
