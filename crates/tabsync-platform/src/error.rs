//! Platform error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Required page structure missing: {0}")]
    MissingStructure(String),
}
