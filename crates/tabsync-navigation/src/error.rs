//! Navigation error types

use thiserror::Error;

use tabsync_platform::AddressError;

#[derive(Error, Debug)]
pub enum NavigationError {
    /// The address cannot be read, rewritten or carry a query string.
    #[error("Address access restricted: {0}")]
    Restricted(String),

    #[error("Malformed address: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("Address bar failure: {0}")]
    Host(String),
}

impl NavigationError {
    /// Whether retrying can never succeed for this page
    pub fn is_access_denied(&self) -> bool {
        matches!(self, NavigationError::Restricted(_))
    }
}

impl From<AddressError> for NavigationError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::Security(msg) => NavigationError::Restricted(msg),
            AddressError::Other(msg) => NavigationError::Host(msg),
        }
    }
}
