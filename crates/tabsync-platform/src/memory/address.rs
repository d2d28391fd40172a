//! In-memory address bar

use parking_lot::Mutex;
use std::sync::Arc;

use crate::address::{AddressBar, AddressError};

#[derive(Debug, Default)]
struct AddressState {
    href: String,
    restricted: bool,
    failing: Option<String>,
    replacements: Vec<String>,
    reads: usize,
}

pub struct MemoryAddressBar {
    inner: Arc<Mutex<AddressState>>,
}

impl MemoryAddressBar {
    pub fn new(href: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AddressState {
                href: href.to_string(),
                ..AddressState::default()
            })),
        }
    }

    /// An address bar whose every access raises a security error.
    pub fn restricted(href: &str) -> Self {
        let bar = Self::new(href);
        bar.inner.lock().restricted = true;
        bar
    }

    /// Make every history replacement fail with an unexpected error.
    pub fn fail_replacements(&self, message: &str) {
        self.inner.lock().failing = Some(message.to_string());
    }

    pub fn current(&self) -> String {
        self.inner.lock().href.clone()
    }

    /// Every address written through `replace_state`, oldest first
    pub fn replacements(&self) -> Vec<String> {
        self.inner.lock().replacements.clone()
    }

    /// Number of `href` reads attempted
    pub fn reads(&self) -> usize {
        self.inner.lock().reads
    }
}

impl Clone for MemoryAddressBar {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AddressBar for MemoryAddressBar {
    fn href(&self) -> Result<String, AddressError> {
        let mut state = self.inner.lock();
        state.reads += 1;
        if state.restricted {
            return Err(AddressError::Security(
                "The operation is insecure.".to_string(),
            ));
        }
        Ok(state.href.clone())
    }

    fn replace_state(&mut self, href: &str) -> Result<(), AddressError> {
        let mut state = self.inner.lock();
        if state.restricted {
            return Err(AddressError::Security(
                "The operation is insecure.".to_string(),
            ));
        }
        if let Some(message) = &state.failing {
            return Err(AddressError::Other(message.clone()));
        }
        state.href = href.to_string();
        state.replacements.push(href.to_string());
        Ok(())
    }
}
