//! `AddressBar` over `window.location` and `window.history`

use tabsync_platform::{AddressBar, AddressError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Window};

/// `SecurityError` is what the browser throws for opaque origins and
/// sandboxed frames; anything else is unexpected.
fn address_error(err: JsValue) -> AddressError {
    if let Some(exception) = err.dyn_ref::<DomException>() {
        if exception.name() == "SecurityError" {
            return AddressError::Security(exception.message());
        }
        return AddressError::Other(exception.message());
    }
    AddressError::Other(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

pub(crate) struct WebAddressBar {
    window: Window,
}

impl WebAddressBar {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl AddressBar for WebAddressBar {
    fn href(&self) -> Result<String, AddressError> {
        self.window.location().href().map_err(address_error)
    }

    fn replace_state(&mut self, href: &str) -> Result<(), AddressError> {
        self.window
            .history()
            .map_err(address_error)?
            .replace_state_with_url(&JsValue::NULL, "", Some(href))
            .map_err(address_error)
    }
}
