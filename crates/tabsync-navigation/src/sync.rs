//! Address bar synchronization
//!
//! Writes go through `replace_state`, never adding history entries. The first
//! access failure that can never succeed (a security restriction or an
//! address without a query string) logs one warning and disables every later
//! read and write for the session.

use tabsync_platform::AddressBar;

use crate::error::NavigationError;
use crate::params::{get_param, parse_address, query_is_empty, set_param};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSync {
    /// Configured persistence
    enabled: bool,
    /// Writes paused for the first activation of a bare address
    suspended: bool,
    /// Address found to be unaddressable
    disabled: bool,
}

impl UrlSync {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            suspended: false,
            disabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether writes currently reach the address bar
    pub fn is_active(&self) -> bool {
        self.enabled && !self.suspended && !self.disabled
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Whether the page was loaded without a query string. An unreadable
    /// address counts as bare.
    pub fn query_was_empty(&mut self, address: &dyn AddressBar) -> bool {
        if self.disabled {
            return true;
        }
        match address
            .href()
            .map_err(NavigationError::from)
            .and_then(|href| parse_address(&href))
        {
            Ok(url) => query_is_empty(&url),
            Err(err) => {
                self.record_failure(&err);
                true
            }
        }
    }

    /// Read a query parameter. Returns `None` once the address is known to be
    /// unaddressable.
    pub fn read_param(&mut self, address: &dyn AddressBar, name: &str) -> Option<String> {
        if self.disabled {
            return None;
        }
        let result = address
            .href()
            .map_err(NavigationError::from)
            .and_then(|href| parse_address(&href))
            .map(|url| get_param(&url, name));

        match result {
            Ok(value) => value,
            Err(err) => {
                self.record_failure(&err);
                None
            }
        }
    }

    /// Set or remove a query parameter. A no-op unless [`Self::is_active`].
    pub fn write_param(&mut self, address: &mut dyn AddressBar, name: &str, value: Option<&str>) {
        if !self.is_active() {
            return;
        }
        if let Err(err) = Self::try_write(address, name, value) {
            self.record_failure(&err);
        }
    }

    fn try_write(address: &mut dyn AddressBar, name: &str, value: Option<&str>) -> Result<()> {
        let mut url = parse_address(&address.href()?)?;
        let before = url.as_str().to_string();
        set_param(&mut url, name, value);

        if url.as_str() == before {
            return Ok(());
        }

        address.replace_state(url.as_str())?;
        tracing::debug!(param = %name, href = %url, "Address updated");
        Ok(())
    }

    fn record_failure(&mut self, err: &NavigationError) {
        if err.is_access_denied() {
            if !self.disabled {
                tracing::warn!(error = %err, "URL updates disabled by a security restriction");
            }
            self.disabled = true;
        } else {
            tracing::error!(error = %err, "Address update failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_platform::memory::MemoryAddressBar;

    #[test]
    fn test_write_and_read() {
        let mut bar = MemoryAddressBar::new("https://example.com/page");
        let mut sync = UrlSync::new(true);

        sync.write_param(&mut bar, "standardTab", Some("tab-b"));
        assert_eq!(bar.current(), "https://example.com/page?standardTab=tab-b");
        assert_eq!(sync.read_param(&bar, "standardTab"), Some("tab-b".to_string()));
    }

    #[test]
    fn test_unchanged_address_is_not_written() {
        let mut bar = MemoryAddressBar::new("https://example.com/?standardTab=tab-a");
        let mut sync = UrlSync::new(true);

        sync.write_param(&mut bar, "standardTab", Some("tab-a"));
        sync.write_param(&mut bar, "stickyTab", None);
        assert!(bar.replacements().is_empty());
    }

    #[test]
    fn test_suspended_and_disabled_writes() {
        let mut bar = MemoryAddressBar::new("https://example.com/");
        let mut sync = UrlSync::new(true);
        sync.suspend();
        sync.write_param(&mut bar, "standardTab", Some("tab-a"));
        assert!(bar.replacements().is_empty());
        sync.resume();

        let mut off = UrlSync::new(false);
        off.write_param(&mut bar, "standardTab", Some("tab-a"));
        assert!(bar.replacements().is_empty());
        // Reads are not gated by the configured persistence
        assert_eq!(off.read_param(&bar, "standardTab"), None);
    }

    #[test]
    fn test_security_failure_disables_once() {
        let mut bar = MemoryAddressBar::restricted("file:///tmp/page.html");
        let mut sync = UrlSync::new(true);

        assert_eq!(sync.read_param(&bar, "standardTab"), None);
        assert!(sync.is_disabled());
        assert_eq!(bar.reads(), 1);

        // Later calls never touch the address bar again
        sync.write_param(&mut bar, "standardTab", Some("tab-a"));
        assert_eq!(sync.read_param(&bar, "stickyTab"), None);
        assert_eq!(bar.reads(), 1);
    }

    #[test]
    fn test_blob_address_disables() {
        let mut bar = MemoryAddressBar::new("blob:https://example.com/5f1c");
        let mut sync = UrlSync::new(true);

        assert!(sync.query_was_empty(&bar));
        assert!(sync.is_disabled());
        sync.write_param(&mut bar, "standardTab", Some("tab-a"));
        assert!(bar.replacements().is_empty());
    }

    #[test]
    fn test_unexpected_failure_keeps_sync_enabled() {
        let mut bar = MemoryAddressBar::new("https://example.com/");
        bar.fail_replacements("quota exceeded");
        let mut sync = UrlSync::new(true);

        sync.write_param(&mut bar, "standardTab", Some("tab-a"));
        assert!(!sync.is_disabled());
        assert!(sync.is_active());
    }
}
