//! Initial standard tab resolution
//!
//! Precedence: the `standardTab` parameter, then the configured default, then
//! the first tab in document order.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialSource {
    Url,
    Default,
    First,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialChoice {
    pub tab_id: String,
    pub source: InitialSource,
}

pub struct InitialResolver {
    default_tab_id: Option<String>,
}

impl InitialResolver {
    pub fn new(default_tab_id: Option<String>) -> Self {
        Self { default_tab_id }
    }

    /// Pick the tab to activate first.
    ///
    /// `url_tab` is the id read from the address, if reading was allowed;
    /// `is_tab` tells whether an id names a known standard tab.
    pub fn resolve(
        &self,
        url_tab: Option<&str>,
        is_tab: impl Fn(&str) -> bool,
        first_tab: Option<&str>,
    ) -> Option<InitialChoice> {
        if let Some(id) = url_tab {
            if is_tab(id) {
                return Some(InitialChoice {
                    tab_id: id.to_string(),
                    source: InitialSource::Url,
                });
            }
            tracing::warn!(tab_id = %id, "Standard tab from URL not found");
        }

        if let Some(id) = self.default_tab_id.as_deref() {
            if is_tab(id) {
                return Some(InitialChoice {
                    tab_id: id.to_string(),
                    source: InitialSource::Default,
                });
            }
            tracing::debug!(tab_id = %id, "Default standard tab not found");
        }

        first_tab.map(|id| InitialChoice {
            tab_id: id.to_string(),
            source: InitialSource::First,
        })
    }
}
