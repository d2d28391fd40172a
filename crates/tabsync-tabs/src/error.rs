//! Tab error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("Panel not found for tab {tab}: {panel}")]
    PanelNotFound { tab: String, panel: String },

    #[error("Panel {0} has no sticky tabs")]
    NoStickyGroup(String),

    #[error("Sticky tab not found: {0}")]
    StickyNotFound(String),

    #[error("Section not found for sticky tab: {0}")]
    SectionNotFound(String),
}
