//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Tab error: {0}")]
    Tab(#[from] tabsync_tabs::TabError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] tabsync_navigation::NavigationError),

    #[error("Platform error: {0}")]
    Platform(#[from] tabsync_platform::PlatformError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Coordinator not initialized")]
    NotInitialized,
}
