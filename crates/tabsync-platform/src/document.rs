//! Document capability
//!
//! Elements are addressed by [`NodeId`], an opaque handle handed out by the
//! document during [`Document::discover`]. Handles stay valid for the page's
//! lifetime.

use serde::{Deserialize, Serialize};

use crate::structure::{PageStructure, Selectors};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Viewport-relative box of an element, as `getBoundingClientRect` reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Animated scroll
    #[default]
    Smooth,
    /// Jump straight to the target position
    Instant,
    /// Whatever the page's CSS `scroll-behavior` says
    Auto,
}

impl ScrollBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollBehavior::Smooth => "smooth",
            ScrollBehavior::Instant => "instant",
            ScrollBehavior::Auto => "auto",
        }
    }
}

impl std::fmt::Display for ScrollBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScrollBehavior {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smooth" => Ok(ScrollBehavior::Smooth),
            "instant" => Ok(ScrollBehavior::Instant),
            "auto" => Ok(ScrollBehavior::Auto),
            _ => Err(format!("Unknown scroll behavior: {}", s)),
        }
    }
}

pub trait Document {
    /// Walk the page and return the tab structure matched by `selectors`.
    ///
    /// Fails only when the panels container itself is missing; any other gap
    /// (a tab without a panel, a link without a section) is left for the
    /// caller to report when it is used.
    fn discover(&mut self, selectors: &Selectors) -> Result<PageStructure>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    fn set_hidden(&mut self, node: NodeId, hidden: bool);

    /// Lowercase tag name
    fn tag_name(&self, node: NodeId) -> String;

    fn is_focused(&self, node: NodeId) -> bool;
    fn focus(&mut self, node: NodeId, prevent_scroll: bool);

    /// Visually hidden text children, used for screen-reader state.
    fn has_label(&self, node: NodeId, class: &str) -> bool;
    fn append_label(&mut self, node: NodeId, class: &str, text: &str);
    fn remove_label(&mut self, node: NodeId, class: &str);

    fn offset_top(&self, node: NodeId) -> f64;
    fn offset_height(&self, node: NodeId) -> f64;
    fn bounding_rect(&self, node: NodeId) -> Rect;
    fn scroll_left(&self, node: NodeId) -> f64;

    /// Scroll an element's content horizontally.
    fn scroll_element_to(&mut self, node: NodeId, left: f64, behavior: ScrollBehavior);
    /// Scroll the window vertically.
    fn scroll_window_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Height of the page's `header` element, or 0 without one.
    fn header_height(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn matches_media(&self, query: &str) -> bool;
}
