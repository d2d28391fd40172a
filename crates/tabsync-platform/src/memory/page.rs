//! In-memory document built from an HTML fixture
//!
//! Every element of the fixture becomes a node, numbered in document order.
//! Layout is not computed; it is read from `data-offset-top`, `data-height`,
//! `data-left` and `data-width` attributes and can be changed afterwards with
//! the setters below.

use parking_lot::Mutex;
use scraper::{ElementRef, Html, Selector};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::document::{Document, NodeId, Rect, ScrollBehavior};
use crate::error::PlatformError;
use crate::structure::{
    fragment_target, LinkNode, PageStructure, PanelNode, Selectors, StickyNavNode, TabNode,
};
use crate::Result;

/// A recorded `scrollTo` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCall {
    pub position: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone)]
struct Label {
    class: String,
    text: String,
}

#[derive(Debug, Clone)]
struct MemoryNode {
    tag: String,
    id: Option<String>,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    hidden: bool,
    labels: Vec<Label>,
    offset_top: f64,
    offset_height: f64,
    rect: Rect,
    scroll_left: f64,
}

impl MemoryNode {
    fn from_element(el: ElementRef<'_>) -> Self {
        let value = el.value();
        let attributes: BTreeMap<String, String> = value
            .attrs()
            .map(|(name, v)| (name.to_string(), v.to_string()))
            .collect();
        let number = |name: &str| {
            attributes
                .get(name)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        let offset_top = number("data-offset-top");
        let offset_height = number("data-height");
        let rect = Rect::new(number("data-left"), offset_top, number("data-width"), offset_height);

        Self {
            tag: value.name().to_lowercase(),
            id: value.id().map(str::to_string),
            classes: value.classes().map(str::to_string).collect(),
            hidden: attributes.contains_key("hidden"),
            attributes,
            labels: Vec::new(),
            offset_top,
            offset_height,
            rect,
            scroll_left: 0.0,
        }
    }
}

#[derive(Debug, Default)]
struct PageState {
    html: String,
    nodes: Vec<MemoryNode>,
    by_id: HashMap<String, NodeId>,
    focused: Option<NodeId>,
    header_height: f64,
    viewport_height: f64,
    matching_media: HashSet<String>,
    window_scrolls: Vec<ScrollCall>,
    element_scrolls: Vec<(NodeId, ScrollCall)>,
}

impl PageState {
    fn node(&self, node: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(node.0)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.get_mut(node.0)
    }

    fn lookup(&self, id: &str) -> Option<&MemoryNode> {
        self.by_id.get(id).and_then(|node| self.node(*node))
    }

    fn lookup_mut(&mut self, id: &str) -> Option<&mut MemoryNode> {
        let node = *self.by_id.get(id)?;
        self.node_mut(node)
    }
}

/// Cheap to clone; clones share the same page.
pub struct MemoryPage {
    inner: Arc<Mutex<PageState>>,
}

impl MemoryPage {
    pub fn from_html(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let mut state = PageState {
            html: html.to_string(),
            viewport_height: 800.0,
            ..PageState::default()
        };

        if let Ok(all) = Selector::parse("*") {
            for el in doc.select(&all) {
                let node = NodeId(state.nodes.len());
                let memory = MemoryNode::from_element(el);
                if memory.tag == "header" && state.header_height == 0.0 {
                    state.header_height = memory.offset_height;
                }
                if let Some(id) = &memory.id {
                    // getElementById returns the first match
                    state.by_id.entry(id.clone()).or_insert(node);
                }
                state.nodes.push(memory);
            }
        }

        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Node handle of the element with `id`
    pub fn node(&self, id: &str) -> Option<NodeId> {
        self.inner.lock().by_id.get(id).copied()
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.inner.lock().lookup(id).map(|n| n.hidden).unwrap_or(false)
    }

    pub fn classes_of(&self, id: &str) -> Vec<String> {
        self.inner
            .lock()
            .lookup(id)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    pub fn attribute_of(&self, id: &str, name: &str) -> Option<String> {
        self.inner
            .lock()
            .lookup(id)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    /// Number of injected labels with `class` on the element
    pub fn label_count(&self, id: &str, class: &str) -> usize {
        self.inner
            .lock()
            .lookup(id)
            .map(|n| n.labels.iter().filter(|l| l.class == class).count())
            .unwrap_or(0)
    }

    pub fn label_text(&self, id: &str, class: &str) -> Option<String> {
        self.inner.lock().lookup(id).and_then(|n| {
            n.labels
                .iter()
                .find(|l| l.class == class)
                .map(|l| l.text.clone())
        })
    }

    /// `id` of the focused element
    pub fn focused_id(&self) -> Option<String> {
        let state = self.inner.lock();
        state
            .focused
            .and_then(|node| state.node(node))
            .and_then(|n| n.id.clone())
    }

    pub fn window_scrolls(&self) -> Vec<ScrollCall> {
        self.inner.lock().window_scrolls.clone()
    }

    pub fn element_scrolls(&self, id: &str) -> Vec<ScrollCall> {
        let state = self.inner.lock();
        let Some(node) = state.by_id.get(id).copied() else {
            return Vec::new();
        };
        state
            .element_scrolls
            .iter()
            .filter(|(target, _)| *target == node)
            .map(|(_, call)| *call)
            .collect()
    }

    pub fn clear_scrolls(&self) {
        let mut state = self.inner.lock();
        state.window_scrolls.clear();
        state.element_scrolls.clear();
    }

    pub fn set_rect(&self, id: &str, rect: Rect) {
        if let Some(node) = self.inner.lock().lookup_mut(id) {
            node.rect = rect;
        }
    }

    pub fn set_header_height(&self, height: f64) {
        self.inner.lock().header_height = height;
    }

    pub fn set_viewport_height(&self, height: f64) {
        self.inner.lock().viewport_height = height;
    }

    pub fn set_media(&self, query: &str, matches: bool) {
        let mut state = self.inner.lock();
        if matches {
            state.matching_media.insert(query.to_string());
        } else {
            state.matching_media.remove(query);
        }
    }
}

impl Clone for MemoryPage {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| PlatformError::InvalidSelector(selector.to_string()))
}

/// Match the structural contract against a parsed fixture.
///
/// Node numbering must agree with [`MemoryPage::from_html`], which walks the
/// same document with `*`.
fn discover_structure(doc: &Html, selectors: &Selectors) -> Result<PageStructure> {
    let all = parse_selector("*")?;
    let with_id = parse_selector("[id]")?;
    let panels_container = parse_selector(&selectors.standard_panels_container)?;
    let containers = parse_selector(&selectors.standard_tabs)?;
    let tab_role = parse_selector(Selectors::TAB_ROLE)?;
    let nav_selector = parse_selector(&selectors.sticky_tabs_nav)?;
    let link_selector = parse_selector(&selectors.sticky_link)?;
    let headings = Selectors::PANEL_HEADINGS
        .iter()
        .map(|s| parse_selector(s))
        .collect::<Result<Vec<_>>>()?;

    if doc.select(&panels_container).next().is_none() {
        return Err(PlatformError::MissingStructure(
            selectors.standard_panels_container.clone(),
        ));
    }

    let index: HashMap<_, NodeId> = doc
        .select(&all)
        .enumerate()
        .map(|(i, el)| (el.id(), NodeId(i)))
        .collect();
    let node_of = |el: ElementRef<'_>| index[&el.id()];

    let mut by_id: HashMap<&str, ElementRef<'_>> = HashMap::new();
    for el in doc.select(&with_id) {
        if let Some(id) = el.value().id() {
            by_id.entry(id).or_insert(el);
        }
    }

    let describe_panel = |panel: ElementRef<'_>, id: &str| -> PanelNode {
        let focus_target = headings
            .iter()
            .find_map(|heading| panel.select(heading).next())
            .map(node_of)
            .unwrap_or_else(|| node_of(panel));

        let sticky = panel.select(&nav_selector).next().map(|nav| {
            let links = nav
                .select(&link_selector)
                .filter_map(|link| {
                    let Some(link_id) = link.value().id() else {
                        tracing::warn!(panel_id = %id, "Skipping sticky link without id");
                        return None;
                    };
                    let target = link
                        .value()
                        .attr("href")
                        .and_then(fragment_target)
                        .map(str::to_string);
                    let section = target
                        .as_deref()
                        .and_then(|t| by_id.get(t).copied())
                        .map(node_of);
                    Some(LinkNode {
                        node: node_of(link),
                        id: link_id.to_string(),
                        target,
                        section,
                    })
                })
                .collect();
            StickyNavNode {
                nav: node_of(nav),
                links,
            }
        });

        PanelNode {
            node: node_of(panel),
            id: id.to_string(),
            focus_target,
            sticky,
        }
    };

    let mut structure = PageStructure::default();
    let mut seen_panels: HashSet<String> = HashSet::new();

    for container in doc.select(&containers) {
        let mut group = Vec::new();
        for tab in container.select(&tab_role) {
            let Some(id) = tab.value().id() else {
                tracing::warn!("Skipping standard tab without id");
                continue;
            };
            let controls = tab.value().attr("aria-controls").map(str::to_string);

            if let Some(panel_id) = controls.as_deref() {
                if seen_panels.insert(panel_id.to_string()) {
                    if let Some(panel) = by_id.get(panel_id) {
                        structure.panels.push(describe_panel(*panel, panel_id));
                    }
                }
            }

            group.push(TabNode {
                node: node_of(tab),
                id: id.to_string(),
                controls,
            });
        }

        if !group.is_empty() {
            structure.tab_groups.push(group);
        }
    }

    Ok(structure)
}

impl Document for MemoryPage {
    fn discover(&mut self, selectors: &Selectors) -> Result<PageStructure> {
        let html = self.inner.lock().html.clone();
        let doc = Html::parse_document(&html);
        let structure = discover_structure(&doc, selectors)?;

        tracing::debug!(
            groups = structure.tab_groups.len(),
            panels = structure.panels.len(),
            "Discovered page structure"
        );

        Ok(structure)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .lock()
            .node(node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.inner.lock().node_mut(node) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.inner.lock().node_mut(node) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.inner.lock().node_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(n) = self.inner.lock().node_mut(node) {
            n.hidden = hidden;
            if hidden {
                n.attributes.insert("hidden".to_string(), String::new());
            } else {
                n.attributes.remove("hidden");
            }
        }
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.inner
            .lock()
            .node(node)
            .map(|n| n.tag.clone())
            .unwrap_or_default()
    }

    fn is_focused(&self, node: NodeId) -> bool {
        self.inner.lock().focused == Some(node)
    }

    fn focus(&mut self, node: NodeId, _prevent_scroll: bool) {
        let mut state = self.inner.lock();
        if state.node(node).is_some() {
            state.focused = Some(node);
        }
    }

    fn has_label(&self, node: NodeId, class: &str) -> bool {
        self.inner
            .lock()
            .node(node)
            .map(|n| n.labels.iter().any(|l| l.class == class))
            .unwrap_or(false)
    }

    fn append_label(&mut self, node: NodeId, class: &str, text: &str) {
        if let Some(n) = self.inner.lock().node_mut(node) {
            n.labels.push(Label {
                class: class.to_string(),
                text: text.to_string(),
            });
        }
    }

    fn remove_label(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.inner.lock().node_mut(node) {
            // The browser host removes the first matching child only
            if let Some(pos) = n.labels.iter().position(|l| l.class == class) {
                n.labels.remove(pos);
            }
        }
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.inner.lock().node(node).map(|n| n.offset_top).unwrap_or(0.0)
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.inner
            .lock()
            .node(node)
            .map(|n| n.offset_height)
            .unwrap_or(0.0)
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.inner
            .lock()
            .node(node)
            .map(|n| n.rect)
            .unwrap_or_default()
    }

    fn scroll_left(&self, node: NodeId) -> f64 {
        self.inner
            .lock()
            .node(node)
            .map(|n| n.scroll_left)
            .unwrap_or(0.0)
    }

    fn scroll_element_to(&mut self, node: NodeId, left: f64, behavior: ScrollBehavior) {
        let mut state = self.inner.lock();
        if let Some(n) = state.node_mut(node) {
            n.scroll_left = left.max(0.0);
        }
        state.element_scrolls.push((
            node,
            ScrollCall {
                position: left,
                behavior,
            },
        ));
    }

    fn scroll_window_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let mut state = self.inner.lock();
        state.window_scrolls.push(ScrollCall {
            position: top,
            behavior,
        });
    }

    fn header_height(&self) -> f64 {
        self.inner.lock().header_height
    }

    fn viewport_height(&self) -> f64 {
        self.inner.lock().viewport_height
    }

    fn matches_media(&self, query: &str) -> bool {
        self.inner.lock().matching_media.contains(query)
    }
}
