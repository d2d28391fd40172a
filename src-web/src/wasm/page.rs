//! `Document` over the live DOM
//!
//! Elements get a [`NodeId`] the first time discovery meets them. The table
//! is shared with the intersection source and the event listeners, which
//! map observed or clicked elements back to their ids.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tabsync_platform::{
    fragment_target, Document, LinkNode, NodeId, PageStructure, PanelNode, PlatformError, Rect,
    ScrollBehavior, Selectors, StickyNavNode, TabNode,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, FocusOptions, HtmlElement, ScrollToOptions, Window};

type Result<T> = std::result::Result<T, PlatformError>;

#[derive(Clone, Default)]
pub(crate) struct NodeTable {
    nodes: Rc<RefCell<Vec<Element>>>,
}

impl NodeTable {
    pub fn intern(&self, element: &Element) -> NodeId {
        if let Some(node) = self.lookup(element) {
            return node;
        }
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(element.clone());
        NodeId(nodes.len() - 1)
    }

    pub fn lookup(&self, element: &Element) -> Option<NodeId> {
        self.nodes
            .borrow()
            .iter()
            .position(|known| known == element)
            .map(NodeId)
    }

    pub fn get(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.0).cloned()
    }

    /// The element itself or its nearest known ancestor
    pub fn closest(&self, element: &Element) -> Option<NodeId> {
        let mut current = Some(element.clone());
        while let Some(el) = current {
            if let Some(node) = self.lookup(&el) {
                return Some(node);
            }
            current = el.parent_element();
        }
        None
    }
}

fn to_web_behavior(behavior: ScrollBehavior) -> web_sys::ScrollBehavior {
    match behavior {
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
    }
}

/// Child `span` of `element` carrying `class`. Matched on the class list,
/// so any class name works, selector syntax or not.
fn find_label(element: &Element, class: &str) -> Option<Element> {
    let children = element.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .find(|child| {
            child.tag_name().eq_ignore_ascii_case("span") && child.class_list().contains(class)
        })
}

pub(crate) struct WebPage {
    window: Window,
    document: web_sys::Document,
    nodes: NodeTable,
}

impl WebPage {
    pub fn new(window: Window, document: web_sys::Document, nodes: NodeTable) -> Self {
        Self {
            window,
            document,
            nodes,
        }
    }

    fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.get(node)
    }

    fn html_element(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }

    fn select_first(&self, scope: &Element, selector: &str) -> Result<Option<Element>> {
        scope
            .query_selector(selector)
            .map_err(|_| PlatformError::InvalidSelector(selector.to_string()))
    }

    fn select_all(&self, scope: &Element, selector: &str) -> Result<Vec<Element>> {
        let list = scope
            .query_selector_all(selector)
            .map_err(|_| PlatformError::InvalidSelector(selector.to_string()))?;
        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn describe_panel(&self, panel: &Element, id: &str, selectors: &Selectors) -> Result<PanelNode> {
        let mut focus_target = None;
        for heading in Selectors::PANEL_HEADINGS {
            if let Some(el) = self.select_first(panel, heading)? {
                focus_target = Some(self.nodes.intern(&el));
                break;
            }
        }
        let node = self.nodes.intern(panel);

        let sticky = match self.select_first(panel, &selectors.sticky_tabs_nav)? {
            Some(nav) => {
                let mut links = Vec::new();
                for link in self.select_all(&nav, &selectors.sticky_link)? {
                    let link_id = link.id();
                    if link_id.is_empty() {
                        tracing::warn!(panel_id = %id, "Skipping sticky link without id");
                        continue;
                    }
                    let target = link
                        .get_attribute("href")
                        .as_deref()
                        .and_then(fragment_target)
                        .map(str::to_string);
                    let section = target
                        .as_deref()
                        .and_then(|t| self.document.get_element_by_id(t))
                        .map(|el| self.nodes.intern(&el));
                    links.push(LinkNode {
                        node: self.nodes.intern(&link),
                        id: link_id,
                        target,
                        section,
                    });
                }
                Some(StickyNavNode {
                    nav: self.nodes.intern(&nav),
                    links,
                })
            }
            None => None,
        };

        Ok(PanelNode {
            node,
            id: id.to_string(),
            focus_target: focus_target.unwrap_or(node),
            sticky,
        })
    }
}

impl Document for WebPage {
    fn discover(&mut self, selectors: &Selectors) -> Result<PageStructure> {
        let root = self
            .document
            .document_element()
            .ok_or_else(|| PlatformError::MissingStructure("html".to_string()))?;

        if self
            .select_first(&root, &selectors.standard_panels_container)?
            .is_none()
        {
            return Err(PlatformError::MissingStructure(
                selectors.standard_panels_container.clone(),
            ));
        }

        let mut structure = PageStructure::default();
        let mut seen_panels: HashSet<String> = HashSet::new();

        for container in self.select_all(&root, &selectors.standard_tabs)? {
            let mut group = Vec::new();
            for tab in self.select_all(&container, Selectors::TAB_ROLE)? {
                let id = tab.id();
                if id.is_empty() {
                    tracing::warn!("Skipping standard tab without id");
                    continue;
                }
                let controls = tab.get_attribute("aria-controls");

                if let Some(panel_id) = controls.as_deref() {
                    if seen_panels.insert(panel_id.to_string()) {
                        if let Some(panel) = self.document.get_element_by_id(panel_id) {
                            let described = self.describe_panel(&panel, panel_id, selectors)?;
                            structure.panels.push(described);
                        }
                    }
                }

                group.push(TabNode {
                    node: self.nodes.intern(&tab),
                    id,
                    controls,
                });
            }

            if !group.is_empty() {
                structure.tab_groups.push(group);
            }
        }

        tracing::debug!(
            groups = structure.tab_groups.len(),
            panels = structure.panels.len(),
            "Discovered page structure"
        );

        Ok(structure)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.set_attribute(name, value);
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(el) = self.html_element(node) {
            el.set_hidden(hidden);
        }
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node)
            .map(|el| el.tag_name().to_lowercase())
            .unwrap_or_default()
    }

    fn is_focused(&self, node: NodeId) -> bool {
        match (self.document.active_element(), self.element(node)) {
            (Some(active), Some(el)) => active == el,
            _ => false,
        }
    }

    fn focus(&mut self, node: NodeId, prevent_scroll: bool) {
        let Some(el) = self.html_element(node) else {
            return;
        };
        let options = FocusOptions::new();
        options.set_prevent_scroll(prevent_scroll);
        if let Err(err) = el.focus_with_options(&options) {
            tracing::debug!(node = %node, error = ?err, "Focus failed");
        }
    }

    fn has_label(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .and_then(|el| find_label(&el, class))
            .is_some()
    }

    fn append_label(&mut self, node: NodeId, class: &str, text: &str) {
        let Some(el) = self.element(node) else {
            return;
        };
        let Ok(label) = self.document.create_element("span") else {
            return;
        };
        label.set_class_name(class);
        label.set_text_content(Some(text));
        let _ = el.append_child(&label);
    }

    fn remove_label(&mut self, node: NodeId, class: &str) {
        if let Some(label) = self.element(node).and_then(|el| find_label(&el, class)) {
            label.remove();
        }
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.html_element(node)
            .map(|el| f64::from(el.offset_top()))
            .unwrap_or(0.0)
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.html_element(node)
            .map(|el| f64::from(el.offset_height()))
            .unwrap_or(0.0)
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.element(node)
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
            })
            .unwrap_or_default()
    }

    fn scroll_left(&self, node: NodeId) -> f64 {
        self.element(node)
            .map(|el| f64::from(el.scroll_left()))
            .unwrap_or(0.0)
    }

    fn scroll_element_to(&mut self, node: NodeId, left: f64, behavior: ScrollBehavior) {
        if let Some(el) = self.element(node) {
            let options = ScrollToOptions::new();
            options.set_left(left);
            options.set_behavior(to_web_behavior(behavior));
            el.scroll_to_with_scroll_to_options(&options);
        }
    }

    fn scroll_window_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(to_web_behavior(behavior));
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn header_height(&self) -> f64 {
        self.document
            .query_selector("header")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .map(|el| f64::from(el.offset_height()))
            .unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn matches_media(&self, query: &str) -> bool {
        self.window
            .match_media(query)
            .ok()
            .flatten()
            .map(|list| list.matches())
            .unwrap_or(false)
    }
}
