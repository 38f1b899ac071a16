//! Live model of the host page.
//!
//! The markup is parsed once with `scraper`. What the page's scripts would
//! change at runtime lives next to the parsed tree: form values, replaced
//! text content, editor objects attached to elements, and the events fired
//! at them. Writes never restructure the tree.

use std::collections::HashMap;
use std::rc::Rc;

use clearcode_logging::clear_debug;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::decode::{decode_snapshot, DecodeError};
use crate::editor::EditorInstance;
use crate::types::{DispatchedEvent, EventKind, PageError};

pub struct HtmlPage {
    url: Option<String>,
    document: Html,
    values: HashMap<NodeId, String>,
    texts: HashMap<NodeId, String>,
    edited: Vec<NodeId>,
    attachments: HashMap<NodeId, Vec<(String, Rc<dyn EditorInstance>)>>,
    events: Vec<DispatchedEvent>,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            url: None,
            document: Html::parse_document(html),
            values: HashMap::new(),
            texts: HashMap::new(),
            edited: Vec::new(),
            attachments: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Parses a saved page, detecting its character encoding.
    pub fn from_snapshot(bytes: &[u8], declared_charset: Option<&str>) -> Result<Self, DecodeError> {
        let decoded = decode_snapshot(bytes, declared_charset)?;
        clear_debug!(
            "decoded snapshot of {} bytes as {}",
            bytes.len(),
            decoded.encoding_label
        );
        Ok(Self::parse(&decoded.html))
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Swaps in newly rendered markup, as a client-side navigation would.
    /// Runtime state tied to the old nodes is dropped with them.
    pub fn replace_document(&mut self, html: &str) {
        self.document = Html::parse_document(html);
        self.values.clear();
        self.texts.clear();
        self.edited.clear();
        self.attachments.clear();
    }

    pub fn element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.document.tree.get(node).and_then(ElementRef::wrap)
    }

    pub fn query_first(&self, selector: &str) -> Result<Option<NodeId>, PageError> {
        let selector = parse_selector(selector)?;
        Ok(self.document.select(&selector).next().map(|el| el.id()))
    }

    /// Elements under `scope` (excluding `scope` itself) matching `selector`,
    /// in document order.
    pub fn query_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, PageError> {
        let selector = parse_selector(selector)?;
        let Some(scope_el) = self.element(scope) else {
            return Err(PageError::NotAnElement(scope));
        };
        Ok(scope_el
            .select(&selector)
            .map(|el| el.id())
            .filter(|id| *id != scope)
            .collect())
    }

    /// Up to `depth` ancestor elements of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId, depth: usize) -> Vec<NodeId> {
        let Some(node_ref) = self.document.tree.get(node) else {
            return Vec::new();
        };
        node_ref
            .ancestors()
            .filter_map(ElementRef::wrap)
            .take(depth)
            .map(|el| el.id())
            .collect()
    }

    /// Whether `node` is `scope` or lies somewhere beneath it.
    pub fn contains(&self, scope: NodeId, node: NodeId) -> bool {
        if scope == node {
            return true;
        }
        self.document
            .tree
            .get(node)
            .is_some_and(|n| n.ancestors().any(|a| a.id() == scope))
    }

    /// Stores an editor object under `property` on `node`, replacing any
    /// earlier object with the same property name.
    pub fn attach(&mut self, node: NodeId, property: &str, instance: Rc<dyn EditorInstance>) {
        let slots = self.attachments.entry(node).or_default();
        slots.retain(|(name, _)| name != property);
        slots.push((property.to_string(), instance));
    }

    pub fn attached(&self, node: NodeId, property: &str) -> Option<Rc<dyn EditorInstance>> {
        self.attachments
            .get(&node)?
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, instance)| Rc::clone(instance))
    }

    /// Current value of a `textarea` or `input` element.
    pub fn value(&self, node: NodeId) -> Option<String> {
        if let Some(value) = self.values.get(&node) {
            return Some(value.clone());
        }
        let el = self.element(node)?;
        match el.value().name() {
            "textarea" => Some(el.text().collect()),
            "input" => Some(el.value().attr("value").unwrap_or_default().to_string()),
            _ => None,
        }
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), PageError> {
        let is_input = self
            .element(node)
            .is_some_and(|el| matches!(el.value().name(), "textarea" | "input"));
        if !is_input {
            return Err(PageError::NotATextInput(node));
        }
        self.values.insert(node, value.to_string());
        self.mark_edited(node);
        Ok(())
    }

    pub fn text_content(&self, node: NodeId) -> Option<String> {
        if let Some(text) = self.texts.get(&node) {
            return Some(text.clone());
        }
        self.element(node).map(|el| el.text().collect())
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<(), PageError> {
        if self.element(node).is_none() {
            return Err(PageError::NotAnElement(node));
        }
        self.texts.insert(node, text.to_string());
        self.mark_edited(node);
        Ok(())
    }

    /// Text written into the page so far, one entry per edited element in
    /// the order they were first written.
    pub fn edits(&self) -> Vec<String> {
        self.edited
            .iter()
            .filter_map(|node| self.values.get(node).or_else(|| self.texts.get(node)))
            .cloned()
            .collect()
    }

    fn mark_edited(&mut self, node: NodeId) {
        if !self.edited.contains(&node) {
            self.edited.push(node);
        }
    }

    /// Fires a bubbling event at `node`.
    pub fn dispatch(&mut self, node: NodeId, kind: EventKind) {
        self.events.push(DispatchedEvent {
            node,
            kind,
            bubbles: true,
        });
    }

    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }
}

fn parse_selector(selector: &str) -> Result<Selector, PageError> {
    Selector::parse(selector).map_err(|err| PageError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}
