//! Headless in-memory host.
//!
//! [`MemoryDocument`] keeps nodes in an arena and mimics the parts of the
//! browser document the registry relies on. It records how many appends and
//! replacements happened, and can fire events at nodes, which makes it the
//! host of choice for tests and for running components outside a browser.

use alloc::{collections::BTreeMap, rc::Rc, vec::Vec};
use core::{cell::RefCell, fmt::Write};

use serde_json::Value;

use crate::{
    error::{FlexError, Result},
    event::{Event, EventHandler, EventName},
    host::Host,
    key::Key,
};

/// Handle to a node of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    properties: BTreeMap<String, Value>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    listeners: Vec<(EventName, EventHandler)>,
}

#[derive(Debug)]
struct DocumentInner {
    nodes: Vec<NodeData>,
    appends: usize,
    replacements: usize,
}

fn foreign_node(id: NodeId) -> FlexError {
    FlexError::host(format!("node {} does not belong to this document", id.0))
}

impl DocumentInner {
    fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| foreign_node(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| foreign_node(id))
    }

    fn detach(&mut self, child: NodeId) -> Result<()> {
        if let Some(parent) = self.node_mut(child)?.parent.take() {
            self.node_mut(parent)?.children.retain(|id| *id != child);
        }
        Ok(())
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> Result<bool> {
        loop {
            if node == ancestor {
                return Ok(true);
            }
            match self.node(node)?.parent {
                Some(parent) => node = parent,
                None => return Ok(false),
            }
        }
    }
}

/// An arena-backed document. Clones share the same tree.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    inner: Rc<RefCell<DocumentInner>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Creates a document holding only a `body` node.
    #[must_use]
    pub fn new() -> Self {
        let body = NodeData {
            tag: "body".to_owned(),
            ..NodeData::default()
        };
        Self {
            inner: Rc::new(RefCell::new(DocumentInner {
                nodes: vec![body],
                appends: 0,
                replacements: 0,
            })),
        }
    }

    /// Shorthand for a document with an empty `<div id="…">` under the body.
    #[must_use]
    pub fn with_container(id: &str) -> Self {
        let document = Self::new();
        document.mount_container("div", id);
        document
    }

    /// The `body` node.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new `<tag id="…">` under the body and returns it.
    pub fn mount_container(&self, tag: &str, id: &str) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let node = NodeId(inner.nodes.len());
        let mut properties = BTreeMap::new();
        properties.insert("id".to_owned(), Value::from(id));
        inner.nodes.push(NodeData {
            tag: tag.to_owned(),
            properties,
            parent: Some(NodeId(0)),
            ..NodeData::default()
        });
        inner.nodes[0].children.push(node);
        node
    }

    /// Tag name of `node`.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner.borrow().node(node).ok().map(|data| data.tag.clone())
    }

    /// A property assigned to `node`.
    #[must_use]
    pub fn property(&self, node: NodeId, name: &str) -> Option<Value> {
        self.inner
            .borrow()
            .node(node)
            .ok()
            .and_then(|data| data.properties.get(name).cloned())
    }

    /// An attribute set on `node`.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .node(node)
            .ok()
            .and_then(|data| data.attributes.get(name).cloned())
    }

    /// Text content of `node` and its descendants, concatenated in order.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        fn collect(inner: &DocumentInner, node: NodeId, out: &mut String) {
            let Ok(data) = inner.node(node) else { return };
            if let Some(text) = &data.text {
                out.push_str(text);
            }
            for child in &data.children {
                collect(inner, *child, out);
            }
        }

        let mut out = String::new();
        collect(&self.inner.borrow(), node, &mut out);
        out
    }

    /// Children of `node`, in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .node(node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    /// Current parent of `node`.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().node(node).ok().and_then(|data| data.parent)
    }

    /// Number of successful `append_child` calls so far.
    #[must_use]
    pub fn appends(&self) -> usize {
        self.inner.borrow().appends
    }

    /// Number of successful `replace_child` calls so far.
    #[must_use]
    pub fn replacements(&self) -> usize {
        self.inner.borrow().replacements
    }

    /// Number of listeners installed on `node`.
    #[must_use]
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.inner
            .borrow()
            .node(node)
            .map(|data| data.listeners.len())
            .unwrap_or_default()
    }

    /// Depth-first search below the body for the node tagged with `key`.
    #[must_use]
    pub fn find_by_key(&self, attribute: &str, key: &Key) -> Option<NodeId> {
        self.find(|data| data.attributes.get(attribute).map(String::as_str) == Some(key.as_str()))
    }

    /// Calls every listener `node` has for the event's name.
    ///
    /// Handlers run after the document is released, so they may mutate it.
    /// Returns how many handlers ran.
    pub fn dispatch(&self, node: NodeId, event: &Event) -> usize {
        let handlers: Vec<EventHandler> = self
            .inner
            .borrow()
            .node(node)
            .map(|data| {
                data.listeners
                    .iter()
                    .filter(|(name, _)| name == event.name())
                    .map(|(_, handler)| handler.clone())
                    .collect()
            })
            .unwrap_or_default();
        for handler in &handlers {
            handler.call(event);
        }
        handlers.len()
    }

    /// Types `value` into `node` the way a browser would: assigns the
    /// `value` property, then fires `input` carrying the target's name and value.
    pub fn input(&self, node: NodeId, value: &str) -> usize {
        let name = {
            let mut inner = self.inner.borrow_mut();
            let Ok(data) = inner.node_mut(node) else {
                return 0;
            };
            data.properties.insert("value".to_owned(), Value::from(value));
            data.properties
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_owned)
        };
        let mut event = Event::new(EventName::Input).with_target_value(value);
        if let Some(name) = name {
            event = event.with_target_name(name);
        }
        self.dispatch(node, &event)
    }

    /// Fires `click` at `node`.
    pub fn click(&self, node: NodeId) -> usize {
        self.dispatch(node, &Event::new(EventName::Click))
    }

    /// Serializes `node` and its subtree as HTML-like text.
    ///
    /// Properties are written in name order, keys and listeners are left out.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> String {
        fn write(inner: &DocumentInner, node: NodeId, out: &mut String) {
            let Ok(data) = inner.node(node) else { return };
            let _ = write!(out, "<{}", data.tag);
            for (name, value) in &data.properties {
                match value {
                    Value::String(text) => {
                        let _ = write!(out, " {name}=\"{text}\"");
                    }
                    other => {
                        let _ = write!(out, " {name}=\"{other}\"");
                    }
                }
            }
            out.push('>');
            if let Some(text) = &data.text {
                out.push_str(text);
            }
            for child in &data.children {
                write(inner, *child, out);
            }
            let _ = write!(out, "</{}>", data.tag);
        }

        let mut out = String::new();
        write(&self.inner.borrow(), node, &mut out);
        out
    }

    /// Every attached node matching `selector`, in document order.
    ///
    /// Accepts the same single-part selectors as `query_selector`.
    #[must_use]
    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let selector = selector.trim();
        self.find_all(|data| matches_selector(data, selector))
    }

    fn find(&self, predicate: impl Fn(&NodeData) -> bool) -> Option<NodeId> {
        self.walk(predicate, true).into_iter().next()
    }

    fn find_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.walk(predicate, false)
    }

    fn walk(&self, predicate: impl Fn(&NodeData) -> bool, first_only: bool) -> Vec<NodeId> {
        let inner = self.inner.borrow();
        let mut found = Vec::new();
        let mut stack = vec![NodeId(0)];
        while let Some(id) = stack.pop() {
            let Ok(data) = inner.node(id) else { continue };
            if predicate(data) {
                found.push(id);
                if first_only {
                    break;
                }
            }
            stack.extend(data.children.iter().rev().copied());
        }
        found
    }
}

fn matches_selector(data: &NodeData, selector: &str) -> bool {
    if let Some(id) = selector.strip_prefix('#') {
        data.properties.get("id").and_then(Value::as_str) == Some(id)
            || data.attributes.get("id").map(String::as_str) == Some(id)
    } else if let Some(class) = selector.strip_prefix('.') {
        data.properties
            .get("className")
            .and_then(Value::as_str)
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    } else {
        data.tag.eq_ignore_ascii_case(selector)
    }
}

impl Host for MemoryDocument {
    type Node = NodeId;

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let selector = selector.trim();
        if selector.is_empty() || selector.contains(char::is_whitespace) {
            return Err(FlexError::host(format!("unsupported selector `{selector}`")));
        }
        Ok(self.find(|data| matches_selector(data, selector)))
    }

    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(FlexError::host(format!("invalid tag name `{tag}`")));
        }
        let mut inner = self.inner.borrow_mut();
        let id = NodeId(inner.nodes.len());
        inner.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        Ok(id)
    }

    fn set_key(&self, node: &NodeId, attribute: &str, key: &Key) -> Result<()> {
        self.inner
            .borrow_mut()
            .node_mut(*node)?
            .attributes
            .insert(attribute.to_owned(), key.to_string());
        Ok(())
    }

    fn set_property(&self, node: &NodeId, name: &str, value: &Value) -> Result<()> {
        self.inner
            .borrow_mut()
            .node_mut(*node)?
            .properties
            .insert(name.to_owned(), value.clone());
        Ok(())
    }

    fn set_text(&self, node: &NodeId, text: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let children = core::mem::take(&mut inner.node_mut(*node)?.children);
        for child in children {
            inner.node_mut(child)?.parent = None;
        }
        inner.node_mut(*node)?.text = Some(text.to_owned());
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.is_inclusive_ancestor(*child, *parent)? {
            return Err(FlexError::host("the new child is an ancestor of the parent"));
        }
        inner.detach(*child)?;
        inner.node_mut(*parent)?.children.push(*child);
        inner.node_mut(*child)?.parent = Some(*parent);
        inner.appends += 1;
        Ok(())
    }

    fn replace_child(&self, parent: &NodeId, new: &NodeId, old: &NodeId) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if !inner.node(*parent)?.children.contains(old) {
            return Err(FlexError::host("the node to be replaced is not a child of this node"));
        }
        if new == old {
            return Ok(());
        }
        if inner.is_inclusive_ancestor(*new, *parent)? {
            return Err(FlexError::host("the new child is an ancestor of the parent"));
        }
        inner.detach(*new)?;
        let children = &mut inner.node_mut(*parent)?.children;
        if let Some(slot) = children.iter_mut().find(|id| **id == *old) {
            *slot = *new;
        }
        inner.node_mut(*old)?.parent = None;
        inner.node_mut(*new)?.parent = Some(*parent);
        inner.replacements += 1;
        Ok(())
    }

    fn listen(&self, node: &NodeId, event: &EventName, handler: EventHandler) -> Result<()> {
        self.inner
            .borrow_mut()
            .node_mut(*node)?
            .listeners
            .push((event.clone(), handler));
        Ok(())
    }
}
