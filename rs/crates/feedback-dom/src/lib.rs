//! feedback-dom — DomNode snapshot tree for the course feedback UI
//!
//! The server renders its whole page into a [`Snapshot`]. Browsers receive it
//! as JSON over SSE and patch their DOM from it; the first paint uses the
//! HTML produced by [`html::render_to_html`].

pub mod html;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single node in the snapshot tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomNode {
    /// HTML tag name (e.g. "div", "select", "textarea")
    pub tag: String,

    /// Stable identity used by the client to reuse DOM elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// HTML attributes, ordered so rendering is deterministic
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,

    /// DOM event name → action name (e.g. "submit" → "on_submit")
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DomNode>,
}

/// A complete snapshot wrapping the root node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub root: DomNode,
}

impl Snapshot {
    pub fn new(root: DomNode) -> Self {
        Self { root }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl DomNode {
    pub fn new(tag: &str) -> Self {
        DomNode {
            tag: tag.to_string(),
            key: None,
            attrs: BTreeMap::new(),
            events: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Leaf node with text content.
    pub fn text(tag: &str, content: &str) -> Self {
        Self::new(tag).with_text(content)
    }

    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    /// Bind a DOM event to a server action.
    pub fn on(mut self, event: &str, action: impl Into<String>) -> Self {
        self.events.insert(event.to_string(), action.into());
        self
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.text = Some(content.into());
        self
    }

    pub fn child(mut self, node: DomNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = DomNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn class_name(&self) -> Option<&str> {
        self.attrs.get("class").map(String::as_str)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class_name()
            .map(|c| c.split_whitespace().any(|c| c == name))
            .unwrap_or(false)
    }

    pub fn event(&self, name: &str) -> Option<&str> {
        self.events.get(name).map(String::as_str)
    }

    /// Depth-first search for the node carrying `key`.
    pub fn find(&self, key: &str) -> Option<&DomNode> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(key))
    }

    /// All nodes in the subtree (self included) that carry the given class.
    pub fn find_all_by_class<'a>(&'a self, name: &str, out: &mut Vec<&'a DomNode>) {
        if self.has_class(name) {
            out.push(self);
        }
        for c in &self.children {
            c.find_all_by_class(name, out);
        }
    }

    /// Concatenated text of the subtree, in document order.
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        if let Some(t) = &self.text {
            buf.push_str(t);
        }
        for c in &self.children {
            c.collect_text(buf);
        }
    }
}

pub fn parse_snapshot(json: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str(json)
}
