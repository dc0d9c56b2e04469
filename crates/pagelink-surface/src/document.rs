#![forbid(unsafe_code)]

//! Index-arena node document.
//!
//! A small DOM-like tree: element nodes (tag, ordered attributes, children)
//! and text nodes, addressed by [`NodeId`]. Nodes are never moved in memory;
//! a node lives in one slot from creation until it is discarded. Slot ids
//! are not reused, so a stale [`NodeId`] can never alias a newer node.
//!
//! Operations on a missing or discarded node are no-ops that report failure
//! through their return value instead of panicking.

use std::fmt;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Whether `tag` is a void element.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw slot number.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in insertion order.
    #[must_use]
    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set_attr(&mut self, name: &str, value: String) {
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_owned(), value));
        }
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of nodes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Option<NodeData>>,
    live: usize,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(Some(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        self.live += 1;
        id
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.slot()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.slot()).and_then(Option::as_mut)
    }

    /// Create a detached element. The tag is lowercased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    /// Number of live (not discarded) nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the document holds no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Node payload.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Whether `id` is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element(_)))
    }

    /// Whether `id` is a text node.
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    /// Element tag name.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element(el) => Some(el.tag()),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    // ── Attributes and classes ──────────────────────────────────────────

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element(el) => el.attr(name),
            NodeKind::Text(_) => None,
        }
    }

    /// Set an attribute. Returns `false` for text or missing nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        match self.element_mut(id) {
            Some(el) => {
                el.set_attr(name, value.into());
                true
            }
            None => false,
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        let before = el.attrs.len();
        el.attrs.retain(|(k, _)| k != name);
        el.attrs.len() != before
    }

    /// Whether the element's `class` attribute lists `class`.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// Add or remove `class`. Returns whether the class list changed.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) -> bool {
        if class.is_empty() || self.has_class(id, class) == on {
            return false;
        }
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        let current = el.attr("class").unwrap_or("");
        let next = if on {
            if current.trim().is_empty() {
                class.to_owned()
            } else {
                format!("{} {class}", current.trim_end())
            }
        } else {
            current
                .split_ascii_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ")
        };
        if next.is_empty() {
            el.attrs.retain(|(k, _)| k != "class");
        } else {
            el.set_attr("class", next);
        }
        true
    }

    // ── Text ────────────────────────────────────────────────────────────

    /// Data of a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    /// Replace the data of a text node. Returns `false` for elements.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Text(data)) => {
                *data = text.into();
                true
            }
            _ => false,
        }
    }

    /// Concatenated text of `id` and its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    // ── Structure ───────────────────────────────────────────────────────

    /// Parent node, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Child nodes in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// First child node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Append `child` as the last child of `parent`, moving it if needed.
    ///
    /// Returns `false` (and changes nothing) if either node is missing,
    /// `parent` is a text node, or the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference`, moving it if needed.
    ///
    /// A `reference` of `None`, or one that is not a child of `parent`,
    /// appends. Inserting a node before itself leaves it in place.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> bool {
        if !self.is_element(parent)
            || !self.contains(child)
            || self.is_inclusive_ancestor(child, parent)
        {
            return false;
        }
        if reference == Some(child) {
            return self.parent(child) == Some(parent);
        }
        self.detach(child);
        let Some(parent_node) = self.node_mut(parent) else {
            return false;
        };
        let at = reference
            .and_then(|r| parent_node.children.iter().position(|&c| c == r))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(at, child);
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
        }
        true
    }

    /// Remove `id` from its parent. Returns whether it was attached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        true
    }

    /// Copy `id` and its whole subtree. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> Option<NodeId> {
        let (kind, children) = {
            let node = self.node(id)?;
            (node.kind.clone(), node.children.clone())
        };
        let copy = self.alloc(kind);
        for child in children {
            if let Some(child_copy) = self.deep_clone(child) {
                self.append_child(copy, child_copy);
            }
        }
        Some(copy)
    }

    /// Detach `id` and free its subtree. The ids stay dead forever.
    pub fn discard(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.slot()).and_then(Option::take) {
                self.live -= 1;
                stack.extend(node.children);
            }
        }
    }

    // ── Serialization ───────────────────────────────────────────────────

    /// Serialize `id` and its subtree as markup.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        use std::fmt::Write as _;

        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => {
                let _ = write!(out, "{}", v_htmlescape::escape(text));
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attrs {
                    let _ = write!(out, " {name}=\"{}\"", v_htmlescape::escape(value));
                }
                out.push('>');
                if is_void_element(&el.tag) {
                    return;
                }
                for &child in &node.children {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}
