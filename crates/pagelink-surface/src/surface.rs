#![forbid(unsafe_code)]

//! Display surfaces.
//!
//! A [`Surface`] is the container a pagination drives: it attaches and
//! detaches nodes, and reports which gesture counts as activating a link.
//! The pagination owns its surface exclusively; nothing else may attach or
//! detach nodes while it is alive.

use pagelink_core::event::ActivationKind;

use crate::document::{Document, NodeId};

/// The "user activated this node" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// Gesture that fired.
    pub kind: ActivationKind,
    /// Node the gesture landed on; may be a descendant of a link.
    pub target: NodeId,
}

impl Activation {
    /// A click on `target`.
    #[must_use]
    pub const fn click(target: NodeId) -> Self {
        Self {
            kind: ActivationKind::Click,
            target,
        }
    }

    /// A touch ending on `target`.
    #[must_use]
    pub const fn touch_end(target: NodeId) -> Self {
        Self {
            kind: ActivationKind::TouchEnd,
            target,
        }
    }
}

/// Container that page links and clips are attached to.
pub trait Surface {
    /// Node arena backing the surface.
    fn document(&self) -> &Document;

    /// Mutable node arena, for building handles.
    fn document_mut(&mut self) -> &mut Document;

    /// Attach `node`, before `before` when given and attached, else at the end.
    /// Attaching an attached node moves it.
    fn attach(&mut self, node: NodeId, before: Option<NodeId>);

    /// Detach `node`. Detaching a detached node is a no-op.
    fn detach(&mut self, node: NodeId);

    /// Whether `node` is currently attached.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Attached nodes in display order.
    fn attached(&self) -> Vec<NodeId>;

    /// Gesture that activates a link on this surface.
    fn activation_kind(&self) -> ActivationKind;
}

/// A [`Surface`] backed by a container element in its own [`Document`].
#[derive(Debug, Clone)]
pub struct NodeSurface {
    doc: Document,
    container: NodeId,
    activation: ActivationKind,
}

impl Default for NodeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeSurface {
    /// Surface with a `<div>` container activated by clicks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_container("div")
    }

    /// Surface with a container element of the given tag.
    #[must_use]
    pub fn with_container(tag: &str) -> Self {
        let mut doc = Document::new();
        let container = doc.create_element(tag);
        Self {
            doc,
            container,
            activation: ActivationKind::default(),
        }
    }

    /// Set the activation gesture, usually picked from host touch support.
    #[must_use]
    pub fn with_activation(mut self, activation: ActivationKind) -> Self {
        self.activation = activation;
        self
    }

    /// The container element.
    #[must_use]
    pub const fn container(&self) -> NodeId {
        self.container
    }

    /// Markup of the container and everything attached.
    #[must_use]
    pub fn outer_html(&self) -> String {
        self.doc.outer_html(self.container)
    }

    /// Text of each attached node, space-separated.
    #[must_use]
    pub fn render_text(&self) -> String {
        self.render_marked("")
    }

    /// Like [`Self::render_text`], wrapping nodes that carry `class` in
    /// brackets: `1 … 9 [10] 11 … 20`.
    #[must_use]
    pub fn render_marked(&self, class: &str) -> String {
        self.doc
            .children(self.container)
            .iter()
            .map(|&node| {
                let text = self.doc.text_content(node);
                if !class.is_empty() && self.doc.has_class(node, class) {
                    format!("[{text}]")
                } else {
                    text
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Surface for NodeSurface {
    fn document(&self) -> &Document {
        &self.doc
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    fn attach(&mut self, node: NodeId, before: Option<NodeId>) {
        let before = before.filter(|&b| self.is_attached(b));
        self.doc.insert_before(self.container, node, before);
    }

    fn detach(&mut self, node: NodeId) {
        if self.is_attached(node) {
            self.doc.detach(node);
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.doc.parent(node) == Some(self.container)
    }

    fn attached(&self) -> Vec<NodeId> {
        self.doc.children(self.container).to_vec()
    }

    fn activation_kind(&self) -> ActivationKind {
        self.activation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attach_appends_and_inserts() {
        let mut surface = NodeSurface::new();
        let doc = surface.document_mut();
        let a = doc.create_text("a");
        let b = doc.create_text("b");
        let c = doc.create_text("c");

        surface.attach(a, None);
        surface.attach(c, None);
        surface.attach(b, Some(c));
        assert_eq!(surface.attached(), vec![a, b, c]);
        assert_eq!(surface.render_text(), "a b c");
    }

    #[test]
    fn before_a_detached_node_appends() {
        let mut surface = NodeSurface::new();
        let doc = surface.document_mut();
        let a = doc.create_text("a");
        let loose = doc.create_text("loose");
        surface.attach(a, Some(loose));
        assert_eq!(surface.attached(), vec![a]);
    }

    #[test]
    fn detach_only_touches_own_children() {
        let mut surface = NodeSurface::new();
        let doc = surface.document_mut();
        let outer = doc.create_element("span");
        let inner = doc.create_text("x");
        doc.append_child(outer, inner);
        surface.attach(outer, None);

        // `inner` is not a direct child; it stays inside `outer`.
        surface.detach(inner);
        assert_eq!(surface.document().parent(inner), Some(outer));
        surface.detach(outer);
        surface.detach(outer);
        assert!(surface.attached().is_empty());
    }

    #[test]
    fn render_marked_brackets_active() {
        let mut surface = NodeSurface::with_container("nav");
        let doc = surface.document_mut();
        let one = doc.create_element("a");
        let t1 = doc.create_text("1");
        doc.append_child(one, t1);
        let two = doc.create_element("a");
        let t2 = doc.create_text("2");
        doc.append_child(two, t2);
        doc.toggle_class(two, "active", true);
        surface.attach(one, None);
        surface.attach(two, None);

        assert_eq!(surface.render_marked("active"), "1 [2]");
        assert_eq!(
            surface.outer_html(),
            r#"<nav><a>1</a><a class="active">2</a></nav>"#
        );
    }

    #[test]
    fn activation_kind_is_injected() {
        let surface = NodeSurface::new().with_activation(ActivationKind::TouchEnd);
        assert_eq!(surface.activation_kind(), ActivationKind::TouchEnd);
        let kind = NodeSurface::default().activation_kind();
        assert_eq!(kind, ActivationKind::Click);
    }
}
