#![forbid(unsafe_code)]

//! Link and clip templates.
//!
//! A template is the blueprint a pagination stamps out handles from. Hosts
//! hand one in as a [`TemplateSource`] in any of the accepted shapes; it is
//! resolved once, at assignment, into a [`Template`]:
//!
//! | Source                     | Resolved as                               |
//! |----------------------------|-------------------------------------------|
//! | [`TemplateSource::Default`]| [`Template::Default`]                     |
//! | [`TemplateSource::Node`]   | the node, detached; cloned per use        |
//! | [`TemplateSource::Markup`] | parsed once into a node; cloned per use   |
//! | [`TemplateSource::Callback`]| called per use                           |
//!
//! Empty or unparsable markup and dead nodes resolve to the default.

use std::fmt;
use std::rc::Rc;

use pagelink_core::state::PaginationState;
use pagelink_core::window::ClipSide;
use pagelink_surface::document::{Document, NodeId};
use pagelink_surface::markup::parse_fragment;
use pagelink_surface::tree::deepest;

/// Text of the default truncation indicator.
pub const DEFAULT_CLIP_TEXT: &str = "\u{2026}";

/// What a template callback produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// A node in the pagination's document. It is cloned, never adopted.
    Node(NodeId),
    /// Markup parsed into a fresh node.
    Markup(String),
}

/// Template callback. `None` asks for the default handle.
pub type TemplateFn<A> = Rc<dyn Fn(&mut Document, &A) -> Option<Rendered>>;

/// Arguments passed to link template callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkContext {
    /// Zero-based page index of the link being created.
    pub index: usize,
    /// Read-only view of the owning pagination.
    pub state: PaginationState,
}

/// Unresolved template input.
pub enum TemplateSource<A> {
    /// Built-in handle.
    Default,
    /// A prebuilt node; it is detached from wherever it lives.
    Node(NodeId),
    /// Markup; its first element (or first text) becomes the prototype.
    Markup(String),
    /// Called for every handle.
    Callback(TemplateFn<A>),
}

impl<A> TemplateSource<A> {
    /// Wrap a callback.
    pub fn callback(f: impl Fn(&mut Document, &A) -> Option<Rendered> + 'static) -> Self {
        Self::Callback(Rc::new(f))
    }
}

impl<A> Default for TemplateSource<A> {
    fn default() -> Self {
        Self::Default
    }
}

impl<A> From<&str> for TemplateSource<A> {
    fn from(markup: &str) -> Self {
        Self::Markup(markup.to_owned())
    }
}

impl<A> From<String> for TemplateSource<A> {
    fn from(markup: String) -> Self {
        Self::Markup(markup)
    }
}

impl<A> From<NodeId> for TemplateSource<A> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl<A> fmt::Debug for TemplateSource<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Markup(markup) => f.debug_tuple("Markup").field(markup).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Resolved template.
pub enum Template<A> {
    Default,
    /// Prototype node, detached, owned by the template.
    Node(NodeId),
    Callback(TemplateFn<A>),
}

impl<A> fmt::Debug for Template<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl<A> Template<A> {
    /// Resolve `source` against `doc`.
    pub fn resolve(doc: &mut Document, source: TemplateSource<A>) -> Self {
        match source {
            TemplateSource::Default => Self::Default,
            TemplateSource::Node(node) if doc.contains(node) => {
                doc.detach(node);
                Self::Node(node)
            }
            TemplateSource::Node(_) => Self::Default,
            TemplateSource::Markup(markup) => {
                parse_fragment(doc, &markup).map_or(Self::Default, Self::Node)
            }
            TemplateSource::Callback(f) => Self::Callback(f),
        }
    }

    /// Whether handles come from a callback.
    #[must_use]
    pub const fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    /// Produce a fresh detached node, or `None` for the default handle.
    pub fn instantiate(&self, doc: &mut Document, args: &A) -> Option<NodeId> {
        match self {
            Self::Default => None,
            Self::Node(prototype) => doc.deep_clone(*prototype),
            Self::Callback(f) => match f(doc, args)? {
                Rendered::Node(node) => doc.deep_clone(node),
                Rendered::Markup(markup) => parse_fragment(doc, &markup),
            },
        }
    }

    /// Free the prototype node, if this template owns one.
    pub fn release(self, doc: &mut Document) {
        if let Self::Node(prototype) = self {
            doc.discard(prototype);
        }
    }
}

/// Stamp out the link for `ctx.index`.
///
/// Unless a callback produced the node, the label (the first text of the
/// deepest element) is set to the one-based page number.
pub fn create_link(
    doc: &mut Document,
    template: &Template<LinkContext>,
    ctx: &LinkContext,
) -> NodeId {
    let (node, label_it) = match template.instantiate(doc, ctx) {
        Some(node) => (node, !template.is_callback()),
        None => (default_link(doc), true),
    };
    if label_it {
        set_label(doc, node, &(ctx.index + 1).to_string());
    }
    doc.set_attr(node, "data-index", ctx.index.to_string());
    node
}

/// Stamp out the clip for `side`.
pub fn create_clip(doc: &mut Document, template: &Template<ClipSide>, side: ClipSide) -> NodeId {
    let node = template
        .instantiate(doc, &side)
        .unwrap_or_else(|| doc.create_text(DEFAULT_CLIP_TEXT));
    doc.set_attr(node, "data-clip", side.name());
    node
}

fn default_link(doc: &mut Document) -> NodeId {
    let anchor = doc.create_element("a");
    doc.set_attr(anchor, "href", "#");
    anchor
}

fn set_label(doc: &mut Document, node: NodeId, label: &str) {
    let target = deepest(doc, node);
    if doc.set_text(target, label) {
        return;
    }
    match doc.first_child(target) {
        Some(first) if doc.is_text(first) => {
            doc.set_text(first, label);
        }
        first => {
            let text = doc.create_text(label);
            doc.insert_before(target, text, first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn ctx(index: usize) -> LinkContext {
        LinkContext {
            index,
            state: PaginationState::default(),
        }
    }

    #[test]
    fn default_link_is_numbered_anchor() {
        let mut doc = Document::new();
        let link = create_link(&mut doc, &Template::Default, &ctx(4));
        let html = doc.outer_html(link);
        assert_eq!(html, r##"<a href="#" data-index="4">5</a>"##);
    }

    #[test]
    fn markup_template_labels_deepest_element() {
        let mut doc = Document::new();
        let template = Template::resolve(
            &mut doc,
            TemplateSource::from("<li class=\"page\"><a href=\"#\"><span>?</span></a></li>"),
        );
        let link = create_link(&mut doc, &template, &ctx(0));
        assert_eq!(
            doc.outer_html(link),
            r##"<li class="page" data-index="0"><a href="#"><span>1</span></a></li>"##
        );
    }

    #[test]
    fn label_goes_before_element_children() {
        let mut doc = Document::new();
        let template = Template::resolve(&mut doc, TemplateSource::from("<a><b></b><i></i></a>"));
        // Deepest is <b> (first at max depth), which is empty.
        let link = create_link(&mut doc, &template, &ctx(2));
        let html = doc.outer_html(link);
        assert_eq!(html, r#"<a data-index="2"><b>3</b><i></i></a>"#);
    }

    #[test]
    fn text_template_is_relabelled() {
        let mut doc = Document::new();
        let template = Template::resolve(&mut doc, TemplateSource::from("page"));
        let link = create_link(&mut doc, &template, &ctx(8));
        assert_eq!(doc.text(link), Some("9"));
    }

    #[test]
    fn node_template_is_detached_and_cloned() {
        let mut doc = Document::new();
        let holder = doc.create_element("div");
        let proto = doc.create_element("button");
        doc.append_child(holder, proto);

        let template = Template::resolve(&mut doc, TemplateSource::Node(proto));
        assert_eq!(doc.parent(proto), None);

        let a = create_link(&mut doc, &template, &ctx(0));
        let b = create_link(&mut doc, &template, &ctx(1));
        assert_ne!(a, proto);
        assert_ne!(a, b);
        assert_eq!(doc.text_content(a), "1");
        assert_eq!(doc.text_content(b), "2");
        assert_eq!(doc.text_content(proto), "");
    }

    #[test]
    fn dead_node_and_empty_markup_resolve_to_default() {
        let mut doc = Document::new();
        let gone = doc.create_element("a");
        doc.discard(gone);
        assert!(matches!(
            Template::<LinkContext>::resolve(&mut doc, TemplateSource::Node(gone)),
            Template::Default
        ));
        assert!(matches!(
            Template::<LinkContext>::resolve(&mut doc, TemplateSource::from("")),
            Template::Default
        ));
    }

    #[test]
    fn callback_output_is_not_relabelled() {
        let mut doc = Document::new();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let template = Template::resolve(
            &mut doc,
            TemplateSource::callback(move |_doc: &mut Document, ctx: &LinkContext| {
                seen.set(seen.get() + 1);
                Some(Rendered::Markup(format!("<a>p{}</a>", ctx.index)))
            }),
        );
        let link = create_link(&mut doc, &template, &ctx(3));
        assert_eq!(doc.text_content(link), "p3");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn callback_declining_gets_labelled_default() {
        let mut doc = Document::new();
        let template: Template<LinkContext> =
            Template::resolve(&mut doc, TemplateSource::callback(|_, _| None));
        let link = create_link(&mut doc, &template, &ctx(0));
        assert_eq!(doc.tag(link), Some("a"));
        assert_eq!(doc.text_content(link), "1");
    }

    #[test]
    fn callback_node_result_is_cloned() {
        let mut doc = Document::new();
        let shared = doc.create_element("em");
        let template: Template<LinkContext> = Template::resolve(
            &mut doc,
            TemplateSource::callback(move |_, _| Some(Rendered::Node(shared))),
        );
        let a = create_link(&mut doc, &template, &ctx(0));
        let b = create_link(&mut doc, &template, &ctx(1));
        assert_ne!(a, shared);
        assert_ne!(a, b);
    }

    #[test]
    fn default_clip_is_ellipsis_text() {
        let mut doc = Document::new();
        let clip = create_clip(&mut doc, &Template::Default, ClipSide::Left);
        assert_eq!(doc.text(clip), Some("\u{2026}"));
    }

    #[test]
    fn clip_callback_sees_side() {
        let mut doc = Document::new();
        let template: Template<ClipSide> = Template::resolve(
            &mut doc,
            TemplateSource::callback(|_, side: &ClipSide| {
                Some(Rendered::Markup(format!("<i>{side}</i>")))
            }),
        );
        let left = create_clip(&mut doc, &template, ClipSide::Left);
        let right = create_clip(&mut doc, &template, ClipSide::Right);
        assert_eq!(doc.outer_html(left), r#"<i data-clip="left">left</i>"#);
        assert_eq!(doc.outer_html(right), r#"<i data-clip="right">right</i>"#);
    }

    #[test]
    fn release_frees_prototype() {
        let mut doc = Document::new();
        let template: Template<ClipSide> =
            Template::resolve(&mut doc, TemplateSource::from("<b>x</b>"));
        assert_eq!(doc.len(), 2);
        template.release(&mut doc);
        assert!(doc.is_empty());
    }
}
