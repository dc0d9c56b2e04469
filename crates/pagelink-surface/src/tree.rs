#![forbid(unsafe_code)]

//! Tree queries over a [`Document`].

use crate::document::{Document, NodeId};

/// Return the deepest element below `root`.
///
/// Only element descendants are considered. Ties go to the first element in
/// document order. Returns `root` itself when it has no element descendants
/// (including when `root` is a text node).
#[must_use]
pub fn deepest(doc: &Document, root: NodeId) -> NodeId {
    let mut best = (0usize, root);
    // Pre-order walk; children pushed in reverse so they pop in order.
    let mut stack: Vec<(usize, NodeId)> = doc
        .children(root)
        .iter()
        .rev()
        .map(|&child| (1, child))
        .collect();

    while let Some((depth, node)) = stack.pop() {
        if !doc.is_element(node) {
            continue;
        }
        if depth > best.0 {
            best = (depth, node);
        }
        let children = doc.children(node).iter().rev();
        stack.extend(children.map(|&child| (depth + 1, child)));
    }
    best.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_fragment;

    fn fragment(markup: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let node = parse_fragment(&mut doc, markup).unwrap();
        (doc, node)
    }

    #[test]
    fn leaf_element_is_its_own_deepest() {
        let (doc, a) = fragment("<a href=\"#\">1</a>");
        assert_eq!(deepest(&doc, a), a);
    }

    #[test]
    fn text_root_is_its_own_deepest() {
        let (doc, t) = fragment("plain");
        assert_eq!(deepest(&doc, t), t);
    }

    #[test]
    fn picks_maximum_depth() {
        let (doc, li) = fragment("<li><span>x</span><a><b><i></i></b></a></li>");
        let leaf = deepest(&doc, li);
        assert_eq!(doc.tag(leaf), Some("i"));
    }

    #[test]
    fn ties_go_to_document_order() {
        let (doc, li) = fragment("<li><a><em></em></a><a><strong></strong></a></li>");
        let leaf = deepest(&doc, li);
        assert_eq!(doc.tag(leaf), Some("em"));
    }
}
