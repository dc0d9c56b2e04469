#![forbid(unsafe_code)]

//! Page link handles.
//!
//! [`PageLinkStore`] maps page indices to link nodes. Links are created on
//! first need and kept for the life of the pagination: shrinking the page
//! count detaches links but never frees them, so growing again reuses the
//! same nodes. Memory therefore grows with the largest page count ever set
//! and is never reclaimed.

use ahash::AHashMap;
use pagelink_surface::document::NodeId;

/// Index-keyed arena of link handles.
#[derive(Debug, Clone, Default)]
pub struct PageLinkStore {
    links: Vec<Option<NodeId>>,
    by_node: AHashMap<NodeId, usize>,
    created: usize,
}

impl PageLinkStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link for `index`, if it was ever created.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.links.get(index).copied().flatten()
    }

    /// Link for `index`, creating it with `create` on first request.
    pub fn get_or_create(&mut self, index: usize, create: impl FnOnce(usize) -> NodeId) -> NodeId {
        if let Some(node) = self.get(index) {
            return node;
        }
        let node = create(index);
        if self.links.len() <= index {
            self.links.resize(index + 1, None);
        }
        self.links[index] = Some(node);
        self.by_node.insert(node, index);
        self.created += 1;
        node
    }

    /// Page index a link node stands for.
    #[must_use]
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.by_node.get(&node).copied()
    }

    /// Number of links created so far.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }

    /// Every created link with its index, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(i, node)| node.map(|n| (i, n)))
    }
}
