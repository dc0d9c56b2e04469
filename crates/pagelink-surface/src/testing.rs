#![forbid(unsafe_code)]

//! Test doubles for surfaces.

use pagelink_core::event::ActivationKind;

use crate::document::{Document, NodeId};
use crate::surface::{NodeSurface, Surface};

/// One recorded surface call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOp {
    Attach {
        node: NodeId,
        before: Option<NodeId>,
    },
    Detach {
        node: NodeId,
    },
}

/// Wraps a surface and records every attach/detach call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface<S = NodeSurface> {
    inner: S,
    ops: Vec<SurfaceOp>,
}

impl<S: Surface> RecordingSurface<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            ops: Vec::new(),
        }
    }

    /// Wrapped surface.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Wrapped surface, mutably. Calls made through it are not recorded.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Calls recorded so far.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Number of attach calls.
    pub fn attach_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Attach { .. }))
            .count()
    }

    /// Number of detach calls.
    pub fn detach_count(&self) -> usize {
        self.ops.len() - self.attach_count()
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl<S: Surface> Surface for RecordingSurface<S> {
    fn document(&self) -> &Document {
        self.inner.document()
    }

    fn document_mut(&mut self) -> &mut Document {
        self.inner.document_mut()
    }

    fn attach(&mut self, node: NodeId, before: Option<NodeId>) {
        self.ops.push(SurfaceOp::Attach { node, before });
        self.inner.attach(node, before);
    }

    fn detach(&mut self, node: NodeId) {
        self.ops.push(SurfaceOp::Detach { node });
        self.inner.detach(node);
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.inner.is_attached(node)
    }

    fn attached(&self) -> Vec<NodeId> {
        self.inner.attached()
    }

    fn activation_kind(&self) -> ActivationKind {
        self.inner.activation_kind()
    }
}
