#![forbid(unsafe_code)]

//! Display-surface plumbing for pagelink.
//!
//! - [`document`]: index-arena node tree (elements and text)
//! - [`markup`]: lenient markup fragment parsing
//! - [`tree`]: tree queries such as [`tree::deepest`]
//! - [`surface`]: the [`Surface`] trait and the [`NodeSurface`] container

pub mod document;
pub mod markup;
pub mod surface;
#[cfg(feature = "test-helpers")]
pub mod testing;
pub mod tree;

pub use document::{Document, NodeId, NodeKind};
pub use markup::parse_fragment;
pub use surface::{Activation, NodeSurface, Surface};
pub use tree::deepest;
