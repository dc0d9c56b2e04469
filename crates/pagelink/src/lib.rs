#![forbid(unsafe_code)]

//! Paginated page-link row.
//!
//! [`Pagination`] shows a sliding window of page links around the active
//! page, pins a few links at each end, and collapses what it skips behind
//! truncation clips:
//!
//! ```text
//! 1 … 9 10 [11] 12 13 … 20
//! ```
//!
//! The window arithmetic lives in [`pagelink_core`]; the node tree and the
//! [`Surface`] trait the pagination drives live in [`pagelink_surface`].
//!
//! # Example
//!
//! ```
//! use pagelink::{ActivationResult, Pagination, PaginationOptions};
//! use pagelink::surface::Activation;
//!
//! let mut pagination = Pagination::new(PaginationOptions::default().with_length(8));
//! let third = pagination.link(2).unwrap();
//! assert_eq!(
//!     pagination.handle_activation(&Activation::click(third)),
//!     ActivationResult::Selected(2),
//! );
//! assert_eq!(pagination.surface().render_marked("active"), "1 2 [3] 4 5 … 8");
//! ```

pub mod controller;
pub mod hook;
pub mod store;
pub mod template;

pub use pagelink_core::{
    ActivationKind, ClipSide, ConfigError, PageNumber, PaginationOptions, PaginationState, Slot,
    Window, WindowParams, compute_window,
};
pub use pagelink_surface::{self as surface, Activation, Document, NodeId, NodeSurface, Surface};

pub use controller::{ActivationResult, Pagination, PaginationBuilder};
pub use hook::{
    ChangeCause, ChangeHook, ChangeRequest, ChangeVerdict, Deferred, DeferredOp, boxed_hook,
};
pub use store::PageLinkStore;
pub use template::{LinkContext, Rendered, TemplateSource};
