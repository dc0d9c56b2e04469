#![forbid(unsafe_code)]

//! Core logic for pagelink: which page links are visible, and in what order.
//!
//! This crate knows nothing about display surfaces. It provides:
//! - [`coerce`]: lenient conversion of loosely-typed page numbers
//! - [`window`]: the visible-window computation with truncation clips
//! - [`state`]: the normalized parameter snapshot
//! - [`config`]: construction options (JSON, environment, builder)
//! - [`event`]: activation gesture kinds

pub mod coerce;
pub mod config;
pub mod error;
pub mod event;
pub mod state;
pub mod window;

pub use coerce::PageNumber;
pub use config::PaginationOptions;
pub use error::{ConfigError, Result};
pub use event::ActivationKind;
pub use state::PaginationState;
pub use window::{ClipSide, Slot, Window, WindowParams, compute_window};
