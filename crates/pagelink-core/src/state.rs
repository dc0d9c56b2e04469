#![forbid(unsafe_code)]

//! Normalized pagination parameters.

use crate::window::{Window, WindowParams, compute_window};

/// Default page count.
pub const DEFAULT_LENGTH: usize = 20;
/// Default active index.
pub const DEFAULT_ACTIVE: usize = 0;
/// Default number of pages pinned at the start.
pub const DEFAULT_LEAD_LENGTH: usize = 1;
/// Default number of pages pinned at the end.
pub const DEFAULT_TRAIL_LENGTH: usize = 1;
/// Default half-width of the band around the active page.
pub const DEFAULT_RADIUS: usize = 2;

/// Snapshot of a pagination's parameters.
///
/// Always normalized: `length >= 1` and `active < length`. Template
/// callbacks receive a copy of this as their read-only view of the owning
/// pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub length: usize,
    pub active: usize,
    pub lead_length: usize,
    pub trail_length: usize,
    pub radius: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            active: DEFAULT_ACTIVE,
            lead_length: DEFAULT_LEAD_LENGTH,
            trail_length: DEFAULT_TRAIL_LENGTH,
            radius: DEFAULT_RADIUS,
        }
    }
}

impl PaginationState {
    /// Parameters for [`compute_window`].
    #[must_use]
    pub const fn window_params(&self) -> WindowParams {
        WindowParams {
            length: self.length,
            active: self.active,
            lead_length: self.lead_length,
            trail_length: self.trail_length,
            radius: self.radius,
        }
    }

    /// Visible slots for this state.
    #[must_use]
    pub fn window(&self) -> Window {
        compute_window(&self.window_params())
    }

    /// Whether the active page is the first one.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.active == 0
    }

    /// Whether the active page is the last one.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.active + 1 >= self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::ClipSide;

    #[test]
    fn defaults() {
        let state = PaginationState::default();
        assert_eq!(state.length, 20);
        assert_eq!(state.active, 0);
        assert_eq!(state.lead_length, 1);
        assert_eq!(state.trail_length, 1);
        assert_eq!(state.radius, 2);
        assert!(state.is_first());
        assert!(!state.is_last());
    }

    #[test]
    fn window_follows_state() {
        let state = PaginationState {
            active: 10,
            ..PaginationState::default()
        };
        let window = state.window();
        assert!(window.has_clip(ClipSide::Left));
        let pages: Vec<_> = window.pages().collect();
        assert_eq!(pages, vec![0, 8, 9, 10, 11, 12, 19]);
    }
}
