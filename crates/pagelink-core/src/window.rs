#![forbid(unsafe_code)]

//! Visible-window computation.
//!
//! Given the pagination parameters, decide which page slots are shown and in
//! what order. The result is the union of three ranges:
//!
//! ```text
//! lead      [0, lead_length)
//! window    [max(lead_length, active - radius), min(length - 1, active + radius)]
//! trail     [length - trail_length, length)
//! ```
//!
//! A clip stands in for every run of hidden pages. There is at most one run
//! on each side of the active page, because the window is contiguous around
//! `active` and the lead/trail ranges hug the ends. Overlapping ranges are
//! merged, so an index never appears twice.
//!
//! # Example
//!
//! ```
//! use pagelink_core::window::{ClipSide, Slot, WindowParams, compute_window};
//!
//! let window = compute_window(&WindowParams {
//!     length: 20,
//!     active: 10,
//!     lead_length: 1,
//!     trail_length: 1,
//!     radius: 2,
//! });
//! assert_eq!(
//!     window.slots(),
//!     &[
//!         Slot::Page(0),
//!         Slot::Clip(ClipSide::Left),
//!         Slot::Page(8),
//!         Slot::Page(9),
//!         Slot::Page(10),
//!         Slot::Page(11),
//!         Slot::Page(12),
//!         Slot::Clip(ClipSide::Right),
//!         Slot::Page(19),
//!     ]
//! );
//! ```

use std::fmt;

/// Which side of the active page a clip hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipSide {
    /// Hidden pages before the active page.
    Left,
    /// Hidden pages after the active page.
    Right,
}

impl ClipSide {
    /// Stable lowercase name, as passed to clip template callbacks.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for ClipSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One visible position in the link row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The link for a page index.
    Page(usize),
    /// A truncation indicator.
    Clip(ClipSide),
}

impl Slot {
    /// Page index, if this slot is a page link.
    #[must_use]
    pub const fn page(self) -> Option<usize> {
        match self {
            Self::Page(i) => Some(i),
            Self::Clip(_) => None,
        }
    }
}

/// Inputs to [`compute_window`].
///
/// Values are expected to be normalized already (`length >= 1`,
/// `active < length`); [`compute_window`] tolerates violations by clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowParams {
    pub length: usize,
    pub active: usize,
    pub lead_length: usize,
    pub trail_length: usize,
    pub radius: usize,
}

/// Ordered visible slots for one state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    slots: Vec<Slot>,
}

impl Window {
    /// Slots in display order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Visible page indices in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().filter_map(|slot| slot.page())
    }

    /// Whether the clip for `side` is shown.
    #[must_use]
    pub fn has_clip(&self, side: ClipSide) -> bool {
        self.slots.contains(&Slot::Clip(side))
    }

    /// Whether page `index` is shown.
    #[must_use]
    pub fn contains_page(&self, index: usize) -> bool {
        self.slots.contains(&Slot::Page(index))
    }

    /// Number of slots, clips included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is visible. Never true for a normalized state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<'a> IntoIterator for &'a Window {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

/// Compute the visible slots for the given parameters.
#[must_use]
pub fn compute_window(params: &WindowParams) -> Window {
    let length = params.length.max(1);
    let active = params.active.min(length - 1);

    let lead_end = params.lead_length.min(length);
    let win_start = params.lead_length.max(active.saturating_sub(params.radius));
    let win_end = (length - 1).min(active.saturating_add(params.radius));
    let trail_start = length.saturating_sub(params.trail_length);

    // Half-open ranges, sorted by start so a trail that reaches below the
    // window is emitted before it.
    let mut ranges = [
        (0, lead_end),
        (win_start, win_end.saturating_add(1)),
        (trail_start, length),
    ];
    ranges.sort_unstable_by_key(|&(start, _)| start);

    let mut slots = Vec::with_capacity(
        lead_end + params.trail_length.min(length) + params.radius.min(length) * 2 + 3,
    );
    // Next index that has not been emitted yet; keeps the output ascending
    // and free of duplicates when ranges overlap.
    let mut next = 0usize;
    let mut left_clipped = false;
    let mut right_clipped = false;

    for (start, end) in ranges {
        let start = start.max(next);
        if start >= end {
            continue;
        }
        if start > next {
            // Pages in [next, start) are hidden.
            if next < active && !left_clipped {
                slots.push(Slot::Clip(ClipSide::Left));
                left_clipped = true;
            } else if next > active && !right_clipped {
                slots.push(Slot::Clip(ClipSide::Right));
                right_clipped = true;
            }
        }
        slots.extend((start..end).map(Slot::Page));
        next = end;
    }

    if next < length && !right_clipped {
        // Hidden tail with no trailing range.
        slots.push(Slot::Clip(ClipSide::Right));
    }

    Window { slots }
}
