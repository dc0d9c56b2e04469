#![forbid(unsafe_code)]

//! The active-index change hook.
//!
//! A pagination may carry one hook that is told about every active-index
//! change before it takes effect, and may cancel it. A router that guards
//! against leaving a page with unsaved changes is the typical user.
//!
//! # Re-entrancy
//!
//! The hook cannot reach the pagination directly. Instead it receives a
//! [`Deferred`] slot: a `set_active`/`set_length` request made there is
//! applied after the change under way (and its rebuild) has completed. The
//! slot holds one request; a later request replaces an earlier one, so the
//! last write wins. Requests made while a deferred request is being applied
//! chain, up to [`MAX_DEFERRED_CHAIN`] links; anything beyond is dropped.

use pagelink_core::coerce::PageNumber;

/// Longest chain of hook-issued follow-up requests applied in one call.
pub const MAX_DEFERRED_CHAIN: usize = 32;

/// Why the active index is about to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// `set_active`, `next` or `previous`.
    Api,
    /// The user activated a link on the surface.
    Activation,
    /// The page count shrank below the active index.
    Length,
    /// A request the hook queued through [`Deferred`].
    Deferred,
}

/// A pending active-index change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRequest {
    /// Active index before the change.
    pub from: usize,
    /// Active index after the change.
    pub to: usize,
    pub cause: ChangeCause,
}

impl ChangeRequest {
    /// Whether [`ChangeVerdict::Abort`] is honored.
    ///
    /// Clamps caused by shrinking the page count are not: the active index
    /// may never point past the last page.
    #[must_use]
    pub const fn is_vetoable(&self) -> bool {
        !matches!(self.cause, ChangeCause::Length)
    }
}

/// Hook decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangeVerdict {
    /// Let the change happen.
    #[default]
    Proceed,
    /// Cancel the change; nothing is mutated or rebuilt.
    Abort,
}

impl From<()> for ChangeVerdict {
    fn from((): ()) -> Self {
        Self::Proceed
    }
}

impl From<bool> for ChangeVerdict {
    /// `false` aborts; `true` proceeds.
    fn from(proceed: bool) -> Self {
        if proceed { Self::Proceed } else { Self::Abort }
    }
}

/// A request the hook queued for after the current change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredOp {
    SetActive(i64),
    SetLength(i64),
}

/// Single-slot queue handed to the hook.
#[derive(Debug, Default)]
pub struct Deferred {
    pending: Option<DeferredOp>,
}

impl Deferred {
    /// Request an active-index change once the current one completes.
    pub fn set_active(&mut self, index: impl PageNumber) {
        self.pending = Some(DeferredOp::SetActive(index.to_page_number()));
    }

    /// Request a page-count change once the current one completes.
    pub fn set_length(&mut self, length: impl PageNumber) {
        self.pending = Some(DeferredOp::SetLength(length.to_page_number()));
    }

    /// The queued request, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<DeferredOp> {
        self.pending
    }

    pub(crate) fn take(&mut self) -> Option<DeferredOp> {
        self.pending.take()
    }
}

/// Boxed hook.
pub type ChangeHook = Box<dyn FnMut(&ChangeRequest, &mut Deferred) -> ChangeVerdict>;

/// Box a hook returning anything convertible to a verdict (`()`, `bool`,
/// [`ChangeVerdict`]).
pub fn boxed_hook<F, V>(mut hook: F) -> ChangeHook
where
    F: FnMut(&ChangeRequest, &mut Deferred) -> V + 'static,
    V: Into<ChangeVerdict>,
{
    Box::new(move |request: &ChangeRequest, deferred: &mut Deferred| {
        hook(request, deferred).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cause: ChangeCause) -> ChangeRequest {
        ChangeRequest {
            from: 2,
            to: 5,
            cause,
        }
    }

    #[test]
    fn verdict_conversions() {
        assert_eq!(ChangeVerdict::from(()), ChangeVerdict::Proceed);
        assert_eq!(ChangeVerdict::from(true), ChangeVerdict::Proceed);
        assert_eq!(ChangeVerdict::from(false), ChangeVerdict::Abort);
    }

    #[test]
    fn length_clamps_are_not_vetoable() {
        assert!(request(ChangeCause::Api).is_vetoable());
        assert!(request(ChangeCause::Activation).is_vetoable());
        assert!(request(ChangeCause::Deferred).is_vetoable());
        assert!(!request(ChangeCause::Length).is_vetoable());
    }

    #[test]
    fn deferred_last_write_wins() {
        let mut deferred = Deferred::default();
        deferred.set_active(3);
        deferred.set_length("12");
        assert_eq!(deferred.pending(), Some(DeferredOp::SetLength(12)));
        assert_eq!(deferred.take(), Some(DeferredOp::SetLength(12)));
        assert_eq!(deferred.take(), None);
    }

    #[test]
    fn boxed_hook_converts_return_values() {
        let mut observer = boxed_hook(|_: &ChangeRequest, _: &mut Deferred| {});
        let mut guard = boxed_hook(|req: &ChangeRequest, _: &mut Deferred| req.to < 4);
        let mut deferred = Deferred::default();
        assert_eq!(
            observer(&request(ChangeCause::Api), &mut deferred),
            ChangeVerdict::Proceed
        );
        assert_eq!(
            guard(&request(ChangeCause::Api), &mut deferred),
            ChangeVerdict::Abort
        );
    }
}
