#![forbid(unsafe_code)]

//! The pagination controller.
//!
//! [`Pagination`] owns the normalized parameters, the link store and the
//! two clips, and keeps its [`Surface`] showing exactly the slots of the
//! current [`Window`]. Every setter sanitizes its input and rebuilds only
//! when the rendered outcome can change.
//!
//! # Example
//!
//! ```
//! use pagelink::{Pagination, PaginationOptions};
//!
//! let mut pagination = Pagination::new(PaginationOptions::default().with_active(10));
//! assert_eq!(pagination.surface().render_marked("active"), "1 … 9 10 [11] 12 13 … 20");
//!
//! pagination.set_length(6);
//! assert_eq!(pagination.active(), 5);
//! assert_eq!(pagination.surface().render_marked("active"), "1 … 4 5 [6]");
//! ```

use std::fmt;

use pagelink_core::coerce::{PageNumber, clamp_count, clamp_index, clamp_length};
use pagelink_core::config::PaginationOptions;
use pagelink_core::state::PaginationState;
use pagelink_core::window::{ClipSide, Slot, Window};
use pagelink_surface::document::{Document, NodeId};
use pagelink_surface::surface::{Activation, NodeSurface, Surface};

use crate::hook::{
    ChangeCause, ChangeHook, ChangeRequest, ChangeVerdict, Deferred, DeferredOp,
    MAX_DEFERRED_CHAIN, boxed_hook,
};
use crate::store::PageLinkStore;
use crate::template::{LinkContext, Template, TemplateSource, create_clip, create_link};

/// Outcome of [`Pagination::handle_activation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationResult {
    /// Wrong gesture, or the target is not inside a visible page link.
    Ignored,
    /// The page became active.
    Selected(usize),
    /// The page was already active; nothing changed.
    AlreadyActive(usize),
    /// The change hook cancelled the switch.
    Vetoed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveChange {
    Unchanged,
    Vetoed,
    Changed,
}

/// A row of page links over a bounded page sequence.
pub struct Pagination<S: Surface = NodeSurface> {
    surface: S,
    store: PageLinkStore,
    state: PaginationState,
    link_template: Template<LinkContext>,
    clip_template: Template<ClipSide>,
    left_clip: NodeId,
    right_clip: NodeId,
    active_class: String,
    on_change: Option<ChangeHook>,
    /// Nodes attached by the last rebuild, in display order.
    attached: Vec<NodeId>,
    deferred: Deferred,
}

impl Pagination<NodeSurface> {
    /// Pagination on a fresh [`NodeSurface`] using `options`.
    #[must_use]
    pub fn new(options: PaginationOptions) -> Self {
        let surface = NodeSurface::new().with_activation(options.activation);
        Self::builder(surface).options(options).build()
    }
}

impl Default for Pagination<NodeSurface> {
    fn default() -> Self {
        Self::new(PaginationOptions::default())
    }
}

impl<S: Surface> Pagination<S> {
    /// Start building a pagination that drives `surface`.
    pub fn builder(surface: S) -> PaginationBuilder<S> {
        PaginationBuilder {
            surface,
            options: PaginationOptions::default(),
            link_template: None,
            clip_template: None,
            on_change: None,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Page count.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.state.length
    }

    /// Active page index.
    #[must_use]
    pub const fn active(&self) -> usize {
        self.state.active
    }

    /// Pages pinned at the start.
    #[must_use]
    pub const fn lead_length(&self) -> usize {
        self.state.lead_length
    }

    /// Pages pinned at the end.
    #[must_use]
    pub const fn trail_length(&self) -> usize {
        self.state.trail_length
    }

    /// Half-width of the band around the active page.
    #[must_use]
    pub const fn radius(&self) -> usize {
        self.state.radius
    }

    /// Current parameter snapshot.
    #[must_use]
    pub const fn state(&self) -> PaginationState {
        self.state
    }

    /// Slots the surface shows for the current state.
    #[must_use]
    pub fn window(&self) -> Window {
        self.state.window()
    }

    /// Class toggled on the active link.
    #[must_use]
    pub fn active_class(&self) -> &str {
        &self.active_class
    }

    /// Link handle for `index`, if it was ever created.
    #[must_use]
    pub fn link(&self, index: usize) -> Option<NodeId> {
        self.store.get(index)
    }

    /// Clip handle for `side`.
    #[must_use]
    pub const fn clip(&self, side: ClipSide) -> NodeId {
        match side {
            ClipSide::Left => self.left_clip,
            ClipSide::Right => self.right_clip,
        }
    }

    /// Page index a link handle stands for.
    #[must_use]
    pub fn index_of(&self, node: NodeId) -> Option<usize> {
        self.store.index_of(node)
    }

    /// Link handle store.
    #[must_use]
    pub const fn store(&self) -> &PageLinkStore {
        &self.store
    }

    /// The driven surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The driven surface, mutably. Attaching or detaching nodes behind the
    /// pagination's back is undone by the next rebuild.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Node arena the handles live in.
    #[must_use]
    pub fn document(&self) -> &Document {
        self.surface.document()
    }

    /// Node arena, mutably; used to build template nodes.
    pub fn document_mut(&mut self) -> &mut Document {
        self.surface.document_mut()
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Set the page count (floor of one).
    ///
    /// Growing creates links for the new pages; shrinking detaches links
    /// past the end but keeps them for reuse. An active index that falls
    /// off the end is moved to the last page, and the change hook is told
    /// but cannot cancel it. Returns whether the count changed.
    pub fn set_length(&mut self, length: impl PageNumber) -> bool {
        let changed = self.apply_length(clamp_length(length.to_page_number()));
        self.drain_deferred();
        changed
    }

    /// Set the active index, clamped into `[0, length)`.
    ///
    /// Returns whether the active index changed; `false` when it already
    /// had that value or the change hook cancelled it.
    pub fn set_active(&mut self, index: impl PageNumber) -> bool {
        let to = clamp_index(index.to_page_number(), self.state.length);
        self.select(to, ChangeCause::Api)
    }

    /// Move to the next page. No-op on the last page.
    pub fn next(&mut self) -> bool {
        let to = (self.state.active + 1).min(self.state.length - 1);
        self.select(to, ChangeCause::Api)
    }

    /// Move to the previous page. No-op on the first page.
    pub fn previous(&mut self) -> bool {
        let to = self.state.active.saturating_sub(1);
        self.select(to, ChangeCause::Api)
    }

    /// Set the number of pages pinned at the start.
    pub fn set_lead_length(&mut self, lead_length: impl PageNumber) -> bool {
        let value = clamp_count(lead_length.to_page_number());
        self.update_range("lead_length", value, |state| &mut state.lead_length)
    }

    /// Set the number of pages pinned at the end.
    pub fn set_trail_length(&mut self, trail_length: impl PageNumber) -> bool {
        let value = clamp_count(trail_length.to_page_number());
        self.update_range("trail_length", value, |state| &mut state.trail_length)
    }

    /// Set the half-width of the band around the active page.
    pub fn set_radius(&mut self, radius: impl PageNumber) -> bool {
        let value = clamp_count(radius.to_page_number());
        self.update_range("radius", value, |state| &mut state.radius)
    }

    /// Replace the link template.
    ///
    /// Links that already exist keep their look; only links created later
    /// (for pages past the largest count set so far) use the new template.
    pub fn set_link_template(&mut self, source: impl Into<TemplateSource<LinkContext>>) {
        let doc = self.surface.document_mut();
        let template = Template::resolve(doc, source.into());
        let old = std::mem::replace(&mut self.link_template, template);
        old.release(doc);
    }

    /// Replace the clip template and regenerate both clips.
    pub fn set_clip_template(&mut self, source: impl Into<TemplateSource<ClipSide>>) {
        let doc = self.surface.document_mut();
        let template = Template::resolve(doc, source.into());
        let left = create_clip(doc, &template, ClipSide::Left);
        let right = create_clip(doc, &template, ClipSide::Right);

        let old_template = std::mem::replace(&mut self.clip_template, template);
        let old_left = std::mem::replace(&mut self.left_clip, left);
        let old_right = std::mem::replace(&mut self.right_clip, right);
        self.rebuild();

        let doc = self.surface.document_mut();
        doc.discard(old_left);
        doc.discard(old_right);
        old_template.release(doc);
    }

    /// Replace the class toggled on the active link and re-mark it.
    ///
    /// A blank class is ignored. Returns whether the class changed.
    pub fn set_active_class(&mut self, class: impl Into<String>) -> bool {
        let class: String = class.into();
        let class = class.trim();
        if class.is_empty() || class == self.active_class {
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "pagination.active_class", class);

        let doc = self.surface.document_mut();
        for (_, link) in self.store.iter() {
            doc.toggle_class(link, &self.active_class, false);
        }
        self.active_class = class.to_owned();
        self.rebuild();
        true
    }

    /// Install, replace or (with `None`) remove the change hook.
    pub fn set_on_change(&mut self, hook: Option<ChangeHook>) {
        self.on_change = hook;
    }

    /// React to a user gesture on the surface.
    ///
    /// The gesture must be the surface's activation kind, and the target
    /// must be a visible page link or lie inside one.
    pub fn handle_activation(&mut self, activation: &Activation) -> ActivationResult {
        if activation.kind != self.surface.activation_kind() {
            return ActivationResult::Ignored;
        }
        let doc = self.surface.document();
        let hit = std::iter::once(activation.target)
            .chain(doc.ancestors(activation.target))
            .find_map(|node| self.store.index_of(node).map(|index| (node, index)));
        let Some((link, index)) = hit else {
            return ActivationResult::Ignored;
        };
        if index >= self.state.length || !self.surface.is_attached(link) {
            return ActivationResult::Ignored;
        }
        if index == self.state.active {
            return ActivationResult::AlreadyActive(index);
        }

        let change = self.change_active(index, ChangeCause::Activation);
        self.drain_deferred();
        if change == ActiveChange::Vetoed {
            ActivationResult::Vetoed(index)
        } else {
            ActivationResult::Selected(index)
        }
    }

    /// Reconcile the surface with the current window.
    ///
    /// Detaches everything the previous pass attached, attaches the
    /// window's slots in order, and flags the active link. Does nothing if
    /// the active link does not exist yet.
    pub fn rebuild(&mut self) {
        if self.store.get(self.state.active).is_none() {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "pagination.rebuild",
            length = self.state.length,
            active = self.state.active,
            slots = tracing::field::Empty,
        )
        .entered();

        for node in self.attached.drain(..) {
            self.surface.detach(node);
        }

        for slot in self.state.window().slots() {
            let node = match *slot {
                Slot::Page(index) => match self.store.get(index) {
                    Some(link) => link,
                    None => continue,
                },
                Slot::Clip(ClipSide::Left) => self.left_clip,
                Slot::Clip(ClipSide::Right) => self.right_clip,
            };
            self.surface.attach(node, None);
            self.attached.push(node);
        }

        let doc = self.surface.document_mut();
        for &node in &self.attached {
            if let Some(index) = self.store.index_of(node) {
                doc.toggle_class(node, &self.active_class, index == self.state.active);
            }
        }

        #[cfg(feature = "tracing")]
        _span.record("slots", self.attached.len());
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn select(&mut self, to: usize, cause: ChangeCause) -> bool {
        let change = self.change_active(to, cause);
        self.drain_deferred();
        change == ActiveChange::Changed
    }

    fn change_active(&mut self, to: usize, cause: ChangeCause) -> ActiveChange {
        let from = self.state.active;
        if to == from {
            return ActiveChange::Unchanged;
        }
        let request = ChangeRequest { from, to, cause };
        if let Some(hook) = self.on_change.as_mut()
            && hook(&request, &mut self.deferred) == ChangeVerdict::Abort
        {
            if request.is_vetoable() {
                #[cfg(feature = "tracing")]
                tracing::debug!(message = "pagination.veto", from, to, cause = ?cause);
                return ActiveChange::Vetoed;
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "pagination.veto.overridden",
                from,
                to,
                cause = ?cause
            );
        }

        let doc = self.surface.document_mut();
        if let Some(old) = self.store.get(from) {
            doc.toggle_class(old, &self.active_class, false);
        }
        self.state.active = to;
        if let Some(new) = self.store.get(to) {
            doc.toggle_class(new, &self.active_class, true);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "pagination.switch", from, to, cause = ?cause);

        self.rebuild();
        ActiveChange::Changed
    }

    fn apply_length(&mut self, length: usize) -> bool {
        let old = self.state.length;
        if length == old {
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "pagination.length", from = old, to = length);

        self.state.length = length;
        if length > old {
            self.ensure_links(length);
        } else {
            for index in length..old {
                if let Some(link) = self.store.get(index) {
                    self.surface.detach(link);
                }
            }
        }

        if self.state.active >= length {
            self.change_active(length - 1, ChangeCause::Length);
        } else {
            self.rebuild();
        }
        true
    }

    /// Create links for every index below `upto` that has none yet.
    fn ensure_links(&mut self, upto: usize) {
        let state = self.state;
        let doc = self.surface.document_mut();
        let template = &self.link_template;
        for index in 0..upto {
            self.store.get_or_create(index, |index| {
                create_link(doc, template, &LinkContext { index, state })
            });
        }
    }

    fn update_range(
        &mut self,
        _name: &'static str,
        value: usize,
        field: impl FnOnce(&mut PaginationState) -> &mut usize,
    ) -> bool {
        let slot = field(&mut self.state);
        if *slot == value {
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "pagination.range",
            field = _name,
            from = *slot,
            to = value
        );
        *slot = value;
        self.rebuild();
        true
    }

    /// Apply requests the change hook queued, oldest chain link first.
    fn drain_deferred(&mut self) {
        for _ in 0..MAX_DEFERRED_CHAIN {
            let Some(op) = self.deferred.take() else {
                return;
            };
            match op {
                DeferredOp::SetActive(raw) => {
                    let to = clamp_index(raw, self.state.length);
                    self.change_active(to, ChangeCause::Deferred);
                }
                DeferredOp::SetLength(raw) => {
                    self.apply_length(clamp_length(raw));
                }
            }
        }
        if let Some(_dropped) = self.deferred.take() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                message = "pagination.deferred.dropped",
                op = ?_dropped,
                limit = MAX_DEFERRED_CHAIN,
            );
        }
    }
}

impl<S: Surface + fmt::Debug> fmt::Debug for Pagination<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pagination")
            .field("state", &self.state)
            .field("links", &self.store.created())
            .field("attached", &self.attached)
            .field("link_template", &self.link_template)
            .field("clip_template", &self.clip_template)
            .field("active_class", &self.active_class)
            .field("on_change", &self.on_change.is_some())
            .field("surface", &self.surface)
            .finish()
    }
}

/// Builder for [`Pagination`].
pub struct PaginationBuilder<S: Surface> {
    surface: S,
    options: PaginationOptions,
    link_template: Option<TemplateSource<LinkContext>>,
    clip_template: Option<TemplateSource<ClipSide>>,
    on_change: Option<ChangeHook>,
}

impl<S: Surface> PaginationBuilder<S> {
    /// Use `options` for the numbers, class and markup templates.
    #[must_use]
    pub fn options(mut self, options: PaginationOptions) -> Self {
        self.options = options;
        self
    }

    /// Link template, overriding the one in the options.
    #[must_use]
    pub fn link_template(mut self, source: impl Into<TemplateSource<LinkContext>>) -> Self {
        self.link_template = Some(source.into());
        self
    }

    /// Clip template, overriding the one in the options.
    #[must_use]
    pub fn clip_template(mut self, source: impl Into<TemplateSource<ClipSide>>) -> Self {
        self.clip_template = Some(source.into());
        self
    }

    /// Hook told about every active-index change before it happens.
    ///
    /// Return `()` to observe only, `false` or [`ChangeVerdict::Abort`] to
    /// cancel.
    #[must_use]
    pub fn on_change<F, V>(mut self, hook: F) -> Self
    where
        F: FnMut(&ChangeRequest, &mut Deferred) -> V + 'static,
        V: Into<ChangeVerdict>,
    {
        self.on_change = Some(boxed_hook(hook));
        self
    }

    /// Create every link for the initial page count and render.
    ///
    /// Without a link template from the builder or the options, the first
    /// element already on the surface is taken as the template. The change
    /// hook is not called during construction.
    pub fn build(self) -> Pagination<S> {
        let options = self.options.validated();
        let state = options.state();
        let mut surface = self.surface;

        let link_source = match (self.link_template, options.link_template.clone()) {
            (Some(source), _) => source,
            (None, Some(markup)) => TemplateSource::Markup(markup),
            (None, None) => first_element(&surface)
                .map_or(TemplateSource::Default, TemplateSource::Node),
        };
        let doc = surface.document_mut();
        let clip_source = self
            .clip_template
            .unwrap_or_else(|| TemplateSource::Markup(options.clip_template.clone()));
        let link_template = Template::resolve(doc, link_source);
        let clip_template = Template::resolve(doc, clip_source);
        let left_clip = create_clip(doc, &clip_template, ClipSide::Left);
        let right_clip = create_clip(doc, &clip_template, ClipSide::Right);

        let mut pagination = Pagination {
            surface,
            store: PageLinkStore::new(),
            state,
            link_template,
            clip_template,
            left_clip,
            right_clip,
            active_class: options.active_class,
            on_change: self.on_change,
            attached: Vec::new(),
            deferred: Deferred::default(),
        };
        pagination.ensure_links(state.length);
        pagination.rebuild();
        pagination
    }
}

/// First element the surface already shows.
fn first_element<S: Surface>(surface: &S) -> Option<NodeId> {
    let doc = surface.document();
    surface
        .attached()
        .into_iter()
        .find(|&node| doc.is_element(node))
}
