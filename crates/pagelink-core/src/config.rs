#![forbid(unsafe_code)]

//! Construction options.
//!
//! Options can be built in code, read from a JSON document that uses the
//! public option names (`leadLength`, `activeRange`, ...), or overlaid from
//! environment variables. Numbers are coerced the same way the pagination
//! setters coerce them, so `"5"`, `5.7` and `5` are equivalent.
//!
//! # JSON
//!
//! ```
//! use pagelink_core::config::PaginationOptions;
//!
//! let opts = PaginationOptions::from_json(
//!     r#"{ "length": "12", "active": 4, "startRange": 2, "activeRange": 1 }"#,
//! )
//! .unwrap();
//! assert_eq!(opts.length, 12);
//! assert_eq!(opts.active, 4);
//! assert_eq!(opts.lead_length, 2);
//! assert_eq!(opts.radius, 1);
//! ```
//!
//! # Environment
//!
//! [`PaginationOptions::from_env`] reads:
//! - `PAGELINK_LENGTH`
//! - `PAGELINK_ACTIVE`
//! - `PAGELINK_LEAD_LENGTH`
//! - `PAGELINK_TRAIL_LENGTH`
//! - `PAGELINK_RADIUS`
//! - `PAGELINK_ACTIVE_CLASS`
//! - `PAGELINK_ACTIVATION_EVENT` (`click` or `touchend`)

use serde::Deserialize;

use crate::coerce::{PageNumber, clamp_count, clamp_index, clamp_length};
use crate::error::{ConfigError, Result};
use crate::event::ActivationKind;
use crate::state::{
    DEFAULT_ACTIVE, DEFAULT_LEAD_LENGTH, DEFAULT_LENGTH, DEFAULT_RADIUS, DEFAULT_TRAIL_LENGTH,
    PaginationState,
};

/// Markup used for truncation indicators unless configured otherwise.
pub const DEFAULT_CLIP_MARKUP: &str = "&hellip;";
/// Class toggled on the active link.
pub const DEFAULT_ACTIVE_CLASS: &str = "active";

/// Options recognized when constructing a pagination.
///
/// Deserializing through serde reports a bad `activationEvent` as a
/// deserializer error; [`Self::from_json`] reports it as
/// [`ConfigError::UnknownActivationEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawOptions")]
pub struct PaginationOptions {
    /// Initial page count.
    pub length: usize,
    /// Initial active index.
    pub active: usize,
    /// Pages pinned at the start.
    pub lead_length: usize,
    /// Pages pinned at the end.
    pub trail_length: usize,
    /// Half-width of the band around the active page.
    pub radius: usize,
    /// Markup for page links. `None` uses a plain numbered anchor.
    pub link_template: Option<String>,
    /// Markup for truncation indicators.
    pub clip_template: String,
    /// Class toggled on the active link.
    pub active_class: String,
    /// Gesture that activates a link.
    pub activation: ActivationKind,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            active: DEFAULT_ACTIVE,
            lead_length: DEFAULT_LEAD_LENGTH,
            trail_length: DEFAULT_TRAIL_LENGTH,
            radius: DEFAULT_RADIUS,
            link_template: None,
            clip_template: DEFAULT_CLIP_MARKUP.to_owned(),
            active_class: DEFAULT_ACTIVE_CLASS.to_owned(),
            activation: ActivationKind::default(),
        }
    }
}

impl PaginationOptions {
    /// Set the initial page count (floor of one).
    #[must_use]
    pub fn with_length(mut self, length: impl PageNumber) -> Self {
        self.length = clamp_length(length.to_page_number());
        self
    }

    /// Set the initial active index. Clamped by [`Self::validated`].
    #[must_use]
    pub fn with_active(mut self, active: impl PageNumber) -> Self {
        self.active = clamp_count(active.to_page_number());
        self
    }

    /// Set the number of pages pinned at the start.
    #[must_use]
    pub fn with_lead_length(mut self, lead_length: impl PageNumber) -> Self {
        self.lead_length = clamp_count(lead_length.to_page_number());
        self
    }

    /// Set the number of pages pinned at the end.
    #[must_use]
    pub fn with_trail_length(mut self, trail_length: impl PageNumber) -> Self {
        self.trail_length = clamp_count(trail_length.to_page_number());
        self
    }

    /// Set the half-width of the band around the active page.
    #[must_use]
    pub fn with_radius(mut self, radius: impl PageNumber) -> Self {
        self.radius = clamp_count(radius.to_page_number());
        self
    }

    /// Set the page link markup.
    #[must_use]
    pub fn with_link_template(mut self, markup: impl Into<String>) -> Self {
        self.link_template = Some(markup.into());
        self
    }

    /// Set the truncation indicator markup.
    #[must_use]
    pub fn with_clip_template(mut self, markup: impl Into<String>) -> Self {
        self.clip_template = markup.into();
        self
    }

    /// Set the class toggled on the active link.
    #[must_use]
    pub fn with_active_class(mut self, class: impl Into<String>) -> Self {
        self.active_class = class.into();
        self
    }

    /// Set the activation gesture.
    #[must_use]
    pub fn with_activation(mut self, activation: ActivationKind) -> Self {
        self.activation = activation;
        self
    }

    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawOptions = serde_json::from_str(json)?;
        Ok(Self::try_from(raw)?.validated())
    }

    /// Load options from `PAGELINK_*` environment variables over the
    /// defaults. Malformed values degrade instead of failing.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`], reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();

        if let Some(val) = lookup("PAGELINK_LENGTH") {
            opts = opts.with_length(val.as_str());
        }
        if let Some(val) = lookup("PAGELINK_ACTIVE") {
            opts = opts.with_active(val.as_str());
        }
        if let Some(val) = lookup("PAGELINK_LEAD_LENGTH") {
            opts = opts.with_lead_length(val.as_str());
        }
        if let Some(val) = lookup("PAGELINK_TRAIL_LENGTH") {
            opts = opts.with_trail_length(val.as_str());
        }
        if let Some(val) = lookup("PAGELINK_RADIUS") {
            opts = opts.with_radius(val.as_str());
        }
        if let Some(val) = lookup("PAGELINK_ACTIVE_CLASS")
            && !val.trim().is_empty()
        {
            opts.active_class = val.trim().to_owned();
        }
        if let Some(val) = lookup("PAGELINK_ACTIVATION_EVENT") {
            match val.parse::<ActivationKind>() {
                Ok(kind) => opts.activation = kind,
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(message = "pagination.config.ignored", error = %_err);
                }
            }
        }

        opts.validated()
    }

    /// Clamp every number into range: `length >= 1`, `active < length`.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.length = self.length.max(1);
        self.active = clamp_index(self.active.to_page_number(), self.length);
        self
    }

    /// Parameter snapshot these options describe.
    #[must_use]
    pub fn state(&self) -> PaginationState {
        let opts = self.clone().validated();
        PaginationState {
            length: opts.length,
            active: opts.active,
            lead_length: opts.lead_length,
            trail_length: opts.trail_length,
            radius: opts.radius,
        }
    }
}

/// Wire shape of [`PaginationOptions`], before coercion.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawOptions {
    length: Option<serde_json::Value>,
    active: Option<serde_json::Value>,
    #[serde(alias = "startRange", alias = "startLength")]
    lead_length: Option<serde_json::Value>,
    #[serde(alias = "endRange", alias = "endLength")]
    trail_length: Option<serde_json::Value>,
    #[serde(alias = "activeRange", alias = "activeLength")]
    radius: Option<serde_json::Value>,
    link_template: Option<String>,
    clip_template: Option<String>,
    active_class: Option<String>,
    activation_event: Option<String>,
}

impl TryFrom<RawOptions> for PaginationOptions {
    type Error = ConfigError;

    fn try_from(raw: RawOptions) -> std::result::Result<Self, Self::Error> {
        let mut opts = Self::default();
        // JSON `null` keeps the default, like an absent key.
        let present = |v: Option<serde_json::Value>| v.filter(|v| !v.is_null());

        if let Some(v) = present(raw.length) {
            opts = opts.with_length(v);
        }
        if let Some(v) = present(raw.active) {
            opts = opts.with_active(v);
        }
        if let Some(v) = present(raw.lead_length) {
            opts = opts.with_lead_length(v);
        }
        if let Some(v) = present(raw.trail_length) {
            opts = opts.with_trail_length(v);
        }
        if let Some(v) = present(raw.radius) {
            opts = opts.with_radius(v);
        }
        opts.link_template = raw.link_template.filter(|s| !s.is_empty());
        if let Some(clip) = raw.clip_template {
            opts.clip_template = clip;
        }
        if let Some(class) = raw.active_class.filter(|s| !s.trim().is_empty()) {
            opts.active_class = class;
        }
        if let Some(name) = raw.activation_event {
            opts.activation = name.parse()?;
        }
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_public_contract() {
        let opts = PaginationOptions::default();
        assert_eq!(opts.length, 20);
        assert_eq!(opts.active, 0);
        assert_eq!(opts.lead_length, 1);
        assert_eq!(opts.trail_length, 1);
        assert_eq!(opts.radius, 2);
        assert_eq!(opts.clip_template, "&hellip;");
        assert_eq!(opts.active_class, "active");
        assert_eq!(opts.activation, ActivationKind::Click);
        assert!(opts.link_template.is_none());
    }

    #[test]
    fn json_accepts_primary_names() {
        let opts = PaginationOptions::from_json(
            r#"{
                "length": 50,
                "active": 7,
                "leadLength": 2,
                "trailLength": 3,
                "radius": 4,
                "linkTemplate": "<li><a href='#'></a></li>",
                "clipTemplate": "<span>...</span>",
                "activeClass": "current",
                "activationEvent": "touchend"
            }"#,
        )
        .unwrap();
        assert_eq!(opts.length, 50);
        assert_eq!(opts.active, 7);
        assert_eq!(opts.lead_length, 2);
        assert_eq!(opts.trail_length, 3);
        assert_eq!(opts.radius, 4);
        let link = opts.link_template.as_deref();
        assert_eq!(link, Some("<li><a href='#'></a></li>"));
        assert_eq!(opts.clip_template, "<span>...</span>");
        assert_eq!(opts.active_class, "current");
        assert_eq!(opts.activation, ActivationKind::TouchEnd);
    }

    #[test]
    fn json_accepts_legacy_aliases() {
        let opts =
            PaginationOptions::from_json(r#"{ "startRange": 3, "endRange": 0, "activeRange": 1 }"#)
                .unwrap();
        assert_eq!(opts.lead_length, 3);
        assert_eq!(opts.trail_length, 0);
        assert_eq!(opts.radius, 1);
    }

    #[test]
    fn json_accepts_length_aliases() {
        let opts = PaginationOptions::from_json(
            r#"{ "startLength": 2, "endLength": "4", "activeLength": 0 }"#,
        )
        .unwrap();
        assert_eq!(opts.lead_length, 2);
        assert_eq!(opts.trail_length, 4);
        assert_eq!(opts.radius, 0);
    }

    #[test]
    fn json_numbers_are_coerced_and_clamped() {
        let opts = PaginationOptions::from_json(
            r#"{ "length": "0", "active": 99.9, "radius": -4, "leadLength": null }"#,
        )
        .unwrap();
        assert_eq!(opts.length, 1);
        assert_eq!(opts.active, 0);
        assert_eq!(opts.radius, 0);
        assert_eq!(opts.lead_length, 1);
    }

    #[test]
    fn json_active_clamped_to_length() {
        let opts = PaginationOptions::from_json(r#"{ "length": 10, "active": 999 }"#).unwrap();
        assert_eq!(opts.active, 9);
    }

    #[test]
    fn json_rejects_unknown_activation_event() {
        let err = PaginationOptions::from_json(r#"{ "activationEvent": "hover" }"#).unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::UnknownActivationEvent { name } if name == "hover"
        ));
        assert_eq!(err.to_string(), "unknown activation event: hover");
    }

    #[test]
    fn serde_path_wraps_unknown_activation_event() {
        let err = serde_json::from_str::<PaginationOptions>(r#"{ "activationEvent": "hover" }"#)
            .unwrap_err();
        assert!(err.to_string().contains("hover"));
    }

    #[test]
    fn json_rejects_non_object() {
        assert!(matches!(
            PaginationOptions::from_json("42"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn lookup_overlays_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PAGELINK_LENGTH", "30"),
            ("PAGELINK_ACTIVE", "45"),
            ("PAGELINK_RADIUS", "nope"),
            ("PAGELINK_ACTIVE_CLASS", " selected "),
            ("PAGELINK_ACTIVATION_EVENT", "bogus"),
        ]);
        let opts = PaginationOptions::from_lookup(|key| env.get(key).map(|v| (*v).to_owned()));
        assert_eq!(opts.length, 30);
        assert_eq!(opts.active, 29);
        assert_eq!(opts.radius, 0);
        assert_eq!(opts.lead_length, 1);
        assert_eq!(opts.active_class, "selected");
        assert_eq!(opts.activation, ActivationKind::Click);
    }

    #[test]
    fn state_snapshot_is_validated() {
        let opts = PaginationOptions::default().with_length(5).with_active(8);
        let state = opts.state();
        assert_eq!(state.length, 5);
        assert_eq!(state.active, 4);
    }
}
