#![forbid(unsafe_code)]

//! Activation event kinds.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The user gesture that activates a page link.
///
/// Chosen once by the host (touch-capable surfaces usually want
/// [`ActivationKind::TouchEnd`]) and handed to the pagination at
/// construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActivationKind {
    /// Pointer click.
    #[default]
    Click,
    /// End of a touch gesture.
    TouchEnd,
}

impl ActivationKind {
    /// Event name as used by DOM-like hosts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::TouchEnd => "touchend",
        }
    }

    /// Pick the gesture for a host that does or does not support touch.
    #[must_use]
    pub const fn for_touch_support(touch: bool) -> Self {
        if touch { Self::TouchEnd } else { Self::Click }
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("click") {
            Ok(Self::Click)
        } else if name.eq_ignore_ascii_case("touchend") {
            Ok(Self::TouchEnd)
        } else {
            Err(ConfigError::UnknownActivationEvent {
                name: name.to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        let parsed = "click".parse::<ActivationKind>().ok();
        assert_eq!(parsed, Some(ActivationKind::Click));
        assert_eq!(
            " TouchEnd ".parse::<ActivationKind>().ok(),
            Some(ActivationKind::TouchEnd)
        );
        let err = "hover".parse::<ActivationKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown activation event: hover");
    }

    #[test]
    fn touch_support_picks_touchend() {
        let kind = ActivationKind::for_touch_support(true);
        assert_eq!(kind, ActivationKind::TouchEnd);
        assert_eq!(ActivationKind::for_touch_support(false).name(), "click");
    }
}
