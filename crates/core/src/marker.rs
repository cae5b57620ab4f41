//! Declarative tweak markers
//!
//! Markers are the metadata attached to a tweakable member or action. The
//! `#[tweak]`, `#[tweak_action]` and `#[tweak_hook]` attributes expand into a
//! [`TweakRegistration`] submitted through `inventory`, so every marked item
//! in the final binary is discoverable without a central list.

use std::borrow::Cow;

use crate::action::ActionResult;
use crate::callback::Hook;
use crate::slot::ErasedMember;

/// Metadata for a value, dictionary or collection member
///
/// `min`/`max` use NaN for "no bound".
#[derive(Debug, Clone, PartialEq)]
pub struct MemberMarker {
    pub owner: Cow<'static, str>,
    pub name: Cow<'static, str>,
    pub label: Option<Cow<'static, str>>,
    pub category: Option<Cow<'static, str>>,
    pub min: f64,
    pub max: f64,
    /// Name of the change hook on the owner
    pub on_changed: Option<Cow<'static, str>>,
}

impl MemberMarker {
    pub fn new(owner: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            label: None,
            category: None,
            min: f64::NAN,
            max: f64::NAN,
            on_changed: None,
        }
    }

    pub fn label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn category(mut self, category: impl Into<Cow<'static, str>>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    pub fn bounds(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn on_changed(mut self, hook: impl Into<Cow<'static, str>>) -> Self {
        self.on_changed = Some(hook.into());
        self
    }
}

/// Metadata for a zero-argument action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMarker {
    pub owner: Cow<'static, str>,
    pub name: Cow<'static, str>,
    pub label: Option<Cow<'static, str>>,
    pub category: Option<Cow<'static, str>>,
}

impl ActionMarker {
    pub fn new(owner: impl Into<Cow<'static, str>>, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            label: None,
            category: None,
        }
    }

    pub fn label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn category(mut self, category: impl Into<Cow<'static, str>>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// One statically submitted marker
///
/// Constructed by the attribute macros; the function pointers defer all
/// work (and any panic) to scan time.
pub enum TweakRegistration {
    Member {
        marker: MemberMarker,
        member: fn() -> ErasedMember,
    },
    Action {
        marker: ActionMarker,
        action: fn() -> ActionResult,
    },
    Hook {
        owner: &'static str,
        name: &'static str,
        hook: fn() -> Hook,
    },
}

impl TweakRegistration {
    pub fn owner(&self) -> &str {
        match self {
            Self::Member { marker, .. } => &marker.owner,
            Self::Action { marker, .. } => &marker.owner,
            Self::Hook { owner, .. } => owner,
        }
    }
}

inventory::collect!(TweakRegistration);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_marker_defaults() {
        let marker = MemberMarker::new("App.Config", "Volume");
        assert!(marker.min.is_nan());
        assert!(marker.max.is_nan());
        assert!(marker.label.is_none());
        assert!(marker.on_changed.is_none());
    }

    #[test]
    fn test_member_marker_builder() {
        let marker = MemberMarker::new("App.Config", "Volume")
            .label("Master Volume")
            .category("Audio")
            .bounds(0.0, 1.0)
            .on_changed("OnVolumeChanged");
        assert_eq!(marker.label.as_deref(), Some("Master Volume"));
        assert_eq!(marker.category.as_deref(), Some("Audio"));
        assert_eq!((marker.min, marker.max), (0.0, 1.0));
        assert_eq!(marker.on_changed.as_deref(), Some("OnVolumeChanged"));
    }
}
