//! Introspection Scanner
//!
//! Sources enumerate the tweakable items known to the process, grouped by
//! owner. Two sources ship with the crate:
//!
//! - [`InventorySource`]: every `#[tweak]`, `#[tweak_action]` and
//!   `#[tweak_hook]` marker linked into the binary
//! - [`TweakSet`]: members, actions and hooks registered explicitly at startup
//!
//! Materialising one owner's items must never abort the scan. A panic while
//! doing so skips that owner and is logged.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::action::{action_fn, ActionFn, ActionOutcome};
use crate::callback::Hook;
use crate::error::panic_message;
use crate::marker::{ActionMarker, MemberMarker, TweakRegistration};
use crate::slot::{erase_accessor, erase_static, Accessor, CellRef, ErasedMember, TweakShape};

/// One item found on an owner
#[derive(Clone)]
pub enum Discovered {
    Member(MemberMarker, ErasedMember),
    Action(ActionMarker, ActionFn),
    Hook {
        name: Cow<'static, str>,
        hook: Hook,
    },
}

impl std::fmt::Debug for Discovered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member(marker, member) => f.debug_tuple("Member").field(&marker.name).field(member).finish(),
            Self::Action(marker, _) => f.debug_tuple("Action").field(&marker.name).finish(),
            Self::Hook { name, hook } => f.debug_tuple("Hook").field(name).field(hook).finish(),
        }
    }
}

/// Everything found on one owner
#[derive(Debug, Clone)]
pub struct OwnerScan {
    pub owner: String,
    pub items: Vec<Discovered>,
}

/// Something that can enumerate tweakable items
pub trait TweakSource: Send + Sync {
    fn scan(&self) -> Vec<OwnerScan>;
}

/// Scans the markers submitted through `inventory`
#[derive(Debug, Clone, Default)]
pub struct InventorySource {
    prefix: Option<String>,
}

impl InventorySource {
    /// Every marker in the binary
    pub fn all() -> Self {
        Self::default()
    }

    /// Only owners whose name starts with `prefix`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn accepts(&self, owner: &str) -> bool {
        self.prefix
            .as_deref()
            .map_or(true, |prefix| owner.starts_with(prefix))
    }
}

impl TweakSource for InventorySource {
    fn scan(&self) -> Vec<OwnerScan> {
        let mut by_owner: BTreeMap<&str, Vec<&TweakRegistration>> = BTreeMap::new();
        for registration in inventory::iter::<TweakRegistration> {
            if self.accepts(registration.owner()) {
                by_owner
                    .entry(registration.owner())
                    .or_default()
                    .push(registration);
            }
        }

        let mut scans = Vec::with_capacity(by_owner.len());
        for (owner, mut registrations) in by_owner {
            // inventory yields items in an unspecified order
            registrations.sort_by(|a, b| registration_name(a).cmp(registration_name(b)));

            match catch_unwind(AssertUnwindSafe(|| {
                registrations
                    .iter()
                    .map(|r| materialize(r))
                    .collect::<Vec<_>>()
            })) {
                Ok(items) => scans.push(OwnerScan {
                    owner: owner.to_string(),
                    items,
                }),
                Err(payload) => {
                    tracing::warn!(
                        "Skipping tweak owner '{}': {}",
                        owner,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        scans
    }
}

fn registration_name(registration: &TweakRegistration) -> &str {
    match registration {
        TweakRegistration::Member { marker, .. } => &marker.name,
        TweakRegistration::Action { marker, .. } => &marker.name,
        TweakRegistration::Hook { name, .. } => name,
    }
}

fn materialize(registration: &TweakRegistration) -> Discovered {
    match registration {
        TweakRegistration::Member { marker, member } => Discovered::Member(marker.clone(), member()),
        TweakRegistration::Action { marker, action } => {
            let action: ActionFn = Arc::new(*action);
            Discovered::Action(marker.clone(), action)
        }
        TweakRegistration::Hook { name, hook, .. } => Discovered::Hook {
            name: Cow::Borrowed(*name),
            hook: hook(),
        },
    }
}

/// Explicit registration for one owner
///
/// ```ignore
/// static SPEED: TweakCell<f32> = TweakCell::new(5.0);
///
/// let set = TweakSet::new("Game.Player")
///     .cell("Speed", &SPEED, |m| m.label("Move Speed").bounds(0.0, 100.0))
///     .action("Respawn", respawn, |a| a.category("Debug"))
///     .hook("OnSpeedChanged", Hook::value::<f32, _>(|v| tracing::info!("speed {}", v)));
/// ```
#[derive(Debug, Clone)]
pub struct TweakSet {
    owner: Cow<'static, str>,
    items: Vec<Discovered>,
}

impl TweakSet {
    pub fn new(owner: impl Into<Cow<'static, str>>) -> Self {
        Self {
            owner: owner.into(),
            items: Vec::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Register an already-erased member
    pub fn member(
        mut self,
        name: impl Into<Cow<'static, str>>,
        member: ErasedMember,
        configure: impl FnOnce(MemberMarker) -> MemberMarker,
    ) -> Self {
        let marker = configure(MemberMarker::new(self.owner.clone(), name));
        self.items.push(Discovered::Member(marker, member));
        self
    }

    /// Register a `'static` cell (plain or behind `LazyLock`)
    pub fn cell<C>(
        self,
        name: impl Into<Cow<'static, str>>,
        cell: &'static C,
        configure: impl FnOnce(MemberMarker) -> MemberMarker,
    ) -> Self
    where
        C: CellRef,
        C::Value: TweakShape,
    {
        self.member(name, erase_static(cell), configure)
    }

    /// Register a getter/setter pair
    pub fn accessor<T: TweakShape>(
        self,
        name: impl Into<Cow<'static, str>>,
        accessor: Accessor<T>,
        configure: impl FnOnce(MemberMarker) -> MemberMarker,
    ) -> Self {
        self.member(name, erase_accessor(accessor), configure)
    }

    /// Register a zero-argument action
    pub fn action<O, F>(
        mut self,
        name: impl Into<Cow<'static, str>>,
        action: F,
        configure: impl FnOnce(ActionMarker) -> ActionMarker,
    ) -> Self
    where
        O: ActionOutcome,
        F: Fn() -> O + Send + Sync + 'static,
    {
        let marker = configure(ActionMarker::new(self.owner.clone(), name));
        self.items.push(Discovered::Action(marker, action_fn(action)));
        self
    }

    /// Register a change hook under `name`
    pub fn hook(mut self, name: impl Into<Cow<'static, str>>, hook: Hook) -> Self {
        self.items.push(Discovered::Hook {
            name: name.into(),
            hook,
        });
        self
    }
}

impl TweakSource for TweakSet {
    fn scan(&self) -> Vec<OwnerScan> {
        vec![OwnerScan {
            owner: self.owner.to_string(),
            items: self.items.clone(),
        }]
    }
}

impl<S: TweakSource> TweakSource for Vec<S> {
    fn scan(&self) -> Vec<OwnerScan> {
        self.iter().flat_map(TweakSource::scan).collect()
    }
}
