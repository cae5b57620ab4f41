//! Callback Invoker
//!
//! Change hooks are registered per owner under a name. Several hooks may
//! share a name, each with a fixed shape chosen when it is registered:
//!
//! - `(member, key, value)`
//! - `(member, value)`
//! - `(value)`
//! - `()`
//!
//! After a successful write the invoker tries the candidates in decreasing
//! arity and calls the first one whose key/value types match the written
//! values. A hook that panics is logged and suppressed; the write it reacts to
//! has already been applied.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::panic_message;

/// Arguments available to a change hook
pub struct HookArgs<'a> {
    /// Member name of the changed entry
    pub member: &'a str,
    /// Written key, for keyed dictionary writes
    pub key: Option<&'a dyn Any>,
    /// New value (the whole map for dictionaries)
    pub value: &'a dyn Any,
}

/// Returns `false` when the arguments do not fit the hook's parameter types
type HookFn = dyn Fn(&HookArgs<'_>) -> bool + Send + Sync;

/// A change hook with a fixed parameter shape
#[derive(Clone)]
pub struct Hook {
    arity: usize,
    call: Arc<HookFn>,
}

impl Hook {
    /// `()`
    pub fn nullary<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            arity: 0,
            call: Arc::new(move |_| {
                f();
                true
            }),
        }
    }

    /// `(value)`
    pub fn value<V, F>(f: F) -> Self
    where
        V: Any,
        F: Fn(&V) + Send + Sync + 'static,
    {
        Self {
            arity: 1,
            call: Arc::new(move |args| match args.value.downcast_ref::<V>() {
                Some(value) => {
                    f(value);
                    true
                }
                None => false,
            }),
        }
    }

    /// `(member, value)`
    pub fn member_value<V, F>(f: F) -> Self
    where
        V: Any,
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        Self {
            arity: 2,
            call: Arc::new(move |args| match args.value.downcast_ref::<V>() {
                Some(value) => {
                    f(args.member, value);
                    true
                }
                None => false,
            }),
        }
    }

    /// `(member, key, value)`, only matched by keyed dictionary writes
    pub fn member_key_value<K, V, F>(f: F) -> Self
    where
        K: Any,
        V: Any,
        F: Fn(&str, &K, &V) + Send + Sync + 'static,
    {
        Self {
            arity: 3,
            call: Arc::new(move |args| {
                let key = args.key.and_then(|k| k.downcast_ref::<K>());
                match (key, args.value.downcast_ref::<V>()) {
                    (Some(key), Some(value)) => {
                        f(args.member, key, value);
                        true
                    }
                    _ => false,
                }
            }),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl std::fmt::Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook").field("arity", &self.arity).finish()
    }
}

/// Outcome of a hook lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// A matching hook ran to completion
    Invoked,
    /// A matching hook panicked; the panic was suppressed
    Panicked,
    /// No hook with a matching shape
    NoMatch,
}

/// Hooks grouped by owner, then by name
#[derive(Clone, Default)]
pub struct HookTable {
    hooks: HashMap<String, HashMap<String, Vec<Hook>>>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook; earlier hooks with the same name are kept as overloads
    pub fn register(&mut self, owner: &str, name: &str, hook: Hook) {
        self.hooks
            .entry(owner.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default()
            .push(hook);
    }

    /// Total number of registered hooks
    pub fn len(&self) -> usize {
        self.hooks
            .values()
            .flat_map(|named| named.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke at most one hook named `name` on `owner`
    pub fn invoke(&self, owner: &str, name: &str, args: &HookArgs<'_>) -> HookOutcome {
        let Some(candidates) = self.hooks.get(owner).and_then(|named| named.get(name)) else {
            tracing::debug!("No hook '{}' on '{}'", name, owner);
            return HookOutcome::NoMatch;
        };

        let mut ordered: Vec<&Hook> = candidates.iter().collect();
        ordered.sort_by(|a, b| b.arity.cmp(&a.arity));

        for hook in ordered {
            match catch_unwind(AssertUnwindSafe(|| (hook.call)(args))) {
                Ok(true) => {
                    tracing::trace!("Invoked hook '{}::{}' (arity {})", owner, name, hook.arity);
                    return HookOutcome::Invoked;
                }
                Ok(false) => continue,
                Err(payload) => {
                    tracing::warn!(
                        "Hook '{}::{}' panicked: {}",
                        owner,
                        name,
                        panic_message(payload.as_ref())
                    );
                    return HookOutcome::Panicked;
                }
            }
        }

        tracing::debug!("No hook '{}' on '{}' accepts the written value", name, owner);
        HookOutcome::NoMatch
    }
}

impl std::fmt::Debug for HookTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookTable").field("count", &self.len()).finish()
    }
}
