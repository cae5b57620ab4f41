//! Zero-argument actions
//!
//! Actions are free functions, associated functions, or `&self` methods on an
//! owner type. Methods need an instance, which is resolved through
//! [`ActionOwner`]: first the owner's current/singleton instance, then a
//! freshly constructed one.

use std::fmt::Display;
use std::ops::Deref;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::{panic_message, TweakError, TweakResult};

/// Result of running an action
pub type ActionResult = TweakResult<()>;

/// Type-erased action callable
pub type ActionFn = Arc<dyn Fn() -> ActionResult + Send + Sync>;

/// Values an action may return
pub trait ActionOutcome {
    fn into_result(self) -> ActionResult;
}

impl ActionOutcome for () {
    fn into_result(self) -> ActionResult {
        Ok(())
    }
}

impl<E: Display> ActionOutcome for Result<(), E> {
    fn into_result(self) -> ActionResult {
        self.map_err(|e| TweakError::InvocationFailure(e.to_string()))
    }
}

/// Instance resolution for types with `&self` actions
///
/// ```ignore
/// impl ActionOwner for Inventory {
///     fn current() -> Option<Arc<Self>> {
///         INVENTORY.get().cloned()
///     }
/// }
/// ```
pub trait ActionOwner: Sized + Send + Sync + 'static {
    /// The live singleton, if the type exposes one
    fn current() -> Option<Arc<Self>> {
        None
    }

    /// A default-constructed instance, if the type supports one
    fn construct() -> Option<Self> {
        None
    }
}

/// A resolved action receiver
pub enum Instance<T> {
    Shared(Arc<T>),
    Owned(T),
}

impl<T> Deref for Instance<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self {
            Self::Shared(shared) => shared,
            Self::Owned(owned) => owned,
        }
    }
}

/// Locate an instance of `T` to call a `&self` action on
pub fn resolve_instance<T: ActionOwner>(owner: &str) -> TweakResult<Instance<T>> {
    if let Some(current) = T::current() {
        return Ok(Instance::Shared(current));
    }
    if let Some(constructed) = T::construct() {
        tracing::debug!("Constructed a fresh '{}' for action", owner);
        return Ok(Instance::Owned(constructed));
    }
    Err(TweakError::InstanceUnresolved {
        owner: owner.to_string(),
    })
}

/// Run an action body and normalise its return value
pub fn run<O, F>(f: F) -> ActionResult
where
    O: ActionOutcome,
    F: FnOnce() -> O,
{
    f().into_result()
}

/// Wrap a closure as an [`ActionFn`]
pub fn action_fn<O, F>(f: F) -> ActionFn
where
    O: ActionOutcome,
    F: Fn() -> O + Send + Sync + 'static,
{
    Arc::new(move || f().into_result())
}

/// Invoke an action, turning a panic into [`TweakError::InvocationFailure`]
pub fn invoke(action: &ActionFn) -> ActionResult {
    match catch_unwind(AssertUnwindSafe(|| action())) {
        Ok(result) => result,
        Err(payload) => Err(TweakError::InvocationFailure(panic_message(payload.as_ref()))),
    }
}
