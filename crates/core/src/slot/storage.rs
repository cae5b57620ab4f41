//! Storage abstraction behind tweakable members

/// Failure to write a storage slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The slot does not accept writes
    #[error("slot is not writable")]
    NotWritable,

    /// The current value could not be read for a read-modify-write
    #[error("current value is unavailable")]
    Unreadable,
}

/// Get/set access to one process-wide value
///
/// This is the only point where the registry reaches into host state.
pub trait Storage<T>: Send + Sync {
    /// Read the current value
    fn load(&self) -> Option<T>;

    /// Overwrite the current value
    fn store(&self, value: T) -> Result<(), StoreError>;

    /// Read-modify-write
    ///
    /// The default is a plain load followed by a store; cells override it to
    /// hold their write lock across the whole update.
    fn modify(&self, f: &mut dyn FnMut(&mut T)) -> Result<(), StoreError> {
        if !self.is_writable() {
            return Err(StoreError::NotWritable);
        }
        let mut value = self.load().ok_or(StoreError::Unreadable)?;
        f(&mut value);
        self.store(value)
    }

    fn is_writable(&self) -> bool {
        true
    }
}

impl<T, S: Storage<T> + ?Sized> Storage<T> for &'static S {
    fn load(&self) -> Option<T> {
        (**self).load()
    }

    fn store(&self, value: T) -> Result<(), StoreError> {
        (**self).store(value)
    }

    fn modify(&self, f: &mut dyn FnMut(&mut T)) -> Result<(), StoreError> {
        (**self).modify(f)
    }

    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }
}

/// Getter function type
pub type GetFn<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Setter function type
pub type SetFn<T> = Box<dyn Fn(T) + Send + Sync>;

/// Storage backed by explicit accessor functions
///
/// Use this to expose state the application keeps somewhere other than a
/// [`TweakCell`](super::TweakCell), e.g. inside its own locked struct.
///
/// # Example
///
/// ```ignore
/// let accessor = Accessor::new(
///     || SETTINGS.read().gravity,
///     |v| SETTINGS.write().gravity = v,
/// );
/// ```
pub struct Accessor<T> {
    get: GetFn<T>,
    set: Option<SetFn<T>>,
}

impl<T> Accessor<T> {
    /// Readable and writable accessor
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
    {
        Self {
            get: Box::new(get),
            set: Some(Box::new(set)),
        }
    }

    /// Accessor without a setter; writes fail as not writable
    pub fn read_only<G>(get: G) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            get: Box::new(get),
            set: None,
        }
    }
}

impl<T> Storage<T> for Accessor<T> {
    fn load(&self) -> Option<T> {
        Some((self.get)())
    }

    fn store(&self, value: T) -> Result<(), StoreError> {
        let set = self.set.as_ref().ok_or(StoreError::NotWritable)?;
        set(value);
        Ok(())
    }

    fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

impl<T> std::fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessor")
            .field("writable", &self.set.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_accessor_round_trip() {
        let backing = Arc::new(AtomicI32::new(3));
        let (r, w) = (backing.clone(), backing.clone());
        let accessor = Accessor::new(
            move || r.load(Ordering::SeqCst),
            move |v| w.store(v, Ordering::SeqCst),
        );

        assert_eq!(accessor.load(), Some(3));
        accessor.store(11).unwrap();
        assert_eq!(backing.load(Ordering::SeqCst), 11);

        accessor.modify(&mut |v: &mut i32| *v *= 2).unwrap();
        assert_eq!(backing.load(Ordering::SeqCst), 22);
    }

    #[test]
    fn test_read_only_accessor() {
        let accessor = Accessor::read_only(|| 5i64);
        assert!(!accessor.is_writable());
        assert_eq!(accessor.store(6), Err(StoreError::NotWritable));
        assert_eq!(accessor.modify(&mut |_: &mut i64| {}), Err(StoreError::NotWritable));
        assert_eq!(accessor.load(), Some(5));
    }
}
