//! Process-wide tweak cells
//!
//! A `TweakCell` is the live storage slot behind a tweakable entry. It is
//! designed to sit in a `static`, either directly (const-constructible) or
//! behind a `LazyLock` for values such as maps that cannot be built in a
//! const context.
//!
//! # Example
//!
//! ```ignore
//! use std::collections::HashMap;
//! use std::sync::LazyLock;
//! use livetweak_core::TweakCell;
//!
//! static SPEED: TweakCell<f32> = TweakCell::new(5.0);
//!
//! static BINDINGS: LazyLock<TweakCell<HashMap<String, String>>> = LazyLock::new(|| {
//!     TweakCell::new(HashMap::from([("Jump".to_string(), "Space".to_string())]))
//! });
//!
//! fn tick() {
//!     let speed = SPEED.get();
//!     // ...
//! }
//! ```

use std::sync::LazyLock;

use parking_lot::RwLock;

use super::storage::{Storage, StoreError};

/// Live storage slot for one tweakable value
///
/// Features:
/// - Thread-safe value storage via RwLock
/// - Optional read-only mode (writes through the registry fail)
pub struct TweakCell<T> {
    /// Current value
    value: RwLock<T>,
    /// Whether the registry may write to this cell
    writable: bool,
}

impl<T> TweakCell<T> {
    /// Create a writable cell
    pub const fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            writable: true,
        }
    }

    /// Create a cell the registry can read but never write
    pub const fn read_only(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            writable: false,
        }
    }

    /// Whether the registry may write to this cell
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Run a closure against the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// Set the value from application code
    ///
    /// Application code owns the cell, so this ignores the read-only flag,
    /// which only restricts the registry.
    pub fn set(&self, value: T) {
        *self.value.write() = value;
    }

    /// Replace the value, returning the previous one
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.value.write(), value)
    }

    /// Modify the value in place under the write lock
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value.write())
    }
}

impl<T: Clone> TweakCell<T> {
    /// Get a copy of the current value
    pub fn get(&self) -> T {
        self.value.read().clone()
    }
}

impl<T: Clone + Send + Sync> Storage<T> for TweakCell<T> {
    fn load(&self) -> Option<T> {
        Some(self.get())
    }

    fn store(&self, value: T) -> Result<(), StoreError> {
        if !self.writable {
            return Err(StoreError::NotWritable);
        }
        self.set(value);
        Ok(())
    }

    fn modify(&self, f: &mut dyn FnMut(&mut T)) -> Result<(), StoreError> {
        if !self.writable {
            return Err(StoreError::NotWritable);
        }
        self.update(|value| f(value));
        Ok(())
    }

    fn is_writable(&self) -> bool {
        self.writable
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for TweakCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweakCell")
            .field("value", &*self.value.read())
            .field("writable", &self.writable)
            .finish()
    }
}

impl<T: Default> Default for TweakCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A `static` that resolves to a [`TweakCell`]
///
/// Implemented for plain cells and for cells behind `LazyLock`, which lets
/// the `#[tweak]` marker accept either form.
pub trait CellRef: Sync + 'static {
    type Value;

    fn cell(&'static self) -> &'static TweakCell<Self::Value>;
}

impl<T: Send + Sync + 'static> CellRef for TweakCell<T> {
    type Value = T;

    fn cell(&'static self) -> &'static TweakCell<T> {
        self
    }
}

impl<T, F> CellRef for LazyLock<TweakCell<T>, F>
where
    T: Send + Sync + 'static,
    F: FnOnce() -> TweakCell<T> + Send + 'static,
{
    type Value = T;

    fn cell(&'static self) -> &'static TweakCell<T> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_basic() {
        let cell = TweakCell::new(42i32);
        assert_eq!(cell.get(), 42);
        cell.set(7);
        assert_eq!(cell.get(), 7);
        assert_eq!(cell.replace(9), 7);
        assert_eq!(cell.update(|v| {
            *v += 1;
            *v
        }), 10);
        assert!(cell.is_writable());
    }

    #[test]
    fn test_read_only_rejects_registry_writes() {
        let cell = TweakCell::read_only(String::from("fixed"));
        assert_eq!(cell.store("other".to_string()), Err(StoreError::NotWritable));
        assert_eq!(cell.modify(&mut |v: &mut String| v.push('!')), Err(StoreError::NotWritable));
        assert_eq!(cell.load().as_deref(), Some("fixed"));

        // Owning code can still change it
        cell.set("changed".to_string());
        assert_eq!(cell.get(), "changed");
    }

    #[test]
    fn test_static_cells_resolve() {
        static PLAIN: TweakCell<bool> = TweakCell::new(true);
        static LAZY: LazyLock<TweakCell<Vec<i32>>> = LazyLock::new(|| TweakCell::new(vec![1, 2]));

        assert!(PLAIN.cell().get());
        assert_eq!(LAZY.cell().get(), vec![1, 2]);
    }
}
