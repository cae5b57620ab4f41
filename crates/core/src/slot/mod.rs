//! Member storage and type erasure
//!
//! - [`TweakCell`] / [`Accessor`]: where a member's value lives
//! - [`ValueSlot`] / [`DictionarySlot`] / [`CollectionSlot`]: how the
//!   registry reads and writes it without knowing its type
//! - [`TweakShape`]: which of the three a concrete type becomes

mod cell;
mod member;
mod storage;

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use livetweak_sdk::{EntryKind, RawValue};

use crate::coerce::{TweakCollection, TweakMap, TweakScalar};

pub use cell::{CellRef, TweakCell};
pub use member::{
    CollectionSlot, DictionarySlot, ListMember, MapMember, ScalarMember, ValueSlot, Written,
};
pub use storage::{Accessor, GetFn, SetFn, Storage, StoreError};

/// A member with its concrete type erased
#[derive(Clone)]
pub enum ErasedMember {
    Value(Arc<dyn ValueSlot>),
    Dictionary(Arc<dyn DictionarySlot>),
    Collection(Arc<dyn CollectionSlot>),
}

impl ErasedMember {
    pub fn scalar<T, S>(storage: S) -> Self
    where
        T: TweakScalar,
        S: Storage<T> + 'static,
    {
        Self::Value(Arc::new(ScalarMember::<T, S>::new(storage)))
    }

    pub fn dictionary<M, S>(storage: S) -> Self
    where
        M: TweakMap,
        S: Storage<M> + 'static,
    {
        Self::Dictionary(Arc::new(MapMember::<M, S>::new(storage)))
    }

    pub fn collection<L, S>(storage: S) -> Self
    where
        L: TweakCollection,
        S: Storage<L> + 'static,
    {
        Self::Collection(Arc::new(ListMember::<L, S>::new(storage)))
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Value(_) => EntryKind::Value,
            Self::Dictionary(_) => EntryKind::Dictionary,
            Self::Collection(_) => EntryKind::Collection,
        }
    }

    /// Current value in external form
    pub fn read(&self) -> Option<RawValue> {
        match self {
            Self::Value(slot) => slot.read(),
            Self::Dictionary(slot) => slot.read(),
            Self::Collection(slot) => slot.read(),
        }
    }
}

impl std::fmt::Debug for ErasedMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(slot) => f.debug_tuple("Value").field(&slot.type_name()).finish(),
            Self::Dictionary(slot) => f.debug_tuple("Dictionary").field(&slot.type_name()).finish(),
            Self::Collection(slot) => f.debug_tuple("Collection").field(&slot.type_name()).finish(),
        }
    }
}

/// Types that can back a tweakable member
///
/// Scalars and enums become value entries, `Vec`/`VecDeque` become
/// collections, and `HashMap`/`BTreeMap`/`serde_json::Map` become
/// dictionaries. `#[derive(TweakEnum)]` implements this for enums.
pub trait TweakShape: Clone + Send + Sync + Sized + 'static {
    fn erase<S: Storage<Self> + 'static>(storage: S) -> ErasedMember;
}

macro_rules! impl_value_shape {
    ($($ty:ty),*) => {
        $(
            impl TweakShape for $ty {
                fn erase<S: Storage<Self> + 'static>(storage: S) -> ErasedMember {
                    ErasedMember::scalar::<$ty, S>(storage)
                }
            }
        )*
    };
}

impl_value_shape!(bool, i32, i64, f32, f64, String);

impl<T: TweakScalar> TweakShape for Vec<T> {
    fn erase<S: Storage<Self> + 'static>(storage: S) -> ErasedMember {
        ErasedMember::collection::<Self, S>(storage)
    }
}

impl<T: TweakScalar> TweakShape for VecDeque<T> {
    fn erase<S: Storage<Self> + 'static>(storage: S) -> ErasedMember {
        ErasedMember::collection::<Self, S>(storage)
    }
}

impl<K, V> TweakShape for HashMap<K, V>
where
    K: TweakScalar + Eq + Hash,
    V: TweakScalar,
{
    fn erase<S: Storage<Self> + 'static>(storage: S) -> ErasedMember {
        ErasedMember::dictionary::<Self, S>(storage)
    }
}

impl<K, V> TweakShape for BTreeMap<K, V>
where
    K: TweakScalar + Ord,
    V: TweakScalar,
{
    fn erase<S: Storage<Self> + 'static>(storage: S) -> ErasedMember {
        ErasedMember::dictionary::<Self, S>(storage)
    }
}

impl TweakShape for serde_json::Map<String, RawValue> {
    fn erase<S: Storage<Self> + 'static>(storage: S) -> ErasedMember {
        ErasedMember::dictionary::<Self, S>(storage)
    }
}

/// Erase a `'static` cell (plain or behind `LazyLock`)
pub fn erase_static<C>(cell: &'static C) -> ErasedMember
where
    C: CellRef,
    C::Value: TweakShape,
{
    <C::Value as TweakShape>::erase(cell.cell())
}

/// Erase an accessor pair
pub fn erase_accessor<T: TweakShape>(accessor: Accessor<T>) -> ErasedMember {
    T::erase(accessor)
}
