//! Typed handles to provider-owned instances.
//!
//! A provider owns every instance it creates. Callers hold a [`PoolHandle`],
//! which stays valid for the provider's whole lifetime because instances are
//! only ever moved between the reserve and the loan state, never freed.
//! Each loan bumps the instance's generation, so a handle kept past its loan
//! is rejected instead of reaching the next borrower.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

/// Source of unique provider ids.
static NEXT_PROVIDER_ID: AtomicU32 = AtomicU32::new(1);

/// Unique identity of a [`PoolProvider`](crate::PoolProvider).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProviderId(u32);

impl ProviderId {
    /// Allocate a fresh id.
    pub(crate) fn next() -> Self {
        Self(NEXT_PROVIDER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id (for debugging).
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Untyped handle: provider, slot index and loan generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle {
    pub(crate) provider: ProviderId,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl RawHandle {
    /// Provider that owns the instance.
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Slot index inside the provider (for debugging).
    pub fn raw_index(&self) -> u32 {
        self.index
    }

    /// Loan this handle was issued for.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// A handle to a borrowed instance of concrete type `T`.
pub struct PoolHandle<T> {
    raw: RawHandle,
    _marker: PhantomData<fn() -> T>,
}

// Manual implementations to avoid T: Copy/Clone bounds
impl<T> Copy for PoolHandle<T> {}

impl<T> Clone for PoolHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for PoolHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for PoolHandle<T> {}

impl<T> std::fmt::Debug for PoolHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolHandle")
            .field("type", &std::any::type_name::<T>())
            .field("provider", &self.raw.provider.0)
            .field("index", &self.raw.index)
            .field("generation", &self.raw.generation)
            .finish()
    }
}

impl<T> std::hash::Hash for PoolHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> PoolHandle<T> {
    pub(crate) fn new(provider: ProviderId, index: u32, generation: u32) -> Self {
        Self {
            raw: RawHandle {
                provider,
                index,
                generation,
            },
            _marker: PhantomData,
        }
    }

    /// Erase the type.
    pub fn raw(&self) -> RawHandle {
        self.raw
    }

    /// Provider that owns the instance.
    pub fn provider(&self) -> ProviderId {
        self.raw.provider
    }
}

impl<T> From<PoolHandle<T>> for RawHandle {
    fn from(handle: PoolHandle<T>) -> Self {
        handle.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NotClone;

    #[test]
    fn test_provider_ids_are_unique() {
        let a = ProviderId::next();
        let b = ProviderId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_handle_copy_without_bounds() {
        let id = ProviderId::next();
        let handle = PoolHandle::<NotClone>::new(id, 3, 1);
        let copy = handle;
        assert_eq!(handle, copy);
        assert_ne!(handle, PoolHandle::<NotClone>::new(id, 3, 2));
        assert_eq!(copy.raw().raw_index(), 3);
        assert_eq!(RawHandle::from(copy).provider(), id);
    }

    #[test]
    fn test_handle_is_send() {
        fn assert_send<S: Send>() {}
        assert_send::<PoolHandle<std::rc::Rc<u8>>>();
    }
}
