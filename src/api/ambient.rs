//! Ambient provider - at most one per thread.
//!
//! Hosts that don't want to thread a `&mut PoolProvider` through every call
//! can install one provider for the current thread and reach it with
//! [`with_provider`]. Installing a second one is rejected.

use std::cell::RefCell;

use super::error::PoolError;
use super::handle::ProviderId;
use super::provider::PoolProvider;
use crate::fp_emit;

thread_local! {
    static AMBIENT: RefCell<Option<PoolProvider>> = const { RefCell::new(None) };
}

/// Install `provider` as this thread's ambient provider.
///
/// Fails with [`PoolError::ProviderAlreadyInstalled`] if one is already
/// installed; the rejected provider is dropped.
pub fn install(provider: PoolProvider) -> Result<ProviderId, PoolError> {
    AMBIENT.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            fp_emit!(FP004);
            return Err(PoolError::ProviderAlreadyInstalled);
        };

        if slot.is_some() {
            fp_emit!(FP004);
            return Err(PoolError::ProviderAlreadyInstalled);
        }

        let id = provider.id();
        *slot = Some(provider);

        #[cfg(feature = "log")]
        log::debug!("ambient pool provider {} installed", id.raw());

        Ok(id)
    })
}

/// Check whether this thread has an ambient provider.
pub fn is_installed() -> bool {
    current_id().is_some()
}

/// Id of this thread's ambient provider.
pub fn current_id() -> Option<ProviderId> {
    AMBIENT.with(|cell| cell.try_borrow().ok()?.as_ref().map(PoolProvider::id))
}

/// Run `f` against the ambient provider.
///
/// Returns `None` if none is installed or when called from inside another
/// `with_provider` (an adapter hook, for instance).
pub fn with_provider<R>(f: impl FnOnce(&mut PoolProvider) -> R) -> Option<R> {
    AMBIENT.with(|cell| {
        let mut slot = cell.try_borrow_mut().ok()?;
        let provider = slot.as_mut()?;
        Some(f(provider))
    })
}

/// Uninstall and return the ambient provider.
pub fn teardown() -> Option<PoolProvider> {
    AMBIENT.with(|cell| cell.try_borrow_mut().ok()?.take())
}
