//! Lease state machine of a pooled instance.
//!
//! ```text
//! Uninitialized -> Idle <-> Active -> Returning -> Idle
//! ```
//!
//! The provider owns one [`Lifecycle`] per instance and sequences it with
//! the adapter hooks. The machine itself holds no adapter and can be
//! inspected through [`PoolProvider::lifecycle`](crate::PoolProvider::lifecycle).

use super::context::PoolableContext;
use super::error::PoolError;
use super::handle::ProviderId;
use crate::fp_emit;

/// Lease state of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseState {
    /// Constructed, not yet bound to a provider.
    Uninitialized,
    /// Sitting in its reserve.
    Idle,
    /// On loan to a caller.
    Active,
    /// A return was requested; waiting for the deactivation signal.
    Returning,
}

/// Per-instance lifecycle bookkeeping.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: LeaseState,
    provider: Option<ProviderId>,
    timer: f32,
    context: PoolableContext,
    returning: bool,
}

impl Lifecycle {
    /// Create an uninitialized lifecycle.
    pub fn new() -> Self {
        Self {
            state: LeaseState::Uninitialized,
            provider: None,
            timer: 0.0,
            context: PoolableContext::default(),
            returning: false,
        }
    }

    /// Bind to the owning provider. `Uninitialized -> Idle`.
    pub fn initialize(&mut self, provider: ProviderId) {
        self.provider = Some(provider);
        if self.state == LeaseState::Uninitialized {
            self.state = LeaseState::Idle;
        }
    }

    /// Unbind from the owning provider.
    ///
    /// Later deactivation signals are reported as stale and skipped.
    pub fn detach(&mut self) {
        self.provider = None;
    }

    /// Start a loan. `Idle -> Active`.
    ///
    /// Fails with [`PoolError::NotInitialized`] before `initialize` and with
    /// [`PoolError::AlreadyBorrowed`] while a loan is in progress.
    pub fn borrow(&mut self, context: PoolableContext) -> Result<(), PoolError> {
        match self.state {
            LeaseState::Uninitialized => {
                fp_emit!(FP101);
                return Err(PoolError::NotInitialized);
            }
            LeaseState::Active | LeaseState::Returning => {
                fp_emit!(FP102);
                return Err(PoolError::AlreadyBorrowed);
            }
            LeaseState::Idle => {}
        }

        self.context = context;
        self.timer = 0.0;
        self.returning = false;
        self.state = LeaseState::Active;
        Ok(())
    }

    /// Advance the timer by `delta`. Returns `false` (and does nothing) when
    /// the instance is not on loan.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.timer += delta;
        true
    }

    /// Check whether the lifetime ran out and no return is in progress yet.
    pub fn lifetime_expired(&self) -> bool {
        self.state == LeaseState::Active
            && !self.returning
            && !self.context.is_infinite()
            && self.timer >= self.context.lifetime
    }

    /// Mark a return as requested. `Active -> Returning`.
    ///
    /// Returns `false` when the instance is not on loan.
    pub fn begin_return(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.returning = true;
        self.state = LeaseState::Returning;
        true
    }

    /// Reset the context after a graceful return.
    pub fn clear_context(&mut self) {
        self.context = PoolableContext::default();
    }

    /// Handle the deactivation signal. `Active | Returning -> Idle`.
    ///
    /// Returns the provider to hand the instance back to, or `None` when no
    /// provider owns it; in that case nothing changes.
    pub fn deactivate(&mut self) -> Option<ProviderId> {
        let provider = self.provider?;
        if self.state != LeaseState::Uninitialized {
            self.state = LeaseState::Idle;
        }
        Some(provider)
    }

    /// Current state.
    pub fn state(&self) -> LeaseState {
        self.state
    }

    /// True between borrow and the deactivation signal.
    pub fn is_active(&self) -> bool {
        matches!(self.state, LeaseState::Active | LeaseState::Returning)
    }

    /// True once a return was requested during the current loan.
    pub fn is_returning(&self) -> bool {
        self.returning
    }

    /// Check whether a provider owns this instance.
    pub fn is_initialized(&self) -> bool {
        self.provider.is_some()
    }

    /// Owning provider.
    pub fn provider(&self) -> Option<ProviderId> {
        self.provider
    }

    /// Seconds since the last borrow.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Context of the current (or last, until cleared) borrow.
    pub fn context(&self) -> &PoolableContext {
        &self.context
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
