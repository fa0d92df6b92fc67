//! Pool provider - type-keyed reserves, borrow/return protocol, prewarm.
//!
//! The provider owns every instance it creates. Idle instances sit in the
//! reserve of their concrete type; borrowed ones are reachable through a
//! [`PoolHandle`]. All operations run on the host's frame thread and take
//! `&mut self`.
//!
//! # Example
//!
//! ```rust
//! use framepool::{Activation, PoolConfig, PoolProvider, Poolable, PoolableContext, Preset, ScopeId};
//!
//! #[derive(Clone, Default)]
//! struct Spark;
//!
//! impl Poolable for Spark {
//!     fn on_borrowed(&mut self, activation: &mut Activation<'_>) {
//!         activation.enable();
//!     }
//!     fn on_returned(&mut self, activation: &mut Activation<'_>) {
//!         activation.disable();
//!     }
//!     fn on_update(&mut self, _activation: &mut Activation<'_>, _delta: f32) {}
//! }
//!
//! let config = PoolConfig::new(ScopeId::new(1)).with_preset(Preset::new(Spark, 8));
//! let mut pool = PoolProvider::new(config).unwrap();
//!
//! let spark = pool
//!     .get::<Spark>(PoolableContext::finite(0.5, [0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]))
//!     .unwrap();
//! assert!(pool.is_active(spark));
//!
//! // Game loop
//! for _ in 0..60 {
//!     pool.tick_all(1.0 / 60.0);
//! }
//! assert!(!pool.is_active(spark));
//! ```

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use super::config::PoolConfig;
use super::context::{PoolableContext, ScopeId, Transform};
use super::error::PoolError;
use super::handle::{PoolHandle, ProviderId};
use super::lifecycle::Lifecycle;
use super::notify::{DeactivationNotifier, SignalQueue};
use super::poolable::Poolable;
use super::preset::PresetRegistry;
use super::stats::{PoolStats, ReserveStats};
use crate::core::reserve::Reserve;
use crate::core::slot::{Hook, Slot};
use crate::diagnostics::{emit_with_context, Diagnostic, DiagnosticSink};
use crate::diagnostics::{FP002, FP003, FP202, FP301, FP302};

#[cfg(feature = "debug")]
use crate::debug::backtrace::BorrowTraces;

/// Owner of all pooled instances, their reserves and the preset registry.
pub struct PoolProvider {
    id: ProviderId,
    pool_scope: ScopeId,
    presets: PresetRegistry,
    slots: Vec<Slot>,
    reserves: HashMap<TypeId, Reserve>,
    signals: SignalQueue,
    sink: Option<Arc<dyn DiagnosticSink>>,
    stats: PoolStats,
    #[cfg(feature = "debug")]
    traces: BorrowTraces,
}

impl PoolProvider {
    /// Create a provider and prewarm every preset.
    ///
    /// Fails when no pool scope is configured or when a type has more than
    /// one preset and duplicates are not allowed.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            pool_scope,
            presets,
            allow_duplicate_presets,
            slot_capacity,
            sink,
        } = config;

        let Some(pool_scope) = pool_scope else {
            let err = PoolError::MissingPoolScope;
            report(sink.as_deref(), err.diagnostic(), "PoolConfig::pool_scope is None");
            return Err(err);
        };

        let presets = match PresetRegistry::new(presets, allow_duplicate_presets) {
            Ok(presets) => presets,
            Err(err) => {
                let context = match &err {
                    PoolError::AmbiguousPreset { type_name } => *type_name,
                    _ => "",
                };
                report(sink.as_deref(), err.diagnostic(), context);
                return Err(err);
            }
        };

        let mut provider = Self {
            id: ProviderId::next(),
            pool_scope,
            presets,
            slots: Vec::with_capacity(slot_capacity),
            reserves: HashMap::new(),
            signals: SignalQueue::new(),
            sink,
            stats: PoolStats::new(),
            #[cfg(feature = "debug")]
            traces: BorrowTraces::new(),
        };

        for type_name in provider.presets.duplicates() {
            provider.report(&FP003, type_name);
        }

        provider.prewarm();

        #[cfg(feature = "log")]
        log::debug!(
            "pool provider {} ready: {} presets, {} instances prewarmed",
            provider.id.raw(),
            provider.presets.len(),
            provider.stats.prewarmed
        );

        Ok(provider)
    }

    /// Instantiate every preset's prewarm count, in registration order.
    fn prewarm(&mut self) {
        for preset_index in 0..self.presets.len() {
            let count = self.presets.get(preset_index).map_or(0, |p| p.prewarm());
            for _ in 0..count {
                if let Some(index) = self.spawn_from_preset(preset_index) {
                    self.reclaim(index);
                    self.stats.prewarmed += 1;
                }
            }
        }
    }

    /// Borrow an instance of `T`.
    ///
    /// Pops the most recently returned idle instance, or instantiates one
    /// from the first preset for exactly `T`. Fails with
    /// [`PoolError::NoFactoryPreset`] when neither exists.
    pub fn get<T: Poolable>(&mut self, context: PoolableContext) -> Result<PoolHandle<T>, PoolError> {
        let popped = self
            .reserves
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Reserve::new(type_name::<T>()))
            .pop();

        let index = match popped {
            Some(index) => index,
            None => self.instantiate_fallback::<T>()?,
        };

        let generation = self.borrow_slot(index, context)?;
        Ok(PoolHandle::new(self.id, index, generation))
    }

    /// Request a return of a borrowed instance.
    ///
    /// `immediate` takes the effect down at once without the adapter's
    /// return hook; otherwise `on_returned` runs and the instance goes back
    /// to its reserve once the adapter disables it. No-op if the instance is
    /// not on loan.
    pub fn return_instance<T: Poolable>(
        &mut self,
        handle: PoolHandle<T>,
        immediate: bool,
    ) -> Result<(), PoolError> {
        let index = self.slot_index(handle)?;
        self.request_return(index, immediate);
        Ok(())
    }

    /// Request a return of every instance currently on loan.
    pub fn return_all(&mut self, immediate: bool) {
        for index in 0..self.slots.len() as u32 {
            if self.slots[index as usize].lifecycle.is_active() {
                self.request_return(index, immediate);
            }
        }
    }

    /// Signal that the instance's effect became inactive.
    ///
    /// Moves it back to its reserve. Calling it again is a no-op; calling it
    /// after the instance was lent out again fails with
    /// [`PoolError::StaleHandle`].
    pub fn notify_deactivated<T: Poolable>(&mut self, handle: PoolHandle<T>) -> Result<(), PoolError> {
        let index = self.slot_index(handle)?;
        self.deactivate_slot(index);
        Ok(())
    }

    /// Advance one instance by `delta` seconds.
    pub fn tick<T: Poolable>(&mut self, handle: PoolHandle<T>, delta: f32) -> Result<(), PoolError> {
        let index = self.slot_index(handle)?;
        self.tick_slot(index, delta);
        Ok(())
    }

    /// Apply queued deactivation signals, then advance every instance on
    /// loan by `delta` seconds. Call once per frame.
    pub fn tick_all(&mut self, delta: f32) {
        self.pump_notifications();
        for index in 0..self.slots.len() as u32 {
            self.tick_slot(index, delta);
        }
    }

    /// Create a notifier that can raise deactivation signals from anywhere.
    pub fn notifier(&self) -> DeactivationNotifier {
        self.signals.notifier(self.id)
    }

    /// Apply queued deactivation signals.
    ///
    /// Signals raised for an earlier loan of an instance are dropped and
    /// counted in [`PoolStats::stale_signals`]. Returns how many instances
    /// went back to their reserve.
    pub fn pump_notifications(&mut self) -> usize {
        let mut applied = 0;
        while let Some((index, generation)) = self.signals.pop() {
            let Some(slot) = self.slots.get(index as usize) else {
                continue;
            };
            if slot.generation != generation {
                self.stats.stale_signals += 1;
                continue;
            }
            if self.deactivate_slot(index) {
                applied += 1;
            }
        }
        applied
    }

    /// Number of queued deactivation signals.
    pub fn pending_notifications(&self) -> usize {
        self.signals.len()
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Typed access to a borrowed instance's adapter.
    pub fn resource<T: Poolable>(&self, handle: PoolHandle<T>) -> Option<&T> {
        self.lookup(handle).and_then(Slot::downcast_ref::<T>)
    }

    /// Mutable typed access to a borrowed instance's adapter.
    pub fn resource_mut<T: Poolable>(&mut self, handle: PoolHandle<T>) -> Option<&mut T> {
        let index = self.checked_index(handle)?;
        self.slots[index as usize].downcast_mut::<T>()
    }

    /// True between borrow and the deactivation signal.
    pub fn is_active<T: Poolable>(&self, handle: PoolHandle<T>) -> bool {
        self.lookup(handle).map_or(false, |slot| slot.lifecycle.is_active())
    }

    /// Whether the adapter's effect is currently live.
    pub fn is_enabled<T: Poolable>(&self, handle: PoolHandle<T>) -> bool {
        self.lookup(handle).map_or(false, |slot| slot.enabled)
    }

    /// Lifecycle of an instance.
    pub fn lifecycle<T: Poolable>(&self, handle: PoolHandle<T>) -> Option<&Lifecycle> {
        self.lookup(handle).map(|slot| &slot.lifecycle)
    }

    /// Placement and scope applied to an instance.
    pub fn transform<T: Poolable>(&self, handle: PoolHandle<T>) -> Option<&Transform> {
        self.lookup(handle).map(|slot| &slot.transform)
    }

    /// Idle instances of `T`.
    pub fn reserve_len<T: Poolable>(&self) -> usize {
        self.reserves.get(&TypeId::of::<T>()).map_or(0, Reserve::len)
    }

    /// Check whether a reserve entry exists for `T` (possibly empty).
    pub fn has_reserve<T: Poolable>(&self) -> bool {
        self.reserves.contains_key(&TypeId::of::<T>())
    }

    /// Snapshot of every reserve, sorted by type name.
    pub fn reserve_stats(&self) -> Vec<ReserveStats> {
        let mut stats: Vec<ReserveStats> = self
            .reserves
            .iter()
            .map(|(type_id, reserve)| ReserveStats {
                type_name: reserve.type_name(),
                idle: reserve.len(),
                total: self.slots.iter().filter(|s| s.type_id == *type_id).count(),
            })
            .collect();
        stats.sort_by_key(|s| s.type_name);
        stats
    }

    /// Counters since construction.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Number of instances owned by this provider.
    pub fn tracked_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of instances currently on loan.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.lifecycle.is_active()).count()
    }

    /// Default scope of idle and fallback instances.
    pub fn pool_scope(&self) -> ScopeId {
        self.pool_scope
    }

    /// Registered presets.
    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    /// Identity of this provider.
    pub fn id(&self) -> ProviderId {
        self.id
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn spawn_from_preset(&mut self, preset_index: usize) -> Option<u32> {
        let preset = self.presets.get(preset_index)?;
        let (resource, type_id, type_name) =
            (preset.instantiate(), preset.type_id(), preset.type_name());

        let index = self.slots.len() as u32;
        let mut slot = Slot::new(resource, type_id, type_name, self.pool_scope);
        slot.lifecycle.initialize(self.id);
        self.slots.push(slot);
        self.stats.instantiated += 1;
        Some(index)
    }

    fn instantiate_fallback<T: Poolable>(&mut self) -> Result<u32, PoolError> {
        let err = PoolError::NoFactoryPreset {
            type_name: type_name::<T>(),
        };

        let Some(preset_index) = self.presets.position(TypeId::of::<T>()) else {
            self.report(&FP002, type_name::<T>());
            return Err(err);
        };

        let index = self.spawn_from_preset(preset_index).ok_or(err)?;
        self.stats.fallback_instantiations += 1;
        Ok(index)
    }

    /// Start a loan. Returns the new loan generation.
    fn borrow_slot(&mut self, index: u32, context: PoolableContext) -> Result<u32, PoolError> {
        let pool_scope = self.pool_scope;
        let slot = &mut self.slots[index as usize];
        slot.lifecycle.borrow(context)?;
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;

        slot.transform.placement = context.placement.normalized();
        let desired = context.scope.unwrap_or(pool_scope);
        if slot.transform.scope != desired {
            slot.transform.scope = desired;
            self.stats.reparents += 1;
        }
        self.stats.borrows += 1;

        #[cfg(feature = "debug")]
        self.traces.record_borrow(index, slot.type_name);

        if slot.run_hook(Hook::Borrowed) {
            self.deactivate_slot(index);
        }
        Ok(generation)
    }

    fn request_return(&mut self, index: u32, immediate: bool) {
        let slot = &mut self.slots[index as usize];
        if !slot.lifecycle.begin_return() {
            return;
        }
        self.stats.returns_requested += 1;

        if immediate {
            slot.enabled = false;
            slot.resource.deactivate();
            self.deactivate_slot(index);
        } else {
            let deactivated = slot.run_hook(Hook::Returned);
            slot.lifecycle.clear_context();
            if deactivated {
                self.deactivate_slot(index);
            }
        }
    }

    fn tick_slot(&mut self, index: u32, delta: f32) {
        let slot = &mut self.slots[index as usize];
        if !slot.lifecycle.advance(delta) {
            return;
        }

        if slot.run_hook(Hook::Update(delta)) {
            self.deactivate_slot(index);
            return;
        }

        if slot.lifecycle.lifetime_expired() {
            self.stats.auto_returns += 1;
            self.request_return(index, false);
        }
    }

    /// The "became inactive" signal: back to Idle, then into the reserve.
    ///
    /// Returns `true` if the instance was pushed back onto its reserve.
    fn deactivate_slot(&mut self, index: u32) -> bool {
        let slot = &mut self.slots[index as usize];
        slot.enabled = false;
        // Every slot is initialized with this provider and never detached.
        slot.lifecycle.deactivate();

        let reclaimed = self.reclaim(index);
        if reclaimed {
            self.stats.reclaimed += 1;
        }
        reclaimed
    }

    /// Push an idle instance onto its type's reserve unless already there.
    fn reclaim(&mut self, index: u32) -> bool {
        let slot = &self.slots[index as usize];
        let type_name = slot.type_name;
        let pushed = self
            .reserves
            .entry(slot.type_id)
            .or_insert_with(|| Reserve::new(type_name))
            .push(index);

        #[cfg(feature = "debug")]
        self.traces.record_reclaim(index);

        pushed
    }

    fn checked_index<T: Poolable>(&self, handle: PoolHandle<T>) -> Option<u32> {
        if handle.provider() != self.id {
            return None;
        }
        let raw = handle.raw();
        match self.slots.get(raw.raw_index() as usize) {
            Some(slot) if slot.is::<T>() && slot.generation == raw.generation() => {
                Some(raw.raw_index())
            }
            _ => None,
        }
    }

    fn lookup<T: Poolable>(&self, handle: PoolHandle<T>) -> Option<&Slot> {
        let index = self.checked_index(handle)?;
        self.slots.get(index as usize)
    }

    /// Like `checked_index`, but reports misuse.
    fn slot_index<T: Poolable>(&self, handle: PoolHandle<T>) -> Result<u32, PoolError> {
        if let Some(index) = self.checked_index(handle) {
            return Ok(index);
        }

        let raw = handle.raw();
        let outdated = raw.provider() == self.id
            && self
                .slots
                .get(raw.raw_index() as usize)
                .map_or(false, |slot| slot.is::<T>());

        if outdated {
            self.report(&FP302, type_name::<T>());
            Err(PoolError::StaleHandle)
        } else {
            self.report(&FP301, type_name::<T>());
            Err(PoolError::ForeignHandle)
        }
    }

    fn report(&self, diag: &Diagnostic, context: &str) {
        report(self.sink.as_deref(), diag, context);
    }
}

fn report(sink: Option<&dyn DiagnosticSink>, diag: &Diagnostic, context: &str) {
    if let Some(sink) = sink {
        sink.emit(diag);
    }
    emit_with_context(diag, context);
}

impl std::fmt::Debug for PoolProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolProvider")
            .field("id", &self.id)
            .field("pool_scope", &self.pool_scope)
            .field("presets", &self.presets.len())
            .field("tracked", &self.tracked_count())
            .field("active", &self.active_count())
            .field("stats", &self.stats)
            .finish()
    }
}

impl Drop for PoolProvider {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }

        let leaked: Vec<u32> = (0..self.slots.len() as u32)
            .filter(|&i| self.slots[i as usize].lifecycle.is_active())
            .collect();
        if leaked.is_empty() {
            return;
        }

        let mut context = format!("{} instance(s) on loan:", leaked.len());
        for index in leaked {
            #[cfg(feature = "debug")]
            if let Some(trace) = self.traces.describe(index) {
                context.push_str("\n  ");
                context.push_str(&trace);
                continue;
            }
            context.push_str(&format!("\n  {} #{}", self.slots[index as usize].type_name, index));
        }
        self.report(&FP202, &context);
    }
}
