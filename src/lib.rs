//! # framepool
//!
//! Type-keyed reuse of short-lived game effects: lights, sounds, particle
//! bursts, decals.
//!
//! ## Features
//!
//! - One reserve of idle instances per concrete adapter type
//! - Presets with prewarm counts, fallback instantiation on demand
//! - Borrow contexts: lifetime, placement, scope, color tag
//! - Automatic return on lifetime expiry, immediate or graceful returns
//! - Typed handles, checked against the owning provider
//! - Deactivation signals from other threads through a lock-free queue
//! - Coded diagnostics with sinks and strict mode
//!
//! ## Quick Start
//!
//! ```rust
//! use framepool::{Activation, PoolConfig, PoolProvider, Poolable, PoolableContext, Preset, ScopeId};
//!
//! #[derive(Clone)]
//! struct MuzzleFlash {
//!     intensity: f32,
//! }
//!
//! impl Poolable for MuzzleFlash {
//!     fn on_borrowed(&mut self, activation: &mut Activation<'_>) {
//!         activation.enable();
//!     }
//!     fn on_returned(&mut self, activation: &mut Activation<'_>) {
//!         activation.disable();
//!     }
//!     fn on_update(&mut self, _activation: &mut Activation<'_>, delta: f32) {
//!         self.intensity = (self.intensity - delta).max(0.0);
//!     }
//! }
//!
//! let config = PoolConfig::new(ScopeId::new(1))
//!     .with_preset(Preset::new(MuzzleFlash { intensity: 1.0 }, 4));
//! let mut pool = PoolProvider::new(config).unwrap();
//!
//! let flash = pool
//!     .get::<MuzzleFlash>(PoolableContext::finite(0.1, [0.0, 1.5, 0.0], [0.0, 0.0, 0.0, 1.0]))
//!     .unwrap();
//!
//! // Game loop
//! pool.tick_all(0.05);
//! pool.tick_all(0.05);
//! assert!(!pool.is_active(flash));
//! assert_eq!(pool.reserve_len::<MuzzleFlash>(), 4);
//! ```

pub mod api;
pub mod diagnostics;

mod core;
mod sync;

#[cfg(feature = "debug")]
mod debug;

// Re-export public API at crate root for convenience
pub use api::config::PoolConfig;
pub use api::provider::PoolProvider;
pub use api::stats::{PoolStats, ReserveStats};

// Adapter contract
pub use api::poolable::{Activation, AsAny, Poolable};
pub use api::lifecycle::{LeaseState, Lifecycle};

// Borrow contexts
pub use api::context::{Color, Placement, PoolableContext, ScopeId, Transform};

// Presets
pub use api::preset::{Preset, PresetRegistry};

// Handles and errors
pub use api::error::PoolError;
pub use api::handle::{PoolHandle, ProviderId, RawHandle};
pub use api::notify::DeactivationNotifier;

// Diagnostics - Core types and predefined codes
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink};
pub use diagnostics::{StrictMode, set_strict_mode, StrictModeGuard};
pub use diagnostics::{FP001, FP002, FP003, FP004, FP101, FP102, FP201, FP202, FP301, FP302};
