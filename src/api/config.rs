//! Provider configuration.

use std::sync::Arc;

use super::context::ScopeId;
use super::preset::Preset;
use crate::diagnostics::DiagnosticSink;

/// Configuration for a [`PoolProvider`](crate::PoolProvider).
pub struct PoolConfig {
    /// Default scope for idle and fallback instances. Required.
    pub pool_scope: Option<ScopeId>,

    /// Presets in registration order
    pub presets: Vec<Preset>,

    /// Accept several presets for one type (first wins) instead of failing
    pub allow_duplicate_presets: bool,

    /// Initial capacity of the instance storage (default: 64)
    pub slot_capacity: usize,

    /// Extra destination for the provider's diagnostics
    pub sink: Option<Arc<dyn DiagnosticSink>>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_scope: None,
            presets: Vec::new(),
            allow_duplicate_presets: false,
            slot_capacity: 64,
            sink: None,
        }
    }
}

impl PoolConfig {
    /// Create a config with the given pool scope and no presets.
    pub fn new(pool_scope: ScopeId) -> Self {
        Self::default().with_pool_scope(pool_scope)
    }

    /// Builder pattern: set the pool scope.
    pub fn with_pool_scope(mut self, scope: ScopeId) -> Self {
        self.pool_scope = Some(scope);
        self
    }

    /// Builder pattern: register a preset.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.presets.push(preset);
        self
    }

    /// Builder pattern: register several presets.
    pub fn with_presets(mut self, presets: impl IntoIterator<Item = Preset>) -> Self {
        self.presets.extend(presets);
        self
    }

    /// Builder pattern: accept duplicate presets.
    pub fn allow_duplicate_presets(mut self, allow: bool) -> Self {
        self.allow_duplicate_presets = allow;
        self
    }

    /// Builder pattern: set initial instance capacity.
    pub fn with_slot_capacity(mut self, capacity: usize) -> Self {
        self.slot_capacity = capacity;
        self
    }

    /// Builder pattern: route diagnostics to `sink` as well.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Total prewarm count across presets.
    pub fn prewarm_total(&self) -> usize {
        self.presets.iter().map(Preset::prewarm).sum()
    }
}

impl std::fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConfig")
            .field("pool_scope", &self.pool_scope)
            .field("presets", &self.presets)
            .field("allow_duplicate_presets", &self.allow_duplicate_presets)
            .field("slot_capacity", &self.slot_capacity)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
