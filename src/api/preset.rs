//! Presets - factory prototypes and prewarm counts per poolable type.
//!
//! Presets are keyed by exact concrete type. Two adapter types with the same
//! shape never share a reserve or a preset.

use std::any::{type_name, TypeId};

use super::error::PoolError;
use super::poolable::Poolable;

type Factory = Box<dyn Fn() -> Box<dyn Poolable>>;

/// A factory for one concrete poolable type plus its prewarm count.
pub struct Preset {
    type_id: TypeId,
    type_name: &'static str,
    prewarm: usize,
    factory: Factory,
}

impl Preset {
    /// Preset that clones `prototype` for every new instance.
    pub fn new<T: Poolable + Clone>(prototype: T, prewarm: usize) -> Self {
        Self::from_fn(move || prototype.clone(), prewarm)
    }

    /// Preset that builds every new instance with `factory`.
    pub fn from_fn<T, F>(factory: F, prewarm: usize) -> Self
    where
        T: Poolable,
        F: Fn() -> T + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            prewarm,
            factory: Box::new(move || Box::new(factory()) as Box<dyn Poolable>),
        }
    }

    /// Concrete type produced by this preset.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the concrete type (for diagnostics).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of instances created at provider construction.
    pub fn prewarm(&self) -> usize {
        self.prewarm
    }

    /// Create a fresh instance.
    pub fn instantiate(&self) -> Box<dyn Poolable> {
        (self.factory)()
    }

    /// Check whether this preset produces exactly `T`.
    pub fn produces<T: Poolable>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl std::fmt::Debug for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preset")
            .field("type_name", &self.type_name)
            .field("prewarm", &self.prewarm)
            .finish()
    }
}

/// Ordered, read-only collection of presets.
#[derive(Debug, Default)]
pub struct PresetRegistry {
    presets: Vec<Preset>,
    duplicates: Vec<&'static str>,
}

impl PresetRegistry {
    /// Build a registry, validating that each concrete type has one preset.
    ///
    /// With `allow_duplicates` the registry is accepted anyway and the first
    /// registration of a type wins for [`find`](PresetRegistry::find); the
    /// offending types are listed by [`duplicates`](PresetRegistry::duplicates).
    pub fn new(presets: Vec<Preset>, allow_duplicates: bool) -> Result<Self, PoolError> {
        let mut duplicates = Vec::new();
        for (i, preset) in presets.iter().enumerate() {
            let seen_before = presets[..i].iter().any(|p| p.type_id == preset.type_id);
            if seen_before && !duplicates.contains(&preset.type_name) {
                if !allow_duplicates {
                    return Err(PoolError::AmbiguousPreset {
                        type_name: preset.type_name,
                    });
                }
                duplicates.push(preset.type_name);
            }
        }

        Ok(Self { presets, duplicates })
    }

    /// First preset whose concrete type is `type_id`.
    pub fn find(&self, type_id: TypeId) -> Option<&Preset> {
        self.presets.iter().find(|p| p.type_id == type_id)
    }

    /// Registration index of the first preset for `type_id`.
    pub fn position(&self, type_id: TypeId) -> Option<usize> {
        self.presets.iter().position(|p| p.type_id == type_id)
    }

    /// Preset at `index`, in registration order.
    pub fn get(&self, index: usize) -> Option<&Preset> {
        self.presets.get(index)
    }

    /// Iterate presets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    /// Types registered more than once (only non-empty when duplicates were
    /// allowed).
    pub fn duplicates(&self) -> &[&'static str] {
        &self.duplicates
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Check if there are no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
