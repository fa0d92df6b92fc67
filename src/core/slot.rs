//! Instance storage.

use std::any::TypeId;

use crate::api::context::{ScopeId, Transform};
use crate::api::lifecycle::Lifecycle;
use crate::api::poolable::{Activation, Poolable};

/// Adapter hook to run against a slot.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Hook {
    Borrowed,
    Returned,
    Update(f32),
}

/// One pooled instance and its bookkeeping.
pub(crate) struct Slot {
    pub(crate) resource: Box<dyn Poolable>,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) transform: Transform,
    /// Whether the adapter's effect is live
    pub(crate) enabled: bool,
    /// Bumped on every borrow; handles and signals carry the value they saw
    pub(crate) generation: u32,
}

impl Slot {
    pub(crate) fn new(
        resource: Box<dyn Poolable>,
        type_id: TypeId,
        type_name: &'static str,
        scope: ScopeId,
    ) -> Self {
        Self {
            resource,
            type_id,
            type_name,
            lifecycle: Lifecycle::new(),
            transform: Transform::in_scope(scope),
            enabled: false,
            generation: 0,
        }
    }

    /// Run `hook` on the adapter. Returns `true` if the adapter raised the
    /// deactivation signal.
    pub(crate) fn run_hook(&mut self, hook: Hook) -> bool {
        let mut activation = Activation::new(
            self.lifecycle.context(),
            &self.transform,
            self.lifecycle.timer(),
            &mut self.enabled,
        );

        match hook {
            Hook::Borrowed => self.resource.on_borrowed(&mut activation),
            Hook::Returned => self.resource.on_returned(&mut activation),
            Hook::Update(delta) => self.resource.on_update(&mut activation, delta),
        }

        activation.deactivated()
    }

    pub(crate) fn is<T: Poolable>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub(crate) fn downcast_ref<T: Poolable>(&self) -> Option<&T> {
        self.resource.as_ref().as_any().downcast_ref::<T>()
    }

    pub(crate) fn downcast_mut<T: Poolable>(&mut self) -> Option<&mut T> {
        self.resource.as_mut().as_any_mut().downcast_mut::<T>()
    }
}
