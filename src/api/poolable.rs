//! The adapter contract implemented by every pooled resource.
//!
//! The provider drives the lease state machine; adapters only react through
//! three hooks and switch their effect on and off through [`Activation`].
//!
//! # Example
//!
//! ```rust
//! use framepool::{Activation, Poolable};
//!
//! #[derive(Clone, Default)]
//! struct Flash {
//!     intensity: f32,
//! }
//!
//! impl Poolable for Flash {
//!     fn on_borrowed(&mut self, activation: &mut Activation<'_>) {
//!         self.intensity = 1.0;
//!         activation.enable();
//!     }
//!
//!     fn on_returned(&mut self, activation: &mut Activation<'_>) {
//!         activation.disable();
//!     }
//!
//!     fn on_update(&mut self, _activation: &mut Activation<'_>, delta: f32) {
//!         self.intensity = (self.intensity - delta).max(0.0);
//!     }
//! }
//! ```

use std::any::Any;

use super::context::{PoolableContext, Transform};

/// Upcast helper so boxed adapters can be downcast to their concrete type.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Lifecycle hooks of a pooled resource.
///
/// Adapters are responsible for actually enabling and disabling the
/// underlying effect. Disabling it (through [`Activation::disable`]) is the
/// "became inactive" signal that sends the instance back to its reserve.
pub trait Poolable: AsAny {
    /// Called after the instance was borrowed and placed.
    ///
    /// Implementations should call [`Activation::enable`] here.
    fn on_borrowed(&mut self, activation: &mut Activation<'_>);

    /// Called on a graceful return.
    ///
    /// May disable at once, or start an exit transition and disable later
    /// from [`on_update`](Poolable::on_update). Can be called again while the
    /// return is still in progress.
    fn on_returned(&mut self, activation: &mut Activation<'_>);

    /// Called once per tick while the instance is active.
    fn on_update(&mut self, activation: &mut Activation<'_>, delta: f32);

    /// Stop the effect right now. Called by immediate returns in place of
    /// [`on_returned`](Poolable::on_returned).
    fn deactivate(&mut self) {}
}

/// The adapter's view of its instance during a hook.
pub struct Activation<'a> {
    context: &'a PoolableContext,
    transform: &'a Transform,
    timer: f32,
    enabled: &'a mut bool,
    deactivated: bool,
}

impl<'a> Activation<'a> {
    pub(crate) fn new(
        context: &'a PoolableContext,
        transform: &'a Transform,
        timer: f32,
        enabled: &'a mut bool,
    ) -> Self {
        Self {
            context,
            transform,
            timer,
            enabled,
            deactivated: false,
        }
    }

    /// The context of the current borrow.
    pub fn context(&self) -> &PoolableContext {
        self.context
    }

    /// Placement and scope applied to the instance.
    pub fn transform(&self) -> &Transform {
        self.transform
    }

    /// Seconds since the instance was borrowed.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Check whether the effect is currently live.
    pub fn is_enabled(&self) -> bool {
        *self.enabled
    }

    /// Make the effect live.
    pub fn enable(&mut self) {
        *self.enabled = true;
    }

    /// Take the effect down and signal that the instance became inactive.
    pub fn disable(&mut self) {
        *self.enabled = false;
        self.deactivated = true;
    }

    /// Check whether [`disable`](Activation::disable) was called during this
    /// hook.
    pub(crate) fn deactivated(&self) -> bool {
        self.deactivated
    }
}
