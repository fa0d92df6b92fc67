//! Deactivation signals raised away from the provider.
//!
//! Effects often end outside any hook: a sound finishes on the audio thread,
//! an animation system reports a fade as done. A [`DeactivationNotifier`]
//! queues the signal; the provider applies it on its own thread at the next
//! [`tick_all`](crate::PoolProvider::tick_all) or
//! [`pump_notifications`](crate::PoolProvider::pump_notifications).

use std::sync::{Arc, Weak};

use crossbeam_queue::SegQueue;

use super::handle::{PoolHandle, ProviderId};
use crate::fp_emit;

/// A queued signal: slot index and the loan generation it was raised for.
pub(crate) type Signal = (u32, u32);

/// Lock-free queue of pending deactivation signals.
pub(crate) struct SignalQueue {
    queue: Arc<SegQueue<Signal>>,
}

impl SignalQueue {
    pub(crate) fn new() -> Self {
        Self {
            queue: Arc::new(SegQueue::new()),
        }
    }

    /// Create a notifier feeding this queue.
    pub(crate) fn notifier(&self, provider: ProviderId) -> DeactivationNotifier {
        DeactivationNotifier {
            provider,
            queue: Arc::downgrade(&self.queue),
        }
    }

    /// Take the next pending signal.
    pub(crate) fn pop(&self) -> Option<Signal> {
        self.queue.pop()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get approximate number of pending signals.
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Cloneable, `Send` handle for raising "became inactive" signals.
#[derive(Debug, Clone)]
pub struct DeactivationNotifier {
    provider: ProviderId,
    queue: Weak<SegQueue<Signal>>,
}

impl DeactivationNotifier {
    /// Queue the deactivation signal for `handle`.
    ///
    /// The signal only applies to the loan `handle` was issued for; if the
    /// instance has been returned and lent out again by the time the
    /// provider drains the queue, it is dropped.
    ///
    /// Returns `false` if the handle belongs to another provider or the
    /// provider is gone. The latter is reported as a stale signal and the
    /// instance is left alone.
    pub fn notify<T>(&self, handle: PoolHandle<T>) -> bool {
        if handle.provider() != self.provider {
            fp_emit!(FP301);
            return false;
        }

        match self.queue.upgrade() {
            Some(queue) => {
                let raw = handle.raw();
                queue.push((raw.raw_index(), raw.generation()));
                true
            }
            None => {
                fp_emit!(FP201);
                false
            }
        }
    }

    /// Check whether the provider is still alive.
    pub fn is_connected(&self) -> bool {
        self.queue.strong_count() > 0
    }

    /// Provider this notifier feeds.
    pub fn provider(&self) -> ProviderId {
        self.provider
    }
}
