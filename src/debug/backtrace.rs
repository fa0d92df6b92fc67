//! Borrow-site backtrace tracking.
//!
//! Records where each instance was last borrowed so leak reports can point
//! at the caller that never returned it.

use std::collections::HashMap;

/// A captured backtrace for a borrow.
#[derive(Clone)]
pub(crate) struct BorrowTrace {
    /// Slot index of the instance
    pub index: u32,

    /// Concrete type of the instance
    pub type_name: &'static str,

    /// Captured backtrace (as string for simplicity)
    pub backtrace: String,

    /// Borrow sequence number
    pub sequence: u64,
}

/// Tracker for borrow backtraces, owned by one provider.
#[derive(Default)]
pub(crate) struct BorrowTraces {
    traces: HashMap<u32, BorrowTrace>,
    sequence: u64,
}

impl BorrowTraces {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a borrow with its backtrace.
    pub(crate) fn record_borrow(&mut self, index: u32, type_name: &'static str) {
        self.sequence += 1;
        let bt = backtrace::Backtrace::new();
        self.traces.insert(
            index,
            BorrowTrace {
                index,
                type_name,
                backtrace: format!("{:?}", bt),
                sequence: self.sequence,
            },
        );
    }

    /// Forget the borrow once the instance is back in its reserve.
    pub(crate) fn record_reclaim(&mut self, index: u32) {
        self.traces.remove(&index);
    }

    /// Get the trace for an instance (if on loan).
    pub(crate) fn get(&self, index: u32) -> Option<&BorrowTrace> {
        self.traces.get(&index)
    }

    /// Format the trace of `index` for a leak report.
    pub(crate) fn describe(&self, index: u32) -> Option<String> {
        self.get(index).map(|trace| {
            format!(
                "{} #{} (borrow {}) borrowed at:\n{}",
                trace.type_name, trace.index, trace.sequence, trace.backtrace
            )
        })
    }
}
