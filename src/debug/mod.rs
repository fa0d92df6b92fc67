//! Debug utilities for tracking borrows.
//!
//! Only compiled when the `debug` feature is enabled.

pub(crate) mod backtrace;
