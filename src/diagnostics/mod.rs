//! Runtime diagnostics.
//!
//! This module provides:
//! - **Coded diagnostics**: pool-aware error and warning messages
//! - **Sinks**: route a provider's diagnostics to custom collectors
//! - **Strict mode**: optional panic-on-error for CI
//!
//! ## Diagnostic Codes
//!
//! | Code  | Meaning                          |
//! |-------|----------------------------------|
//! | FP0xx | Configuration issues             |
//! | FP1xx | Lifecycle misuse                 |
//! | FP2xx | Deactivation and teardown        |
//! | FP3xx | Handle misuse                    |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use framepool::fp_emit;
//!
//! fp_emit!(FP201);
//! ```

pub mod emit;
pub mod kind;
pub mod macros;
pub mod strict;

pub use emit::{emit, emit_with_context, suppress_diagnostics, CollectingSink, DiagnosticSink};
pub use kind::{Diagnostic, DiagnosticKind};
pub use strict::{init_from_env, set_strict_mode, strict_mode, StrictMode, StrictModeGuard};

pub use kind::{FP001, FP002, FP003, FP004, FP101, FP102, FP201, FP202, FP301, FP302};
