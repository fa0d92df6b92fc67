//! Diagnostic kinds and core types.
//!
//! Mirrors rustc's diagnostic levels for familiar UX.

/// The severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A hard error - something is definitely wrong.
    Error,
    /// A warning - something is probably wrong or suboptimal.
    Warning,
    /// Additional context about another diagnostic.
    Note,
    /// Actionable suggestion to fix the issue.
    Help,
}

impl DiagnosticKind {
    /// Get the display prefix for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Note => "note",
            DiagnosticKind::Help => "help",
        }
    }
}

/// A diagnostic message with code, message, and optional context.
///
/// Diagnostic codes follow the pattern:
/// - `FP0xx` - Configuration issues (scope, presets, ambient provider)
/// - `FP1xx` - Lifecycle misuse
/// - `FP2xx` - Deactivation and teardown
/// - `FP3xx` - Handle misuse
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level.
    pub kind: DiagnosticKind,
    /// Diagnostic code (e.g., "FP001").
    pub code: &'static str,
    /// Primary message.
    pub message: &'static str,
    /// Optional additional context.
    pub note: Option<&'static str>,
    /// Optional fix suggestion.
    pub help: Option<&'static str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub const fn error(code: &'static str, message: &'static str) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            code,
            message,
            note: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic.
    pub const fn warning(code: &'static str, message: &'static str) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            code,
            message,
            note: None,
            help: None,
        }
    }

    /// Add a note to this diagnostic.
    pub const fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }

    /// Add a help message to this diagnostic.
    pub const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    /// Check whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.kind.prefix(), self.message)
    }
}

// =============================================================================
// Predefined diagnostics (FP0xx - Configuration)
// =============================================================================

/// FP001: Provider constructed without a pool scope.
pub const FP001: Diagnostic = Diagnostic::error(
    "FP001",
    "pool provider constructed without a pool scope",
)
.with_note("idle and fallback instances need a default scope to attach to")
.with_help("set PoolConfig::pool_scope, e.g. PoolConfig::new(ScopeId::new(1))");

/// FP002: No preset can instantiate the requested type.
pub const FP002: Diagnostic = Diagnostic::error(
    "FP002",
    "no factory preset for the requested poolable type",
)
.with_note("the reserve for this type was empty and no preset matches it exactly")
.with_help("register a Preset for the type in PoolConfig::presets");

/// FP003: Two presets registered for the same concrete type.
pub const FP003: Diagnostic = Diagnostic::warning(
    "FP003",
    "several presets registered for the same poolable type",
)
.with_note("fallback instantiation uses the first registration")
.with_help("merge the presets or drop allow_duplicate_presets to reject this at startup");

/// FP004: A second provider was offered to the ambient slot.
pub const FP004: Diagnostic = Diagnostic::warning(
    "FP004",
    "an ambient pool provider is already installed on this thread",
)
.with_note("the duplicate provider was dropped")
.with_help("call ambient::teardown() before installing a replacement");

// =============================================================================
// Predefined diagnostics (FP1xx - Lifecycle)
// =============================================================================

/// FP101: Borrow before initialize.
pub const FP101: Diagnostic = Diagnostic::error(
    "FP101",
    "poolable borrowed before it was initialized by a provider",
)
.with_help("instances must be created through PoolProvider prewarm or fallback");

/// FP102: Borrow of an instance that is already on loan.
pub const FP102: Diagnostic = Diagnostic::error(
    "FP102",
    "poolable borrowed while it is already active",
)
.with_note("an instance may only be on loan to one caller at a time")
.with_help("return the instance before borrowing it again");

// =============================================================================
// Predefined diagnostics (FP2xx - Deactivation and teardown)
// =============================================================================

/// FP201: Deactivation signal with no owning provider.
pub const FP201: Diagnostic = Diagnostic::warning(
    "FP201",
    "deactivation signal received with no owning provider",
)
.with_note("the instance is abandoned instead of being returned to a reserve");

/// FP202: Provider dropped while instances were still on loan.
pub const FP202: Diagnostic = Diagnostic::warning(
    "FP202",
    "pool provider dropped with instances still on loan",
)
.with_help("call return_all(true) before dropping the provider");

// =============================================================================
// Predefined diagnostics (FP3xx - Handles)
// =============================================================================

/// FP301: Handle used with the wrong provider.
pub const FP301: Diagnostic = Diagnostic::error(
    "FP301",
    "pool handle does not belong to this provider",
)
.with_note("handles are bound to the provider and type that produced them");

/// FP302: Handle from an earlier loan of the instance.
pub const FP302: Diagnostic = Diagnostic::error(
    "FP302",
    "pool handle refers to an earlier loan of this instance",
)
.with_note("an instance is lent out again after it returns; old handles are invalidated")
.with_help("drop handles once their instance is returned");
