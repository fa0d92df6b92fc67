//! Diagnostic macros for user-facing API.

/// Emit a runtime diagnostic.
///
/// # Example
///
/// ```rust,ignore
/// fp_diagnostic!(
///     Warning,
///     code = "FP900",
///     message = "effect adapter missed its fade-out deadline",
///     help = "call Activation::disable() from on_update once the fade ends"
/// );
/// ```
#[macro_export]
macro_rules! fp_diagnostic {
    (
        $kind:ident,
        code = $code:expr,
        message = $msg:expr
        $(, note = $note:expr)?
        $(, help = $help:expr)?
    ) => {{
        let diag = $crate::diagnostics::Diagnostic {
            kind: $crate::diagnostics::DiagnosticKind::$kind,
            code: $code,
            message: $msg,
            note: None $(.or(Some($note)))?,
            help: None $(.or(Some($help)))?,
        };
        $crate::diagnostics::emit::emit(&diag);
    }};
}

/// Emit a predefined diagnostic by code.
///
/// # Example
///
/// ```rust,ignore
/// fp_emit!(FP101);
/// ```
#[macro_export]
macro_rules! fp_emit {
    ($code:ident) => {{
        $crate::diagnostics::emit::emit(&$crate::diagnostics::$code);
    }};
}

/// Assert a condition or emit a diagnostic.
///
/// # Example
///
/// ```rust,ignore
/// fp_assert!(lifecycle.is_initialized(), FP101);
/// ```
#[macro_export]
macro_rules! fp_assert {
    ($cond:expr, $code:ident) => {{
        if !$cond {
            $crate::fp_emit!($code);
        }
    }};
}
