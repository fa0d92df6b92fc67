//! Pool error type.

use crate::diagnostics::{Diagnostic, FP001, FP002, FP003, FP004, FP101, FP102, FP301, FP302};

/// Errors returned by pool operations.
///
/// Configuration errors should surface at startup (provider construction) so
/// that a runtime `get` failure really means a missing preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The provider was configured without a pool scope.
    MissingPoolScope,
    /// No reserve instance and no preset for the requested type.
    NoFactoryPreset {
        /// Requested type.
        type_name: &'static str,
    },
    /// Several presets were registered for one concrete type.
    AmbiguousPreset {
        /// Type with more than one preset.
        type_name: &'static str,
    },
    /// An ambient provider is already installed on this thread.
    ProviderAlreadyInstalled,
    /// An instance was borrowed before a provider initialized it.
    NotInitialized,
    /// An instance was borrowed while already on loan.
    AlreadyBorrowed,
    /// The handle belongs to another provider or another type.
    ForeignHandle,
    /// The handle was issued for an earlier loan of the instance.
    StaleHandle,
}

impl PoolError {
    /// Check whether this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PoolError::MissingPoolScope
                | PoolError::NoFactoryPreset { .. }
                | PoolError::AmbiguousPreset { .. }
                | PoolError::ProviderAlreadyInstalled
        )
    }

    /// Check whether this error signals a lifecycle programming defect.
    pub fn is_lifecycle_misuse(&self) -> bool {
        matches!(self, PoolError::NotInitialized | PoolError::AlreadyBorrowed)
    }

    /// The predefined diagnostic describing this error.
    pub fn diagnostic(&self) -> &'static Diagnostic {
        match self {
            PoolError::MissingPoolScope => &FP001,
            PoolError::NoFactoryPreset { .. } => &FP002,
            PoolError::AmbiguousPreset { .. } => &FP003,
            PoolError::ProviderAlreadyInstalled => &FP004,
            PoolError::NotInitialized => &FP101,
            PoolError::AlreadyBorrowed => &FP102,
            PoolError::ForeignHandle => &FP301,
            PoolError::StaleHandle => &FP302,
        }
    }
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::MissingPoolScope => write!(f, "pool scope is not configured"),
            PoolError::NoFactoryPreset { type_name } => {
                write!(f, "there is no factory preset for {} poolable type", type_name)
            }
            PoolError::AmbiguousPreset { type_name } => {
                write!(f, "more than one preset registered for {}", type_name)
            }
            PoolError::ProviderAlreadyInstalled => {
                write!(f, "an ambient pool provider is already installed")
            }
            PoolError::NotInitialized => {
                write!(f, "poolable has not been initialized by a pool provider")
            }
            PoolError::AlreadyBorrowed => write!(f, "poolable is already borrowed"),
            PoolError::ForeignHandle => write!(f, "handle does not belong to this provider"),
            PoolError::StaleHandle => write!(f, "handle refers to an earlier loan"),
        }
    }
}

impl std::error::Error for PoolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(PoolError::MissingPoolScope.is_configuration());
        assert!(PoolError::NoFactoryPreset { type_name: "Spark" }.is_configuration());
        assert!(!PoolError::AlreadyBorrowed.is_configuration());
        assert!(PoolError::NotInitialized.is_lifecycle_misuse());
        assert!(!PoolError::ForeignHandle.is_lifecycle_misuse());
        assert!(!PoolError::StaleHandle.is_configuration());
        assert_eq!(PoolError::StaleHandle.diagnostic().code, "FP302");
    }

    #[test]
    fn test_display_names_type() {
        let err = PoolError::NoFactoryPreset { type_name: "game::Spark" };
        assert!(err.to_string().contains("game::Spark"));
        assert_eq!(err.diagnostic().code, "FP002");
    }
}
