//! Error types for the entitlements engine.

use callcoach_core::{IdError, Plan};
use callcoach_store::StoreError;

/// Errors that can occur when computing entitlements.
///
/// Lack of entitlement is never an error: it is expressed as
/// `can_call = false` with informative fields. These variants exist so an
/// engine failure is always distinguishable from a legitimate "not entitled"
/// business outcome.
#[derive(Debug, thiserror::Error)]
pub enum EntitlementsError {
    /// The external user id is empty or malformed. Raised before any
    /// storage access.
    #[error("invalid external user id: {0}")]
    InvalidIdentity(#[source] IdError),

    /// A storage collaborator failed. The computation is aborted; partial
    /// entitlements are never returned.
    #[error("account lookup failed: {0}")]
    AccountLookup(#[from] StoreError),

    /// A plan has no call duration cap configured. Defended at startup by
    /// [`crate::EntitlementsConfig::validate`]; never silently defaulted.
    #[error("no call duration cap configured for plan {plan:?}")]
    Configuration {
        /// The plan missing from the duration table.
        plan: Plan,
    },
}

/// Errors raised by configuration validation at engine startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A plan is missing from the call-duration table.
    #[error("missing max call duration for plan {plan:?}")]
    MissingDurationCap {
        /// The absent plan.
        plan: Plan,
    },

    /// A plan's configured cap is zero, which would forbid all calls on it.
    #[error("max call duration for plan {plan:?} must be positive")]
    ZeroDurationCap {
        /// The misconfigured plan.
        plan: Plan,
    },
}
