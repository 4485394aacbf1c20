//! Error types for callcoach storage.

use callcoach_core::SubscriptionStatus;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// Trial credit balance is already exhausted.
    #[error("trial credits exhausted for account {account_id}")]
    TrialCreditsExhausted {
        /// The account whose balance is empty.
        account_id: String,
    },

    /// Subscription status write violates the lifecycle state machine.
    #[error("invalid subscription transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// Status currently stored (or `None` when no record exists).
        from: SubscriptionStatus,
        /// Status the write attempted to store.
        to: SubscriptionStatus,
    },
}
