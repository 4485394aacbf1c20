//! `RocksDB` storage layer for callcoach entitlements.
//!
//! This crate provides persistent storage for accounts, subscriptions, trial
//! credit balances, and usage periods using `RocksDB` with column families.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: Primary account records, keyed by `account_id`
//! - `accounts_by_external`: Index from external identity to account id
//! - `subscriptions`: Subscription records, keyed by `account_id`
//! - `trial_credits`: Trial credit balances, keyed by `account_id`
//! - `usage_periods`: Current metering periods, keyed by `account_id`
//!
//! # The one atomic primitive
//!
//! The entitlements read path performs exactly one write: the idempotent
//! account upsert keyed on the external identity. [`Store::upsert_account`]
//! is an atomic insert-if-absent, safe under concurrent first access by the
//! same identity; everywhere else, plain reads suffice.
//!
//! # Example
//!
//! ```no_run
//! use callcoach_store::{RocksStore, Store};
//! use callcoach_core::ExternalUserId;
//!
//! let store = RocksStore::open("/tmp/callcoach-db").unwrap();
//!
//! let external = ExternalUserId::parse("user_2fT9qLx8").unwrap();
//! let account = store.upsert_account(&external).unwrap();
//! let again = store.upsert_account(&external).unwrap();
//! assert_eq!(account.id, again.id);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use callcoach_core::{
    Account, AccountId, ExternalUserId, SubscriptionRecord, TrialCreditBalance, UsagePeriod,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory or failing stubs for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Resolve or create the account for an external identity.
    ///
    /// Atomic insert-if-absent: concurrent first access by the same identity
    /// yields exactly one account. Repeated calls return the same record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn upsert_account(&self, external_id: &ExternalUserId) -> Result<Account>;

    /// Get an account by its internal id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>>;

    /// Get an account through the external-identity index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account_by_external(&self, external_id: &ExternalUserId) -> Result<Option<Account>>;

    // =========================================================================
    // Trial Credit Operations
    // =========================================================================

    /// Get the trial credit balance for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_trial_balance(&self, account_id: &AccountId) -> Result<Option<TrialCreditBalance>>;

    /// Insert or replace a trial credit balance row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_trial_balance(&self, balance: &TrialCreditBalance) -> Result<()>;

    /// Consume one trial call credit. Belongs to the call-lifecycle flow,
    /// not the entitlements read path.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no balance row exists.
    /// - `StoreError::TrialCreditsExhausted` if `remaining_credits` is zero;
    ///   the balance never goes negative.
    fn consume_trial_credit(&self, account_id: &AccountId) -> Result<TrialCreditBalance>;

    /// Record a purchased trial pack: adds credits and increments the
    /// purchase count. Belongs to the purchase flow, not the read path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no balance row exists.
    fn record_trial_pack(&self, account_id: &AccountId, credits: u32)
        -> Result<TrialCreditBalance>;

    // =========================================================================
    // Subscription Operations
    // =========================================================================

    /// Get the subscription record for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_subscription(&self, account_id: &AccountId) -> Result<Option<SubscriptionRecord>>;

    /// Insert or replace the subscription record. Written by payment-webhook
    /// handling; the status write must follow the lifecycle state machine.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidTransition` if the stored status cannot
    /// legally transition to the written one.
    fn put_subscription(&self, record: &SubscriptionRecord) -> Result<()>;

    // =========================================================================
    // Usage Operations
    // =========================================================================

    /// Get the current usage period for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_usage_period(&self, account_id: &AccountId) -> Result<Option<UsagePeriod>>;

    /// Insert or replace the usage period row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_usage_period(&self, period: &UsagePeriod) -> Result<()>;

    /// Accumulate consumed tokens. Consumption may exceed the allotment;
    /// that excess is the overage signal. Belongs to the call-completion
    /// flow, not the read path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no period row exists.
    fn add_tokens_consumed(&self, account_id: &AccountId, tokens: u64) -> Result<UsagePeriod>;

    /// Administrative reset: the only path that reduces `tokens_consumed`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no period row exists.
    fn reset_usage_period(&self, account_id: &AccountId) -> Result<UsagePeriod>;
}
