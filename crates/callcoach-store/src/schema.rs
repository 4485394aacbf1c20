//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary account records, keyed by `account_id`.
    pub const ACCOUNTS: &str = "accounts";

    /// Index: external identity to internal account id, keyed by the raw
    /// external id bytes. Value is the 16-byte account id.
    pub const ACCOUNTS_BY_EXTERNAL: &str = "accounts_by_external";

    /// Subscription records, keyed by `account_id`.
    pub const SUBSCRIPTIONS: &str = "subscriptions";

    /// Trial credit balances, keyed by `account_id`.
    pub const TRIAL_CREDITS: &str = "trial_credits";

    /// Current usage periods, keyed by `account_id`.
    pub const USAGE_PERIODS: &str = "usage_periods";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::ACCOUNTS_BY_EXTERNAL,
        cf::SUBSCRIPTIONS,
        cf::TRIAL_CREDITS,
        cf::USAGE_PERIODS,
    ]
}
