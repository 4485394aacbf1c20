//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, MultiThreaded, Options,
    WriteBatch,
};

use callcoach_core::{
    Account, AccountId, ExternalUserId, SubscriptionRecord, SubscriptionStatus,
    TrialCreditBalance, UsagePeriod,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,

    // Serializes the check-insert pair in `upsert_account` so concurrent
    // first access by one identity cannot mint two accounts.
    upsert_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            upsert_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read and decode one account-keyed row.
    fn get_row<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        account_id: &AccountId,
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        let key = keys::account_key(account_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Encode and write one account-keyed row.
    fn put_row<T: serde::Serialize>(
        &self,
        cf_name: &str,
        account_id: &AccountId,
        value: &T,
    ) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let key = keys::account_key(account_id);
        let value = Self::serialize(value)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn upsert_account(&self, external_id: &ExternalUserId) -> Result<Account> {
        // Fast path: the identity is already mapped.
        if let Some(account) = self.get_account_by_external(external_id)? {
            return Ok(account);
        }

        let _guard = self
            .upsert_lock
            .lock()
            .map_err(|_| StoreError::Database("upsert lock poisoned".into()))?;

        // Re-check under the lock; another upsert may have won the race.
        if let Some(account) = self.get_account_by_external(external_id)? {
            return Ok(account);
        }

        let account = Account::new(external_id.clone());

        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_by_external = self.cf(cf::ACCOUNTS_BY_EXTERNAL)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_accounts,
            keys::account_key(&account.id),
            Self::serialize(&account)?,
        );
        batch.put_cf(
            &cf_by_external,
            keys::external_account_key(external_id),
            account.id.as_bytes(),
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(account)
    }

    fn get_account(&self, account_id: &AccountId) -> Result<Option<Account>> {
        self.get_row(cf::ACCOUNTS, account_id)
    }

    fn get_account_by_external(&self, external_id: &ExternalUserId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS_BY_EXTERNAL)?;
        let key = keys::external_account_key(external_id);

        let Some(value) = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let account_id = keys::decode_account_id(&value)
            .ok_or_else(|| StoreError::Database("corrupt external-identity index".into()))?;

        self.get_account(&account_id)
    }

    // =========================================================================
    // Trial Credit Operations
    // =========================================================================

    fn get_trial_balance(&self, account_id: &AccountId) -> Result<Option<TrialCreditBalance>> {
        self.get_row(cf::TRIAL_CREDITS, account_id)
    }

    fn put_trial_balance(&self, balance: &TrialCreditBalance) -> Result<()> {
        self.put_row(cf::TRIAL_CREDITS, &balance.account_id, balance)
    }

    fn consume_trial_credit(&self, account_id: &AccountId) -> Result<TrialCreditBalance> {
        let mut balance = self
            .get_trial_balance(account_id)?
            .ok_or(StoreError::NotFound)?;

        if balance.remaining_credits == 0 {
            return Err(StoreError::TrialCreditsExhausted {
                account_id: account_id.to_string(),
            });
        }

        balance.remaining_credits -= 1;
        self.put_trial_balance(&balance)?;

        Ok(balance)
    }

    fn record_trial_pack(
        &self,
        account_id: &AccountId,
        credits: u32,
    ) -> Result<TrialCreditBalance> {
        let mut balance = self
            .get_trial_balance(account_id)?
            .ok_or(StoreError::NotFound)?;

        balance.remaining_credits = balance.remaining_credits.saturating_add(credits);
        balance.purchase_count = balance.purchase_count.saturating_add(1);
        self.put_trial_balance(&balance)?;

        Ok(balance)
    }

    // =========================================================================
    // Subscription Operations
    // =========================================================================

    fn get_subscription(&self, account_id: &AccountId) -> Result<Option<SubscriptionRecord>> {
        self.get_row(cf::SUBSCRIPTIONS, account_id)
    }

    fn put_subscription(&self, record: &SubscriptionRecord) -> Result<()> {
        let current = self
            .get_subscription(&record.account_id)?
            .map_or(SubscriptionStatus::None, |existing| existing.status);

        if !current.can_transition_to(record.status) {
            return Err(StoreError::InvalidTransition {
                from: current,
                to: record.status,
            });
        }

        self.put_row(cf::SUBSCRIPTIONS, &record.account_id, record)
    }

    // =========================================================================
    // Usage Operations
    // =========================================================================

    fn get_usage_period(&self, account_id: &AccountId) -> Result<Option<UsagePeriod>> {
        self.get_row(cf::USAGE_PERIODS, account_id)
    }

    fn put_usage_period(&self, period: &UsagePeriod) -> Result<()> {
        self.put_row(cf::USAGE_PERIODS, &period.account_id, period)
    }

    fn add_tokens_consumed(&self, account_id: &AccountId, tokens: u64) -> Result<UsagePeriod> {
        let mut period = self
            .get_usage_period(account_id)?
            .ok_or(StoreError::NotFound)?;

        period.tokens_consumed = period.tokens_consumed.saturating_add(tokens);
        self.put_usage_period(&period)?;

        Ok(period)
    }

    fn reset_usage_period(&self, account_id: &AccountId) -> Result<UsagePeriod> {
        let mut period = self
            .get_usage_period(account_id)?
            .ok_or(StoreError::NotFound)?;

        period.tokens_consumed = 0;
        self.put_usage_period(&period)?;

        Ok(period)
    }
}
