//! Common test utilities for entitlements integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use callcoach_core::{
    Account, AccountId, ExternalUserId, Plan, SubscriptionRecord, SubscriptionStatus,
    TrialCreditBalance, UsagePeriod,
};
use callcoach_entitlements::{EntitlementsConfig, EntitlementsEngine, PersonalityCatalog};
use callcoach_store::{RocksStore, Store};

/// Test harness containing everything needed for engine integration tests.
pub struct TestHarness {
    /// The engine under test.
    pub engine: EntitlementsEngine,
    /// Direct store access for seeding state.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with a fresh database and default config/catalog.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let engine = EntitlementsEngine::new(
            Arc::clone(&store) as Arc<dyn Store>,
            PersonalityCatalog::default(),
            EntitlementsConfig::default(),
        )
        .expect("default config is valid");

        Self {
            engine,
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Create (or fetch) the account for an external id.
    pub fn account(&self, external: &str) -> Account {
        self.store
            .upsert_account(&ExternalUserId::parse(external).unwrap())
            .unwrap()
    }

    /// Seed a subscription with the given plan and status.
    ///
    /// Statuses that cannot legally enter from `None` are reached by walking
    /// through `Active` first, the way a real record history would.
    pub fn set_subscription(&self, account_id: AccountId, plan: Plan, status: SubscriptionStatus) {
        let needs_entry = matches!(
            status,
            SubscriptionStatus::PastDue | SubscriptionStatus::Canceled
        ) && self.store.get_subscription(&account_id).unwrap().is_none();

        if needs_entry {
            self.put_status(account_id, plan, SubscriptionStatus::Active);
        }
        self.put_status(account_id, plan, status);
    }

    fn put_status(&self, account_id: AccountId, plan: Plan, status: SubscriptionStatus) {
        let now = Utc::now();
        self.store
            .put_subscription(&SubscriptionRecord::new(
                account_id,
                plan,
                status,
                now,
                now + chrono::Duration::days(30),
            ))
            .unwrap();
    }

    /// Seed the trial credit balance row.
    pub fn set_trial(&self, account_id: AccountId, remaining: u32, purchases: u32) {
        self.store
            .put_trial_balance(&TrialCreditBalance {
                account_id,
                remaining_credits: remaining,
                purchase_count: purchases,
            })
            .unwrap();
    }

    /// Seed the usage period row.
    pub fn set_usage(&self, account_id: AccountId, allotment: u64, consumed: u64) {
        let now = Utc::now();
        let mut period = UsagePeriod::empty(
            account_id,
            allotment,
            now,
            now + chrono::Duration::days(30),
        );
        period.tokens_consumed = consumed;
        self.store.put_usage_period(&period).unwrap();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
