//! Integration tests for the entitlements engine.

mod common;

use common::TestHarness;

use callcoach_core::{
    Account, AccountId, ExternalUserId, Plan, SubscriptionRecord, SubscriptionStatus,
    TrialCreditBalance, UsagePeriod, DEFAULT_TRIAL_CREDITS, FREE_PLAN_MAX_CALL_SECONDS,
    MAX_TRIAL_PACKS, PRO_PLAN_MAX_CALL_SECONDS, STANDARD_PLAN_MAX_CALL_SECONDS,
};
use callcoach_entitlements::{
    EntitlementsConfig, EntitlementsEngine, EntitlementsError, PersonalityCatalog,
};
use callcoach_store::{Store, StoreError};
use std::sync::Arc;

#[test]
fn new_account_gets_trial_defaults() {
    let harness = TestHarness::new();

    let entitlements = harness.engine.compute("user_new").unwrap();

    assert_eq!(entitlements.plan, Plan::Free);
    assert!(entitlements.can_call);
    assert_eq!(entitlements.trial_calls_remaining, DEFAULT_TRIAL_CREDITS);
    assert_eq!(entitlements.tokens_remaining, 0);
    assert!(!entitlements.is_overage);
    assert_eq!(entitlements.trial_purchases_count, 0);
    assert!(entitlements.can_buy_another_trial);
    assert_eq!(
        entitlements.max_call_duration_seconds,
        FREE_PLAN_MAX_CALL_SECONDS
    );
    assert_eq!(
        entitlements.subscription_status,
        SubscriptionStatus::None
    );

    // Only trial-tier, non-boss personalities are reachable.
    let unlocked: Vec<&str> = entitlements
        .unlocked_personalities
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(unlocked, ["curious-callie", "small-biz-sam"]);
    assert!(entitlements.unlocked_personalities.iter().all(|p| !p.is_boss));
}

#[test]
fn trial_credits_allow_calling_regardless_of_status() {
    let harness = TestHarness::new();
    let account = harness.account("user_1");
    harness.set_subscription(account.id, Plan::Standard, SubscriptionStatus::Canceled);
    harness.set_trial(account.id, 2, 0);

    let entitlements = harness.engine.compute("user_1").unwrap();

    assert!(entitlements.can_call);
    assert_eq!(entitlements.trial_calls_remaining, 2);
    assert_eq!(entitlements.subscription_status, SubscriptionStatus::Canceled);
}

#[test]
fn canceled_with_no_trial_credits_blocks_calling() {
    let harness = TestHarness::new();
    let account = harness.account("user_1");
    harness.set_subscription(account.id, Plan::Standard, SubscriptionStatus::Canceled);
    harness.set_trial(account.id, 0, 1);

    let entitlements = harness.engine.compute("user_1").unwrap();

    assert!(!entitlements.can_call);
    assert_eq!(entitlements.subscription_status, SubscriptionStatus::Canceled);
    // Not an error: the outcome is reported through the fields.
    assert_eq!(entitlements.trial_calls_remaining, 0);
}

#[test]
fn no_subscription_and_no_trial_credits_blocks_calling() {
    let harness = TestHarness::new();
    let account = harness.account("user_1");
    harness.set_trial(account.id, 0, 0);

    let entitlements = harness.engine.compute("user_1").unwrap();

    assert!(!entitlements.can_call);
    assert_eq!(entitlements.subscription_status, SubscriptionStatus::None);
    assert!(entitlements.can_buy_another_trial);
}

#[test]
fn active_plan_in_overage_stays_callable() {
    let harness = TestHarness::new();
    let account = harness.account("user_1");
    harness.set_subscription(account.id, Plan::Standard, SubscriptionStatus::Active);
    harness.set_trial(account.id, 0, 0);
    harness.set_usage(account.id, 1000, 1200);

    let entitlements = harness.engine.compute("user_1").unwrap();

    assert!(entitlements.is_overage);
    assert_eq!(entitlements.tokens_remaining, 0);
    // Pinned by ACTIVE_OVERAGE_ALLOWS_CALLS: the exhausted allotment does
    // not block an active subscriber; the excess bills as overage.
    assert!(entitlements.can_call);
    assert_eq!(
        entitlements.max_call_duration_seconds,
        STANDARD_PLAN_MAX_CALL_SECONDS
    );
}

#[test]
fn past_due_grace_keeps_calling_with_everything_exhausted() {
    let harness = TestHarness::new();
    let account = harness.account("user_1");
    harness.set_subscription(account.id, Plan::Standard, SubscriptionStatus::PastDue);
    harness.set_trial(account.id, 0, MAX_TRIAL_PACKS);
    harness.set_usage(account.id, 1000, 1500);

    let entitlements = harness.engine.compute("user_1").unwrap();

    // Pinned by PAST_DUE_GRACE_ALLOWS_CALLS: callable-with-warning; the
    // billing UI surfaces the state via subscription_status.
    assert!(entitlements.can_call);
    assert_eq!(entitlements.subscription_status, SubscriptionStatus::PastDue);
    assert!(entitlements.is_overage);
    assert!(!entitlements.can_buy_another_trial);
}

#[test]
fn boss_personalities_locked_without_active_subscription() {
    let harness = TestHarness::new();

    // No subscription at all: every boss is locked.
    let entitlements = harness.engine.compute("user_none").unwrap();
    assert!(entitlements.unlocked_personalities.iter().all(|p| !p.is_boss));

    // Past due keeps paid tier but loses the boss capability.
    let account = harness.account("user_pastdue");
    harness.set_subscription(account.id, Plan::Pro, SubscriptionStatus::PastDue);
    let entitlements = harness.engine.compute("user_pastdue").unwrap();

    assert!(entitlements.unlocked_personalities.iter().all(|p| !p.is_boss));
    assert!(entitlements.locked_personalities.iter().all(|p| p.is_boss));
    // Paid-tier non-boss personalities are still reachable.
    assert!(entitlements
        .unlocked_personalities
        .iter()
        .any(|p| p.id == "budget-hawk-harper"));
}

#[test]
fn active_subscription_unlocks_bosses() {
    let harness = TestHarness::new();
    let account = harness.account("user_1");
    harness.set_subscription(account.id, Plan::Standard, SubscriptionStatus::Active);

    let entitlements = harness.engine.compute("user_1").unwrap();

    assert!(entitlements.locked_personalities.is_empty());
    assert!(entitlements
        .unlocked_personalities
        .iter()
        .any(|p| p.is_boss));
}

#[test]
fn trialing_subscription_unlocks_bosses_and_calls() {
    let harness = TestHarness::new();
    let account = harness.account("user_1");
    harness.set_subscription(account.id, Plan::Pro, SubscriptionStatus::Trialing);
    harness.set_trial(account.id, 0, 0);

    let entitlements = harness.engine.compute("user_1").unwrap();

    assert!(entitlements.can_call);
    assert!(entitlements.locked_personalities.is_empty());
    assert_eq!(
        entitlements.max_call_duration_seconds,
        PRO_PLAN_MAX_CALL_SECONDS
    );
}

#[test]
fn unlocked_and_locked_partition_the_catalog() {
    let harness = TestHarness::new();
    let catalog_len = PersonalityCatalog::default().list_all().len();

    for (external, plan, status) in [
        ("user_a", Plan::Free, None),
        ("user_b", Plan::Standard, Some(SubscriptionStatus::Active)),
        ("user_c", Plan::Standard, Some(SubscriptionStatus::PastDue)),
        ("user_d", Plan::Pro, Some(SubscriptionStatus::Canceled)),
    ] {
        let account = harness.account(external);
        if let Some(status) = status {
            harness.set_subscription(account.id, plan, status);
        }

        let entitlements = harness.engine.compute(external).unwrap();
        let mut ids: Vec<String> = entitlements
            .unlocked_personalities
            .iter()
            .chain(entitlements.locked_personalities.iter())
            .map(|p| p.id.clone())
            .collect();

        assert_eq!(ids.len(), catalog_len);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog_len, "partition must not overlap");
    }
}

#[test]
fn pack_cap_blocks_repurchase_regardless_of_credits() {
    let harness = TestHarness::new();
    let account = harness.account("user_1");
    harness.set_trial(account.id, 10, MAX_TRIAL_PACKS);

    let entitlements = harness.engine.compute("user_1").unwrap();

    assert!(!entitlements.can_buy_another_trial);
    assert_eq!(entitlements.trial_calls_remaining, 10);
    assert_eq!(entitlements.trial_purchases_count, MAX_TRIAL_PACKS);
}

#[test]
fn compute_is_idempotent() {
    let harness = TestHarness::new();
    let account = harness.account("user_1");
    harness.set_subscription(account.id, Plan::Standard, SubscriptionStatus::Active);
    harness.set_trial(account.id, 3, 1);
    harness.set_usage(account.id, 1000, 400);

    let first = harness.engine.compute("user_1").unwrap();
    let second = harness.engine.compute("user_1").unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn invalid_identity_fails_before_storage() {
    let harness = TestHarness::new();

    for bad in ["", "   ", "user\u{7}id"] {
        let result = harness.engine.compute(bad);
        assert!(matches!(result, Err(EntitlementsError::InvalidIdentity(_))));
    }

    let oversized = "x".repeat(300);
    assert!(matches!(
        harness.engine.compute(&oversized),
        Err(EntitlementsError::InvalidIdentity(_))
    ));
}

#[test]
fn storage_failure_aborts_with_account_lookup_error() {
    let engine = EntitlementsEngine::new(
        Arc::new(FailingStore),
        PersonalityCatalog::default(),
        EntitlementsConfig::default(),
    )
    .unwrap();

    let result = engine.compute("user_1");
    assert!(matches!(result, Err(EntitlementsError::AccountLookup(_))));
}

/// A store whose every operation fails, for exercising the abort path.
struct FailingStore;

impl FailingStore {
    fn fail<T>() -> callcoach_store::Result<T> {
        Err(StoreError::Database("injected failure".into()))
    }
}

impl Store for FailingStore {
    fn upsert_account(&self, _: &ExternalUserId) -> callcoach_store::Result<Account> {
        Self::fail()
    }

    fn get_account(&self, _: &AccountId) -> callcoach_store::Result<Option<Account>> {
        Self::fail()
    }

    fn get_account_by_external(
        &self,
        _: &ExternalUserId,
    ) -> callcoach_store::Result<Option<Account>> {
        Self::fail()
    }

    fn get_trial_balance(
        &self,
        _: &AccountId,
    ) -> callcoach_store::Result<Option<TrialCreditBalance>> {
        Self::fail()
    }

    fn put_trial_balance(&self, _: &TrialCreditBalance) -> callcoach_store::Result<()> {
        Self::fail()
    }

    fn consume_trial_credit(&self, _: &AccountId) -> callcoach_store::Result<TrialCreditBalance> {
        Self::fail()
    }

    fn record_trial_pack(
        &self,
        _: &AccountId,
        _: u32,
    ) -> callcoach_store::Result<TrialCreditBalance> {
        Self::fail()
    }

    fn get_subscription(
        &self,
        _: &AccountId,
    ) -> callcoach_store::Result<Option<SubscriptionRecord>> {
        Self::fail()
    }

    fn put_subscription(&self, _: &SubscriptionRecord) -> callcoach_store::Result<()> {
        Self::fail()
    }

    fn get_usage_period(&self, _: &AccountId) -> callcoach_store::Result<Option<UsagePeriod>> {
        Self::fail()
    }

    fn put_usage_period(&self, _: &UsagePeriod) -> callcoach_store::Result<()> {
        Self::fail()
    }

    fn add_tokens_consumed(&self, _: &AccountId, _: u64) -> callcoach_store::Result<UsagePeriod> {
        Self::fail()
    }

    fn reset_usage_period(&self, _: &AccountId) -> callcoach_store::Result<UsagePeriod> {
        Self::fail()
    }
}
