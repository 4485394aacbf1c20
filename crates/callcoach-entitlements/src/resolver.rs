//! Subscription status resolution.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use callcoach_core::{Account, Plan, SubscriptionStatus};
use callcoach_store::{Result, Store};

/// The normalized view of an account's subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSubscription {
    /// The effective plan (`Free` when no record exists).
    pub plan: Plan,

    /// Raw lifecycle status (`None` when no record exists).
    pub status: SubscriptionStatus,

    /// Token allotment for the current billing period.
    pub token_allotment: u64,

    /// Billing period boundaries, when a record exists.
    pub period: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

/// Derives the normalized subscription state from the locally synchronized
/// record.
///
/// This component reports the raw status only. Policy about what a status
/// permits (whether `past_due` blocks calling, which statuses unlock boss
/// personalities) is decided centrally in the engine, never here.
pub struct SubscriptionStatusResolver {
    store: Arc<dyn Store>,
}

impl SubscriptionStatusResolver {
    /// Create a resolver over a store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resolve the plan, status, and allotment for an account.
    ///
    /// An absent record is equivalent to `{Free, None, 0}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn resolve(&self, account: &Account) -> Result<ResolvedSubscription> {
        let Some(record) = self.store.get_subscription(&account.id)? else {
            return Ok(ResolvedSubscription {
                plan: Plan::Free,
                status: SubscriptionStatus::None,
                token_allotment: 0,
                period: None,
            });
        };

        Ok(ResolvedSubscription {
            plan: record.plan,
            status: record.status,
            token_allotment: record.token_allotment,
            period: Some((record.current_period_start, record.current_period_end)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callcoach_core::{ExternalUserId, SubscriptionRecord, STANDARD_PLAN_MONTHLY_TOKENS};
    use callcoach_store::RocksStore;
    use tempfile::TempDir;

    fn create_test_resolver() -> (SubscriptionStatusResolver, Arc<RocksStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let resolver = SubscriptionStatusResolver::new(Arc::clone(&store) as Arc<dyn Store>);
        (resolver, store, dir)
    }

    #[test]
    fn absent_record_resolves_to_free_none() {
        let (resolver, store, _dir) = create_test_resolver();
        let account = store
            .upsert_account(&ExternalUserId::parse("user_1").unwrap())
            .unwrap();

        let resolved = resolver.resolve(&account).unwrap();
        assert_eq!(resolved.plan, Plan::Free);
        assert_eq!(resolved.status, SubscriptionStatus::None);
        assert_eq!(resolved.token_allotment, 0);
        assert!(resolved.period.is_none());
    }

    #[test]
    fn present_record_passes_through_raw_status() {
        let (resolver, store, _dir) = create_test_resolver();
        let account = store
            .upsert_account(&ExternalUserId::parse("user_1").unwrap())
            .unwrap();

        let now = Utc::now();
        let mut record = SubscriptionRecord::new(
            account.id,
            Plan::Standard,
            SubscriptionStatus::Active,
            now,
            now + chrono::Duration::days(30),
        );
        store.put_subscription(&record).unwrap();
        record.status = SubscriptionStatus::PastDue;
        store.put_subscription(&record).unwrap();

        let resolved = resolver.resolve(&account).unwrap();
        assert_eq!(resolved.plan, Plan::Standard);
        assert_eq!(resolved.status, SubscriptionStatus::PastDue);
        assert_eq!(resolved.token_allotment, STANDARD_PLAN_MONTHLY_TOKENS);
        assert!(resolved.period.is_some());
    }
}
