//! The usage meter.

use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};

use callcoach_core::{Account, UsagePeriod};
use callcoach_store::{Result, Store};

use crate::resolver::ResolvedSubscription;

/// Read-path view over metered token consumption.
pub struct UsageMeter {
    store: Arc<dyn Store>,
}

impl UsageMeter {
    /// Create a meter over a store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Load the current usage period for an account.
    ///
    /// When no row exists yet (nothing consumed this period), an ephemeral
    /// empty period is synthesized from the resolved subscription and NOT
    /// persisted; the read path writes nothing here.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn current_period(
        &self,
        account: &Account,
        resolved: &ResolvedSubscription,
    ) -> Result<UsagePeriod> {
        if let Some(period) = self.store.get_usage_period(&account.id)? {
            return Ok(period);
        }

        let (start, end) = resolved
            .period
            .unwrap_or_else(|| calendar_month_window(Utc::now()));
        Ok(UsagePeriod::empty(
            account.id,
            resolved.token_allotment,
            start,
            end,
        ))
    }

    /// Tokens remaining in the period. Never negative, even in overage.
    #[must_use]
    pub fn tokens_remaining(period: &UsagePeriod) -> u64 {
        period.token_allotment.saturating_sub(period.tokens_consumed)
    }

    /// Whether consumption has crossed into billable overage.
    ///
    /// True iff consumption exceeds a POSITIVE allotment. A zero-allotment
    /// free account is never "overage"; it is merely out of tokens
    /// (`tokens_remaining == 0`), a different user-facing branch: overage
    /// means a billable event on a paying plan, while zero-remaining-on-free
    /// means "upgrade or buy trial credits".
    #[must_use]
    pub fn is_overage(period: &UsagePeriod) -> bool {
        period.token_allotment > 0 && period.tokens_consumed > period.token_allotment
    }
}

/// The calendar-month window containing `now`, used for accounts with no
/// subscription period to anchor to.
fn calendar_month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    let (next_year, next_month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use callcoach_core::{AccountId, ExternalUserId, Plan, SubscriptionStatus};
    use callcoach_store::RocksStore;
    use tempfile::TempDir;

    fn period(allotment: u64, consumed: u64) -> UsagePeriod {
        let now = Utc::now();
        let mut period = UsagePeriod::empty(
            AccountId::generate(),
            allotment,
            now,
            now + chrono::Duration::days(30),
        );
        period.tokens_consumed = consumed;
        period
    }

    #[test]
    fn tokens_remaining_never_negative() {
        assert_eq!(UsageMeter::tokens_remaining(&period(1000, 0)), 1000);
        assert_eq!(UsageMeter::tokens_remaining(&period(1000, 1000)), 0);
        assert_eq!(UsageMeter::tokens_remaining(&period(1000, 1200)), 0);
        assert_eq!(UsageMeter::tokens_remaining(&period(1000, u64::MAX)), 0);
    }

    #[test]
    fn overage_requires_positive_allotment() {
        assert!(UsageMeter::is_overage(&period(1000, 1200)));
        assert!(!UsageMeter::is_overage(&period(1000, 1000)));
        assert!(!UsageMeter::is_overage(&period(1000, 999)));

        // Zero-allotment free accounts are out of tokens, never "overage".
        assert!(!UsageMeter::is_overage(&period(0, 0)));
        assert!(!UsageMeter::is_overage(&period(0, 500)));
    }

    #[test]
    fn synthesized_period_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let meter = UsageMeter::new(Arc::clone(&store) as Arc<dyn Store>);

        let account = store
            .upsert_account(&ExternalUserId::parse("user_1").unwrap())
            .unwrap();
        let resolved = ResolvedSubscription {
            plan: Plan::Free,
            status: SubscriptionStatus::None,
            token_allotment: 0,
            period: None,
        };

        let period = meter.current_period(&account, &resolved).unwrap();
        assert_eq!(period.tokens_consumed, 0);
        assert_eq!(period.token_allotment, 0);

        assert!(store.get_usage_period(&account.id).unwrap().is_none());
    }

    #[test]
    fn stored_period_wins_over_synthesis() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let meter = UsageMeter::new(Arc::clone(&store) as Arc<dyn Store>);

        let account = store
            .upsert_account(&ExternalUserId::parse("user_1").unwrap())
            .unwrap();
        let now = Utc::now();
        let mut stored = UsagePeriod::empty(
            account.id,
            1000,
            now,
            now + chrono::Duration::days(30),
        );
        stored.tokens_consumed = 700;
        store.put_usage_period(&stored).unwrap();

        let resolved = ResolvedSubscription {
            plan: Plan::Standard,
            status: SubscriptionStatus::Active,
            token_allotment: 99,
            period: None,
        };
        let period = meter.current_period(&account, &resolved).unwrap();
        assert_eq!(period, stored);
    }

    #[test]
    fn month_window_covers_now() {
        let now = Utc::now();
        let (start, end) = calendar_month_window(now);
        assert!(start <= now && now < end);
    }

    #[test]
    fn month_window_handles_december() {
        let december = Utc.with_ymd_and_hms(2025, 12, 15, 12, 0, 0).unwrap();
        let (start, end) = calendar_month_window(december);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }
}
