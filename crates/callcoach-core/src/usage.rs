//! Metered usage types for callcoach.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Token consumption within a metering period.
///
/// `tokens_consumed` may exceed `token_allotment` (that excess IS the
/// overage signal) but never goes backwards except through the explicit
/// administrative reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePeriod {
    /// The account this period belongs to.
    pub account_id: AccountId,

    /// Tokens consumed so far this period.
    pub tokens_consumed: u64,

    /// Token allotment for this period. Zero on the free tier.
    pub token_allotment: u64,

    /// Start of the metering period.
    pub period_start: DateTime<Utc>,

    /// End of the metering period.
    pub period_end: DateTime<Utc>,
}

impl UsagePeriod {
    /// Create an empty period with nothing consumed.
    #[must_use]
    pub const fn empty(
        account_id: AccountId,
        token_allotment: u64,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            tokens_consumed: 0,
            token_allotment,
            period_start,
            period_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_period_has_no_consumption() {
        let now = Utc::now();
        let period = UsagePeriod::empty(
            AccountId::generate(),
            1000,
            now,
            now + chrono::Duration::days(30),
        );
        assert_eq!(period.tokens_consumed, 0);
        assert_eq!(period.token_allotment, 1000);
    }
}
