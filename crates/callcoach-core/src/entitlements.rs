//! The computed entitlements result.

use serde::Serialize;

use crate::account::{Plan, SubscriptionStatus};
use crate::personality::PersonalitySummary;

/// A user's current entitlements: the per-request snapshot of what they are
/// permitted to do.
///
/// This value has no independent lifecycle. It is recomputed fresh on every
/// request, never persisted, and never cached by the engine. Recomputing it
/// for the same account with no intervening mutation yields a byte-identical
/// value, which is why it derives `Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entitlements {
    /// The effective plan (`free` when no subscription record exists).
    pub plan: Plan,

    /// Whether the user may place a simulated call right now.
    pub can_call: bool,

    /// Remaining trial call credits.
    pub trial_calls_remaining: u32,

    /// Tokens remaining in the current metering period. Never negative,
    /// even in overage.
    pub tokens_remaining: u64,

    /// Whether consumption has crossed into billable overage.
    pub is_overage: bool,

    /// How many trial packs have been purchased.
    pub trial_purchases_count: u32,

    /// Whether another trial pack may be purchased.
    pub can_buy_another_trial: bool,

    /// Maximum allowed call duration for this plan, in seconds.
    pub max_call_duration_seconds: u32,

    /// Personalities the user can call, in catalog order.
    pub unlocked_personalities: Vec<PersonalitySummary>,

    /// Personalities gated behind a higher tier or capability, in catalog order.
    pub locked_personalities: Vec<PersonalitySummary>,

    /// Raw subscription lifecycle status.
    pub subscription_status: SubscriptionStatus,
}
