//! Account and subscription types for callcoach.
//!
//! This module defines the account identity record and the subscription
//! record that payment-webhook handling keeps synchronized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, ExternalUserId};

// ============================================================================
// Constants
// ============================================================================

/// Monthly token allotment for the standard plan.
pub const STANDARD_PLAN_MONTHLY_TOKENS: u64 = 50_000;

/// Monthly token allotment for the pro plan.
///
/// Pro is unmetered for call gating; the allotment is an analytics watermark.
pub const PRO_PLAN_MONTHLY_TOKENS: u64 = 250_000;

/// Maximum simulated call length on the free plan, in seconds.
pub const FREE_PLAN_MAX_CALL_SECONDS: u32 = 300;

/// Maximum simulated call length on the standard plan, in seconds.
pub const STANDARD_PLAN_MAX_CALL_SECONDS: u32 = 1_800;

/// Maximum simulated call length on the pro plan, in seconds.
pub const PRO_PLAN_MAX_CALL_SECONDS: u32 = 3_600;

/// An account for a callcoach user.
///
/// The account is pure identity: it binds the external identity-provider
/// subject to the internal id every other row keys on. It is created exactly
/// once, by the store's atomic insert-if-absent upsert, on the first
/// entitlements lookup for that identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Internal, stable account id.
    pub id: AccountId,

    /// The identity-provider subject this account belongs to.
    pub external_id: ExternalUserId,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account for an external identity.
    #[must_use]
    pub fn new(external_id: ExternalUserId) -> Self {
        Self {
            id: AccountId::generate(),
            external_id,
            created_at: Utc::now(),
        }
    }
}

/// Available billing plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Free tier: no subscription, trial credits only, no token allotment.
    Free,

    /// Standard plan: metered monthly token allotment.
    Standard,

    /// Pro plan: unmetered calling, long call cap.
    Pro,
}

impl Plan {
    /// All plans, for configuration-table validation.
    pub const ALL: [Self; 3] = [Self::Free, Self::Standard, Self::Pro];

    /// Get the monthly token allotment for this plan.
    #[must_use]
    pub const fn monthly_token_allotment(&self) -> u64 {
        match self {
            Self::Free => 0,
            Self::Standard => STANDARD_PLAN_MONTHLY_TOKENS,
            Self::Pro => PRO_PLAN_MONTHLY_TOKENS,
        }
    }

    /// Whether calls on this plan are gated by the token meter.
    #[must_use]
    pub const fn is_unmetered(&self) -> bool {
        matches!(self, Self::Pro)
    }

    /// Default maximum call duration for this plan, in seconds.
    ///
    /// These are the defaults of the engine's configuration table, not a
    /// behavior of their own; the engine reads the validated table.
    #[must_use]
    pub const fn default_max_call_seconds(&self) -> u32 {
        match self {
            Self::Free => FREE_PLAN_MAX_CALL_SECONDS,
            Self::Standard => STANDARD_PLAN_MAX_CALL_SECONDS,
            Self::Pro => PRO_PLAN_MAX_CALL_SECONDS,
        }
    }

    /// Get the plan name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Standard => "standard",
            Self::Pro => "pro",
        }
    }
}

/// Status of a subscription.
///
/// `None` is the initial state (no subscription record). Transitions are
/// driven by external payment-provider events; [`Self::can_transition_to`]
/// encodes which transitions those events may legally produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// No subscription record exists.
    None,

    /// In the subscription's free-trial period.
    Trialing,

    /// Subscription is active and paid up.
    Active,

    /// Payment failed; grace period before cancellation.
    PastDue,

    /// Subscription was canceled. Terminal for the record; a fresh record
    /// re-enters at `Trialing` or `Active`, never resumes this one.
    Canceled,
}

impl SubscriptionStatus {
    /// Whether a transition from `self` to `next` is legal.
    ///
    /// Updating a record without changing its status is always legal.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Self::None, Self::Trialing | Self::Active)
                | (Self::Trialing, Self::Active | Self::PastDue | Self::Canceled)
                | (Self::Active, Self::PastDue | Self::Canceled)
                | (Self::PastDue, Self::Active | Self::Canceled)
                // Fresh re-entry after cancellation replaces the record.
                | (Self::Canceled, Self::Trialing | Self::Active)
        )
    }

    /// Get the status name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Trialing => "trialing",
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
        }
    }
}

/// A subscription record, kept in sync with the payment provider.
///
/// May be absent for an account; an absent record is equivalent to
/// `{plan: Free, status: None, token_allotment: 0}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// The account this subscription belongs to.
    pub account_id: AccountId,

    /// The subscription plan.
    pub plan: Plan,

    /// Current status of the subscription.
    pub status: SubscriptionStatus,

    /// Token allotment for the current billing period.
    pub token_allotment: u64,

    /// Start of the current billing period.
    pub current_period_start: DateTime<Utc>,

    /// End of the current billing period.
    pub current_period_end: DateTime<Utc>,

    /// When the subscription was created.
    pub created_at: DateTime<Utc>,
}

impl SubscriptionRecord {
    /// Create a subscription record with the plan's default allotment.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        plan: Plan,
        status: SubscriptionStatus,
        current_period_start: DateTime<Utc>,
        current_period_end: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id,
            plan,
            status,
            token_allotment: plan.monthly_token_allotment(),
            current_period_start,
            current_period_end,
            created_at: Utc::now(),
        }
    }
}
