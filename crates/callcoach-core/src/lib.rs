//! Core types for callcoach entitlements.
//!
//! This crate provides the foundational types used throughout the callcoach
//! billing and entitlements platform:
//!
//! - **Identifiers**: `AccountId`, `ExternalUserId`
//! - **Accounts**: `Account`, `SubscriptionRecord`, `Plan`, `SubscriptionStatus`
//! - **Trial credits**: `TrialCreditBalance`
//! - **Usage**: `UsagePeriod`
//! - **Personalities**: `PersonalityDefinition`, `Tier`
//! - **Results**: `Entitlements`
//!
//! # Four sources of truth
//!
//! A user's ability to place a simulated sales call is reconciled from four
//! independent records: the trial credit balance, the subscription record,
//! the metered usage period, and the tier-gated personality catalog. The
//! types here are the immutable snapshots that reconciliation reads; the
//! reconciliation itself lives in `callcoach-entitlements`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod entitlements;
pub mod ids;
pub mod personality;
pub mod trial;
pub mod usage;

pub use account::{
    Account, Plan, SubscriptionRecord, SubscriptionStatus, FREE_PLAN_MAX_CALL_SECONDS,
    PRO_PLAN_MAX_CALL_SECONDS, PRO_PLAN_MONTHLY_TOKENS, STANDARD_PLAN_MAX_CALL_SECONDS,
    STANDARD_PLAN_MONTHLY_TOKENS,
};
pub use entitlements::Entitlements;
pub use ids::{AccountId, ExternalUserId, IdError, MAX_EXTERNAL_ID_BYTES};
pub use personality::{PersonalityDefinition, PersonalitySummary, Tier};
pub use trial::{TrialCreditBalance, DEFAULT_TRIAL_CREDITS, MAX_TRIAL_PACKS, TRIAL_PACK_CREDITS};
pub use usage::UsagePeriod;
