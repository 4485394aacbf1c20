//! Trial credit types for callcoach.
//!
//! Trial credits are a free, non-monetary call allowance granted on signup
//! and optionally repurchased a limited number of times.

use serde::{Deserialize, Serialize};

use crate::AccountId;

// ============================================================================
// Constants
// ============================================================================

/// Trial call credits granted on signup.
pub const DEFAULT_TRIAL_CREDITS: u32 = 5;

/// Trial call credits granted per repurchased pack.
pub const TRIAL_PACK_CREDITS: u32 = 5;

/// Maximum number of trial packs a user may repurchase.
pub const MAX_TRIAL_PACKS: u32 = 3;

/// The trial credit balance for an account.
///
/// `remaining_credits` is decremented only by the call-consumption write
/// path, never by entitlements computation. Unsigned fields make the
/// non-negativity invariants unrepresentable to violate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialCreditBalance {
    /// The account this balance belongs to.
    pub account_id: AccountId,

    /// Remaining trial call credits.
    pub remaining_credits: u32,

    /// How many trial packs have been purchased.
    pub purchase_count: u32,
}

impl TrialCreditBalance {
    /// Create the signup-default balance: the initial grant, zero purchases.
    #[must_use]
    pub const fn with_grant(account_id: AccountId, remaining_credits: u32) -> Self {
        Self {
            account_id,
            remaining_credits,
            purchase_count: 0,
        }
    }
}
