//! The trial credit ledger.

use std::sync::Arc;

use callcoach_core::{AccountId, TrialCreditBalance};
use callcoach_store::{Result, Store};

/// Read-path view over trial credit balances.
///
/// Consumption and pack purchases are NOT part of this contract; they belong
/// to the call-lifecycle and payment flows. This component only reads the
/// balance (creating the constant default row on first access) and answers
/// the repurchase-policy question.
pub struct TrialCreditLedger {
    store: Arc<dyn Store>,
    initial_credits: u32,
    max_packs: u32,
}

impl TrialCreditLedger {
    /// Create a ledger over a store with the configured grant and pack cap.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, initial_credits: u32, max_packs: u32) -> Self {
        Self {
            store,
            initial_credits,
            max_packs,
        }
    }

    /// Get the trial balance for an account, creating the default row on
    /// first access.
    ///
    /// Last-writer-wins on the default row is acceptable under concurrent
    /// first access: every writer writes the same constant values.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn balance(&self, account_id: &AccountId) -> Result<TrialCreditBalance> {
        if let Some(balance) = self.store.get_trial_balance(account_id)? {
            return Ok(balance);
        }

        let balance = TrialCreditBalance::with_grant(*account_id, self.initial_credits);
        self.store.put_trial_balance(&balance)?;
        Ok(balance)
    }

    /// Whether another trial pack may be purchased.
    #[must_use]
    pub fn can_purchase_another_pack(&self, balance: &TrialCreditBalance) -> bool {
        balance.purchase_count < self.max_packs
    }
}
