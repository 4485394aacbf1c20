//! The entitlements engine.
//!
//! The single public entry point the rest of the product calls. It folds
//! the four sources of truth (trial credits, subscription status, metered
//! usage, and the personality catalog) into one `Entitlements` value.

use std::sync::Arc;

use callcoach_core::{Entitlements, ExternalUserId, SubscriptionStatus, Tier};
use callcoach_store::Store;

use crate::catalog::PersonalityCatalog;
use crate::config::EntitlementsConfig;
use crate::error::{ConfigError, EntitlementsError};
use crate::ledger::TrialCreditLedger;
use crate::meter::UsageMeter;
use crate::resolver::SubscriptionStatusResolver;

// ============================================================================
// Policy constants
// ============================================================================

/// An active or trialing subscriber whose metered allotment is exhausted
/// keeps calling; the excess is billed as overage rather than the call being
/// blocked mid-funnel.
pub const ACTIVE_OVERAGE_ALLOWS_CALLS: bool = true;

/// `past_due` is a grace period: still callable, even with tokens and trial
/// credits exhausted, and surfaced to the billing UI via
/// `subscription_status` rather than by blocking.
pub const PAST_DUE_GRACE_ALLOWS_CALLS: bool = true;

/// Computes a user's current entitlements.
///
/// The computation is a pure fold over four immutable snapshots fetched up
/// front: fetch-then-compute, never compute-while-fetching, so the result is
/// deterministic and repeatable. The only write on this path is the
/// idempotent account upsert (plus the ledger's constant default row on the
/// very first access).
pub struct EntitlementsEngine {
    catalog: PersonalityCatalog,
    config: EntitlementsConfig,
    store: Arc<dyn Store>,
    resolver: SubscriptionStatusResolver,
    ledger: TrialCreditLedger,
    meter: UsageMeter,
}

impl EntitlementsEngine {
    /// Create an engine over a store, catalog, and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid; misconfiguration
    /// is a startup failure, never a per-request one.
    pub fn new(
        store: Arc<dyn Store>,
        catalog: PersonalityCatalog,
        config: EntitlementsConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            resolver: SubscriptionStatusResolver::new(Arc::clone(&store)),
            ledger: TrialCreditLedger::new(
                Arc::clone(&store),
                config.trial_initial_credits,
                config.trial_max_packs,
            ),
            meter: UsageMeter::new(Arc::clone(&store)),
            catalog,
            config,
            store,
        })
    }

    /// Compute the current entitlements for an external identity.
    ///
    /// Resolves or creates the account, then folds subscription status,
    /// trial credits, usage, and the catalog into one decision object.
    /// Lack of entitlement is expressed in the returned value
    /// (`can_call = false` with informative fields), never as an error.
    ///
    /// # Errors
    ///
    /// - `EntitlementsError::InvalidIdentity` if the id is empty/malformed
    ///   (raised before any storage access).
    /// - `EntitlementsError::AccountLookup` if a storage collaborator fails;
    ///   the computation aborts rather than returning a partial result.
    pub fn compute(&self, external_user_id: &str) -> Result<Entitlements, EntitlementsError> {
        let external_id =
            ExternalUserId::parse(external_user_id).map_err(EntitlementsError::InvalidIdentity)?;

        let account = self.store.upsert_account(&external_id)?;

        // Fetch the four snapshots, then compute. The lookups are mutually
        // independent; the collaborator is a local KV store, so sequential
        // reads are equivalent to a joined fan-out.
        let resolved = self.resolver.resolve(&account)?;
        let trial = self.ledger.balance(&account.id)?;
        let period = self.meter.current_period(&account, &resolved)?;

        let tokens_remaining = UsageMeter::tokens_remaining(&period);
        let is_overage = UsageMeter::is_overage(&period);

        let trial_calls_remaining = trial.remaining_credits;
        let can_buy_another_trial = self.ledger.can_purchase_another_pack(&trial);

        let status = resolved.status;
        let subscribed_callable = matches!(
            status,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        ) && (tokens_remaining > 0
            || resolved.plan.is_unmetered()
            || ACTIVE_OVERAGE_ALLOWS_CALLS);
        let grace_callable = status == SubscriptionStatus::PastDue && PAST_DUE_GRACE_ALLOWS_CALLS;
        let can_call = trial_calls_remaining > 0 || subscribed_callable || grace_callable;

        let effective_tier = match status {
            SubscriptionStatus::Active
            | SubscriptionStatus::Trialing
            | SubscriptionStatus::PastDue => Tier::Paid,
            SubscriptionStatus::None | SubscriptionStatus::Canceled => Tier::Trial,
        };
        let has_boss = matches!(
            status,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        );
        let (unlocked_personalities, locked_personalities) =
            self.catalog.split(effective_tier, has_boss);

        let max_call_duration_seconds = self
            .config
            .max_call_seconds(resolved.plan)
            .ok_or(EntitlementsError::Configuration {
                plan: resolved.plan,
            })?;

        tracing::debug!(
            account_id = %account.id,
            plan = resolved.plan.as_str(),
            status = status.as_str(),
            can_call,
            trial_calls_remaining,
            tokens_remaining,
            is_overage,
            "Entitlements computed"
        );

        Ok(Entitlements {
            plan: resolved.plan,
            can_call,
            trial_calls_remaining,
            tokens_remaining,
            is_overage,
            trial_purchases_count: trial.purchase_count,
            can_buy_another_trial,
            max_call_duration_seconds,
            unlocked_personalities,
            locked_personalities,
            subscription_status: status,
        })
    }
}
