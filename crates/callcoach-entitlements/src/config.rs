//! Engine configuration.

use std::collections::HashMap;

use callcoach_core::{Plan, DEFAULT_TRIAL_CREDITS, MAX_TRIAL_PACKS, TRIAL_PACK_CREDITS};

use crate::error::ConfigError;

/// Configuration for the entitlements engine.
///
/// Loaded once at startup and validated before the engine will accept it.
/// A wrong call-duration cap is a billing/abuse risk, so a gap in the table
/// fails loudly instead of defaulting.
#[derive(Debug, Clone)]
pub struct EntitlementsConfig {
    /// Trial call credits granted on first access.
    pub trial_initial_credits: u32,

    /// Trial call credits granted per repurchased pack.
    pub trial_pack_credits: u32,

    /// Maximum number of trial packs a user may repurchase.
    pub trial_max_packs: u32,

    /// Maximum call duration per plan, in seconds. Must cover every plan.
    pub max_call_duration_seconds: HashMap<Plan, u32>,
}

impl Default for EntitlementsConfig {
    fn default() -> Self {
        Self {
            trial_initial_credits: DEFAULT_TRIAL_CREDITS,
            trial_pack_credits: TRIAL_PACK_CREDITS,
            trial_max_packs: MAX_TRIAL_PACKS,
            max_call_duration_seconds: Plan::ALL
                .iter()
                .map(|plan| (*plan, plan.default_max_call_seconds()))
                .collect(),
        }
    }
}

impl EntitlementsConfig {
    /// Load configuration from environment variables on top of the defaults.
    ///
    /// Recognized variables: `CALLCOACH_TRIAL_CREDITS`,
    /// `CALLCOACH_TRIAL_PACK_CREDITS`, `CALLCOACH_TRIAL_MAX_PACKS`, and
    /// `CALLCOACH_MAX_CALL_SECONDS_{FREE,STANDARD,PRO}`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(credits) = env_u32("CALLCOACH_TRIAL_CREDITS") {
            config.trial_initial_credits = credits;
        }
        if let Some(credits) = env_u32("CALLCOACH_TRIAL_PACK_CREDITS") {
            config.trial_pack_credits = credits;
        }
        if let Some(packs) = env_u32("CALLCOACH_TRIAL_MAX_PACKS") {
            config.trial_max_packs = packs;
        }

        for (plan, var) in [
            (Plan::Free, "CALLCOACH_MAX_CALL_SECONDS_FREE"),
            (Plan::Standard, "CALLCOACH_MAX_CALL_SECONDS_STANDARD"),
            (Plan::Pro, "CALLCOACH_MAX_CALL_SECONDS_PRO"),
        ] {
            if let Some(seconds) = env_u32(var) {
                tracing::debug!(plan = plan.as_str(), seconds, "Call duration cap overridden");
                config.max_call_duration_seconds.insert(plan, seconds);
            }
        }

        config
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any plan is missing from the call-duration table
    /// or has a zero cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for plan in Plan::ALL {
            match self.max_call_duration_seconds.get(&plan) {
                None => return Err(ConfigError::MissingDurationCap { plan }),
                Some(0) => return Err(ConfigError::ZeroDurationCap { plan }),
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Look up the call duration cap for a plan.
    #[must_use]
    pub fn max_call_seconds(&self, plan: Plan) -> Option<u32> {
        self.max_call_duration_seconds.get(&plan).copied()
    }
}

fn env_u32(var: &str) -> Option<u32> {
    std::env::var(var).ok().and_then(|s| s.parse().ok())
}
