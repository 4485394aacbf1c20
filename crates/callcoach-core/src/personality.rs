//! Conversational personality types for callcoach.
//!
//! Personalities are the AI counterparts a user practices sales calls
//! against. The catalog is read-only at entitlements-computation time;
//! changing it is a deployment-time concern.

use serde::{Deserialize, Serialize};

/// Access tier gating which personalities are reachable.
///
/// Ordered: `Trial < Paid`. A personality is reachable when the caller's
/// effective tier is at or above its `tier_required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Reachable with trial credits alone.
    Trial,

    /// Requires a non-free plan.
    Paid,
}

impl Tier {
    /// Get the tier name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Paid => "paid",
        }
    }
}

/// An immutable personality catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityDefinition {
    /// Stable slug identifying the personality.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short description shown to the user.
    pub description: String,

    /// Minimum tier required to call this personality.
    pub tier_required: Tier,

    /// Boss personalities additionally require an active (not grace-period,
    /// not bare-trial) subscription.
    pub is_boss: bool,
}

impl PersonalityDefinition {
    /// Create a catalog entry.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tier_required: Tier,
        is_boss: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tier_required,
            is_boss,
        }
    }
}

/// The personality projection carried in an entitlements result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalitySummary {
    /// Stable slug identifying the personality.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short description shown to the user.
    pub description: String,

    /// Whether this is a boss personality.
    pub is_boss: bool,
}

impl From<&PersonalityDefinition> for PersonalitySummary {
    fn from(def: &PersonalityDefinition) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            description: def.description.clone(),
            is_boss: def.is_boss,
        }
    }
}
