//! The personality catalog.
//!
//! Read-only at entitlements-computation time; the roster is a
//! deployment-time concern. A built-in default roster ships with the crate.

use callcoach_core::{PersonalityDefinition, PersonalitySummary, Tier};

/// Registry of conversational personalities, held in stable catalog order.
///
/// Order: ascending required tier, then bosses first within a tier, then
/// alphabetically by name.
#[derive(Debug, Clone)]
pub struct PersonalityCatalog {
    entries: Vec<PersonalityDefinition>,
}

impl PersonalityCatalog {
    /// Build a catalog from a roster, sorting it into stable catalog order.
    #[must_use]
    pub fn new(mut entries: Vec<PersonalityDefinition>) -> Self {
        entries.sort_by(|a, b| {
            a.tier_required
                .cmp(&b.tier_required)
                .then_with(|| b.is_boss.cmp(&a.is_boss))
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { entries }
    }

    /// All personalities in stable catalog order.
    #[must_use]
    pub fn list_all(&self) -> &[PersonalityDefinition] {
        &self.entries
    }

    /// Partition the catalog into (unlocked, locked) for a caller.
    ///
    /// A personality is unlocked iff the caller's effective tier is at or
    /// above its required tier, and, for boss personalities, the caller
    /// holds the boss capability. Both halves preserve catalog order; an
    /// empty catalog yields two empty sequences.
    #[must_use]
    pub fn split(
        &self,
        tier: Tier,
        has_boss: bool,
    ) -> (Vec<PersonalitySummary>, Vec<PersonalitySummary>) {
        let mut unlocked = Vec::new();
        let mut locked = Vec::new();

        for def in &self.entries {
            let reachable = def.tier_required <= tier && (!def.is_boss || has_boss);
            if reachable {
                unlocked.push(PersonalitySummary::from(def));
            } else {
                locked.push(PersonalitySummary::from(def));
            }
        }

        (unlocked, locked)
    }
}

impl Default for PersonalityCatalog {
    /// The built-in roster of practice prospects.
    fn default() -> Self {
        Self::new(vec![
            PersonalityDefinition::new(
                "curious-callie",
                "Curious Callie",
                "Warm small-talker who asks about everything except price.",
                Tier::Trial,
                false,
            ),
            PersonalityDefinition::new(
                "small-biz-sam",
                "Small-Biz Sam",
                "Owner-operator with ten employees and no patience for jargon.",
                Tier::Trial,
                false,
            ),
            PersonalityDefinition::new(
                "no-nonsense-nina",
                "No-Nonsense Nina",
                "Gives you ninety seconds to earn the next ninety.",
                Tier::Trial,
                true,
            ),
            PersonalityDefinition::new(
                "budget-hawk-harper",
                "Budget Hawk Harper",
                "Loves the product, hates every number on the quote.",
                Tier::Paid,
                false,
            ),
            PersonalityDefinition::new(
                "tech-skeptic-tara",
                "Tech-Skeptic Tara",
                "Has been burned by three vendors and remembers each one.",
                Tier::Paid,
                false,
            ),
            PersonalityDefinition::new(
                "gatekeeper-greta",
                "Gatekeeper Greta",
                "Screens every call before it reaches her executive.",
                Tier::Paid,
                true,
            ),
            PersonalityDefinition::new(
                "cfo-victor",
                "CFO Victor",
                "Final sign-off lives with him, and he knows it.",
                Tier::Paid,
                true,
            ),
        ])
    }
}
