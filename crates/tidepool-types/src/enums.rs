//! Enumeration types shared across the tidepool workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Currencies
// ---------------------------------------------------------------------------

/// One of the two currencies an actor can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyKind {
    /// The primary currency (coins) earned through normal play.
    Primary,
    /// The secondary, premium currency.
    Secondary,
}

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

/// The two equipment families, each with its own template id namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    /// Fishing rods.
    Rod,
    /// Worn accessories.
    Accessory,
}

// ---------------------------------------------------------------------------
// Cost relations
// ---------------------------------------------------------------------------

/// How cost rows inside one group relate to each other.
///
/// `And` rows must all be paid; `Or` rows form a group of mutually
/// exclusive alternatives of which exactly one must be paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostRelation {
    /// The row is mandatory.
    #[default]
    And,
    /// The row is one alternative within its group.
    Or,
}

// ---------------------------------------------------------------------------
// Quality tiers
// ---------------------------------------------------------------------------

/// A discrete quality grade attached to a fish resource.
///
/// Cost and stock tiers must match exactly: tier-1 stock never satisfies a
/// tier-0 cost and vice versa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualityTier(pub u8);

impl QualityTier {
    /// The baseline grade every catch starts at.
    pub const STANDARD: Self = Self(0);
    /// The elevated grade for premium catches.
    pub const PREMIUM: Self = Self(1);

    /// Return the raw tier value.
    pub const fn into_inner(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_relation_defaults_to_and() {
        assert_eq!(CostRelation::default(), CostRelation::And);
    }

    #[test]
    fn cost_relation_serde_is_snake_case() {
        assert_eq!(serde_json::to_string(&CostRelation::Or).ok().as_deref(), Some("\"or\""));
    }

    #[test]
    fn quality_tiers_are_ordered() {
        assert!(QualityTier::STANDARD < QualityTier::PREMIUM);
        assert_eq!(QualityTier::default(), QualityTier::STANDARD);
    }
}
