//! Cost vocabulary: raw catalog rows and normalized cost fragments.
//!
//! An offer's payment requirements arrive as a flat list of [`RawCost`]
//! rows, each carrying a group id and a relation tag. The engine's clause
//! parser normalizes those rows into [`CostFragment`] values whose
//! [`CostKind`] is an exhaustive enum -- adding a new resource kind is a
//! compile-time-checked change in every consuming function.

use serde::{Deserialize, Serialize};

use crate::enums::{CostRelation, CurrencyKind, EquipmentCategory, QualityTier};
use crate::ids::{EquipmentId, FishId, ItemId};

// ---------------------------------------------------------------------------
// Raw cost rows
// ---------------------------------------------------------------------------

/// The resource kind named by a raw cost row, before validation.
///
/// Mirrors the catalog's `cost_type` column. `Item`, `Fish`, `Rod`, and
/// `Accessory` rows additionally require a `cost_item_id`; rows that omit
/// it are malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawCostKind {
    /// Primary currency.
    Coins,
    /// Secondary (premium) currency.
    Premium,
    /// A generic stackable item.
    Item,
    /// A fish at a specific quality tier.
    Fish,
    /// A rod instance.
    Rod,
    /// An accessory instance.
    Accessory,
}

/// One unvalidated cost row as stored in the offer catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCost {
    /// Grouping key; rows sharing a group id form one clause. Absent ids
    /// default to group 0.
    #[serde(default)]
    pub group_id: Option<i64>,

    /// Relation between the rows of this group.
    #[serde(default)]
    pub relation: CostRelation,

    /// The resource kind this row charges.
    pub kind: RawCostKind,

    /// Catalog id of the charged resource, for kinds that need one.
    #[serde(default)]
    pub cost_item_id: Option<i64>,

    /// Quality tier for fish rows; absent means [`QualityTier::STANDARD`].
    #[serde(default)]
    pub quality: Option<QualityTier>,

    /// Per-unit amount, multiplied by the requested purchase quantity
    /// before resolution begins.
    pub amount: u64,
}

// ---------------------------------------------------------------------------
// Normalized fragments
// ---------------------------------------------------------------------------

/// The resource a validated cost fragment draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CostKind {
    /// One of the two currencies.
    Currency(CurrencyKind),
    /// A generic stackable item.
    Item(ItemId),
    /// A fish at one exact quality tier.
    Fish {
        /// The fish species.
        fish_id: FishId,
        /// The required quality tier; never satisfied by a sibling tier.
        quality: QualityTier,
    },
    /// Spendable equipment instances of one template.
    Equipment {
        /// The equipment template.
        equipment_id: EquipmentId,
        /// Which template namespace the id belongs to.
        category: EquipmentCategory,
    },
}

impl core::fmt::Display for CostKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Currency(CurrencyKind::Primary) => write!(f, "primary currency"),
            Self::Currency(CurrencyKind::Secondary) => write!(f, "secondary currency"),
            Self::Item(id) => write!(f, "item {id}"),
            Self::Fish { fish_id, quality } => write!(f, "fish {fish_id} (quality {quality})"),
            Self::Equipment {
                equipment_id,
                category: EquipmentCategory::Rod,
            } => write!(f, "rod {equipment_id}"),
            Self::Equipment {
                equipment_id,
                category: EquipmentCategory::Accessory,
            } => write!(f, "accessory {equipment_id}"),
        }
    }
}

/// One elementary, validated cost: a resource kind and a positive amount
/// already multiplied by the requested purchase quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostFragment {
    /// The resource this fragment draws from.
    pub kind: CostKind,
    /// How much of it must be paid. Always positive.
    pub amount: u64,
}

impl CostFragment {
    /// A primary-currency cost.
    pub const fn coins(amount: u64) -> Self {
        Self {
            kind: CostKind::Currency(CurrencyKind::Primary),
            amount,
        }
    }

    /// A secondary-currency cost.
    pub const fn premium(amount: u64) -> Self {
        Self {
            kind: CostKind::Currency(CurrencyKind::Secondary),
            amount,
        }
    }

    /// A generic-item cost.
    pub const fn item(item_id: ItemId, amount: u64) -> Self {
        Self {
            kind: CostKind::Item(item_id),
            amount,
        }
    }

    /// A fish cost at one exact quality tier.
    pub const fn fish(fish_id: FishId, quality: QualityTier, amount: u64) -> Self {
        Self {
            kind: CostKind::Fish { fish_id, quality },
            amount,
        }
    }

    /// An equipment cost drawing on spendable instances of one template.
    pub const fn equipment(
        equipment_id: EquipmentId,
        category: EquipmentCategory,
        amount: u64,
    ) -> Self {
        Self {
            kind: CostKind::Equipment {
                equipment_id,
                category,
            },
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_cost_defaults_from_sparse_json() {
        let parsed: Result<RawCost, _> =
            serde_json::from_str(r#"{"kind": "coins", "amount": 100}"#);
        let row = parsed.ok();
        assert_eq!(
            row,
            Some(RawCost {
                group_id: None,
                relation: CostRelation::And,
                kind: RawCostKind::Coins,
                cost_item_id: None,
                quality: None,
                amount: 100,
            }),
        );
    }

    #[test]
    fn cost_kind_display_names_the_resource() {
        let kind = CostKind::Fish {
            fish_id: FishId(3),
            quality: QualityTier::PREMIUM,
        };
        assert_eq!(kind.to_string(), "fish 3 (quality 1)");
        assert_eq!(CostFragment::coins(5).kind.to_string(), "primary currency");
    }
}
