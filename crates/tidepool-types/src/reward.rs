//! Reward vocabulary: what a successful purchase grants.

use serde::{Deserialize, Serialize};

use crate::enums::{CurrencyKind, QualityTier};
use crate::ids::{EquipmentId, FishId, ItemId};

/// The resource a reward grant adds to the actor's holdings.
///
/// Bait is reward-only: offers can grant it but never charge it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RewardKind {
    /// One of the two currencies.
    Currency(CurrencyKind),
    /// A generic stackable item.
    Item(ItemId),
    /// Bait for fishing.
    Bait(ItemId),
    /// A fish at a specific quality tier.
    Fish {
        /// The fish species.
        fish_id: FishId,
        /// The tier the granted fish is recorded at.
        quality: QualityTier,
    },
    /// A freshly created rod instance.
    Rod {
        /// The rod template.
        equipment_id: EquipmentId,
        /// Refine level the new instance starts at.
        refine_level: u8,
    },
    /// A freshly created accessory instance.
    Accessory {
        /// The accessory template.
        equipment_id: EquipmentId,
        /// Refine level the new instance starts at.
        refine_level: u8,
    },
}

/// One reward line of an offer, applied once per purchased unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardGrant {
    /// What is granted.
    pub kind: RewardKind,
    /// How many units of it are granted per purchased unit.
    pub amount: u64,
}

impl RewardGrant {
    /// A primary-currency grant.
    pub const fn coins(amount: u64) -> Self {
        Self {
            kind: RewardKind::Currency(CurrencyKind::Primary),
            amount,
        }
    }

    /// A generic-item grant.
    pub const fn item(item_id: ItemId, amount: u64) -> Self {
        Self {
            kind: RewardKind::Item(item_id),
            amount,
        }
    }

    /// A fish grant at the given quality tier.
    pub const fn fish(fish_id: FishId, quality: QualityTier, amount: u64) -> Self {
        Self {
            kind: RewardKind::Fish { fish_id, quality },
            amount,
        }
    }

    /// A rod-instance grant at the given refine level.
    pub const fn rod(equipment_id: EquipmentId, refine_level: u8) -> Self {
        Self {
            kind: RewardKind::Rod {
                equipment_id,
                refine_level,
            },
            amount: 1,
        }
    }

    /// An accessory-instance grant at the given refine level.
    pub const fn accessory(equipment_id: EquipmentId, refine_level: u8) -> Self {
        Self {
            kind: RewardKind::Accessory {
                equipment_id,
                refine_level,
            },
            amount: 1,
        }
    }
}
