//! The resource ledger snapshot: a point-in-time, copy-on-branch view of
//! one actor's spendable resources.
//!
//! A snapshot is a plain value. The solver branches by cloning it, and a
//! clone is a deep, independent copy -- every map is owned, so mutating one
//! branch can never leak into another. All counts are unsigned; a missing
//! entry reads as zero.
//!
//! Equipment counts only cover instances that are neither locked nor
//! currently equipped. Locked and equipped instances are invisible to the
//! purchase engine and can never be spent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{CurrencyKind, EquipmentCategory, QualityTier};
use crate::ids::{EquipmentId, FishId, ItemId};

/// One actor's spendable resources at decision time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Primary-currency balance.
    pub primary_currency: u64,
    /// Secondary-currency balance.
    pub secondary_currency: u64,
    /// Generic item counts by template id.
    pub items: BTreeMap<ItemId, u64>,
    /// Fish counts by species, then by quality tier. Tiers never
    /// substitute for each other.
    pub fish: BTreeMap<FishId, BTreeMap<QualityTier, u64>>,
    /// Spendable rod instance counts by template id.
    pub rods: BTreeMap<EquipmentId, u64>,
    /// Spendable accessory instance counts by template id.
    pub accessories: BTreeMap<EquipmentId, u64>,
}

impl ResourceSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary_currency: 0,
            secondary_currency: 0,
            items: BTreeMap::new(),
            fish: BTreeMap::new(),
            rods: BTreeMap::new(),
            accessories: BTreeMap::new(),
        }
    }

    /// Balance of the given currency.
    #[must_use]
    pub const fn currency(&self, kind: CurrencyKind) -> u64 {
        match kind {
            CurrencyKind::Primary => self.primary_currency,
            CurrencyKind::Secondary => self.secondary_currency,
        }
    }

    /// Mutable balance of the given currency.
    pub const fn currency_mut(&mut self, kind: CurrencyKind) -> &mut u64 {
        match kind {
            CurrencyKind::Primary => &mut self.primary_currency,
            CurrencyKind::Secondary => &mut self.secondary_currency,
        }
    }

    /// Count of a generic item; missing entries read as zero.
    #[must_use]
    pub fn item_count(&self, item_id: ItemId) -> u64 {
        self.items.get(&item_id).copied().unwrap_or(0)
    }

    /// Count of a fish at one exact quality tier; missing entries read as
    /// zero.
    #[must_use]
    pub fn fish_count(&self, fish_id: FishId, quality: QualityTier) -> u64 {
        self.fish
            .get(&fish_id)
            .and_then(|tiers| tiers.get(&quality))
            .copied()
            .unwrap_or(0)
    }

    /// The spendable-equipment map for one category.
    #[must_use]
    pub const fn equipment(&self, category: EquipmentCategory) -> &BTreeMap<EquipmentId, u64> {
        match category {
            EquipmentCategory::Rod => &self.rods,
            EquipmentCategory::Accessory => &self.accessories,
        }
    }

    /// Mutable spendable-equipment map for one category.
    pub const fn equipment_mut(
        &mut self,
        category: EquipmentCategory,
    ) -> &mut BTreeMap<EquipmentId, u64> {
        match category {
            EquipmentCategory::Rod => &mut self.rods,
            EquipmentCategory::Accessory => &mut self.accessories,
        }
    }

    /// Spendable instance count of one equipment template; missing entries
    /// read as zero.
    #[must_use]
    pub fn equipment_count(&self, category: EquipmentCategory, equipment_id: EquipmentId) -> u64 {
        self.equipment(category)
            .get(&equipment_id)
            .copied()
            .unwrap_or(0)
    }
}
