//! The resolved payment plan: mandatory fragments plus the solver's
//! chosen fragments, merged per resource.
//!
//! Fragments of the same resource merge by summing amounts. Fish merge
//! only when both id and quality tier match; the same fish id at two
//! different tiers in one plan is a modeling error in the offer
//! definition and fails the merge rather than merging silently.

use std::collections::BTreeMap;

use tidepool_types::{
    CostFragment, CostKind, CurrencyKind, EquipmentCategory, EquipmentId, FishId, ItemId,
    QualityTier,
};

use crate::error::CostDefinitionError;

/// The total cost a purchase will charge, ready for execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPaymentPlan {
    /// Primary currency to deduct.
    pub primary_currency: u64,
    /// Secondary currency to deduct.
    pub secondary_currency: u64,
    /// Generic items to deduct, by template id.
    pub items: BTreeMap<ItemId, u64>,
    /// Fish to deduct: each species at exactly one quality tier.
    pub fish: BTreeMap<FishId, (QualityTier, u64)>,
    /// Rod instances to remove, by template id.
    pub rods: BTreeMap<EquipmentId, u64>,
    /// Accessory instances to remove, by template id.
    pub accessories: BTreeMap<EquipmentId, u64>,
}

impl ResolvedPaymentPlan {
    /// Merge an iterator of fragments into one plan.
    ///
    /// # Errors
    ///
    /// Returns [`CostDefinitionError::QualityTierConflict`] when two
    /// fragments charge the same fish at different tiers, or
    /// [`CostDefinitionError::ArithmeticOverflow`] when summed amounts
    /// overflow.
    pub fn from_fragments<'a, I>(fragments: I) -> Result<Self, CostDefinitionError>
    where
        I: IntoIterator<Item = &'a CostFragment>,
    {
        let mut plan = Self::default();
        for fragment in fragments {
            plan.merge(fragment)?;
        }
        Ok(plan)
    }

    /// Merge one fragment into the plan.
    ///
    /// # Errors
    ///
    /// See [`from_fragments`](Self::from_fragments).
    pub fn merge(&mut self, fragment: &CostFragment) -> Result<(), CostDefinitionError> {
        match fragment.kind {
            CostKind::Currency(CurrencyKind::Primary) => {
                self.primary_currency = add(self.primary_currency, fragment.amount, "primary currency")?;
            }
            CostKind::Currency(CurrencyKind::Secondary) => {
                self.secondary_currency =
                    add(self.secondary_currency, fragment.amount, "secondary currency")?;
            }
            CostKind::Item(item_id) => {
                merge_count(&mut self.items, item_id, fragment.amount, "item")?;
            }
            CostKind::Fish { fish_id, quality } => {
                match self.fish.get(&fish_id).copied() {
                    None => {
                        self.fish.insert(fish_id, (quality, fragment.amount));
                    }
                    Some((existing, amount)) if existing == quality => {
                        let total = add(amount, fragment.amount, "fish")?;
                        self.fish.insert(fish_id, (quality, total));
                    }
                    Some((existing, _)) => {
                        return Err(CostDefinitionError::QualityTierConflict {
                            fish_id,
                            first: existing,
                            second: quality,
                        });
                    }
                }
            }
            CostKind::Equipment {
                equipment_id,
                category: EquipmentCategory::Rod,
            } => {
                merge_count(&mut self.rods, equipment_id, fragment.amount, "rod")?;
            }
            CostKind::Equipment {
                equipment_id,
                category: EquipmentCategory::Accessory,
            } => {
                merge_count(&mut self.accessories, equipment_id, fragment.amount, "accessory")?;
            }
        }
        Ok(())
    }

    /// Whether the plan charges nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary_currency == 0
            && self.secondary_currency == 0
            && self.items.is_empty()
            && self.fish.is_empty()
            && self.rods.is_empty()
            && self.accessories.is_empty()
    }
}

fn add(current: u64, amount: u64, what: &str) -> Result<u64, CostDefinitionError> {
    current
        .checked_add(amount)
        .ok_or_else(|| CostDefinitionError::ArithmeticOverflow {
            context: format!("{what} total overflow"),
        })
}

fn merge_count<K: Ord>(
    map: &mut BTreeMap<K, u64>,
    key: K,
    amount: u64,
    what: &str,
) -> Result<(), CostDefinitionError> {
    let current = map.get(&key).copied().unwrap_or(0);
    map.insert(key, add(current, amount, what)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn same_resource_fragments_sum() {
        let fragments = [
            CostFragment::coins(100),
            CostFragment::coins(50),
            CostFragment::item(ItemId(1), 2),
            CostFragment::item(ItemId(1), 3),
        ];
        let plan = ResolvedPaymentPlan::from_fragments(&fragments).unwrap();
        assert_eq!(plan.primary_currency, 150);
        assert_eq!(plan.items.get(&ItemId(1)).copied(), Some(5));
    }

    #[test]
    fn fish_merge_requires_matching_tiers() {
        let fragments = [
            CostFragment::fish(FishId(3), QualityTier::STANDARD, 1),
            CostFragment::fish(FishId(3), QualityTier::STANDARD, 2),
        ];
        let plan = ResolvedPaymentPlan::from_fragments(&fragments).unwrap();
        assert_eq!(
            plan.fish.get(&FishId(3)).copied(),
            Some((QualityTier::STANDARD, 3)),
        );
    }

    #[test]
    fn conflicting_fish_tiers_fail_the_merge() {
        let fragments = [
            CostFragment::fish(FishId(3), QualityTier::STANDARD, 1),
            CostFragment::fish(FishId(3), QualityTier::PREMIUM, 1),
        ];
        let err = ResolvedPaymentPlan::from_fragments(&fragments).unwrap_err();
        assert_eq!(
            err,
            CostDefinitionError::QualityTierConflict {
                fish_id: FishId(3),
                first: QualityTier::STANDARD,
                second: QualityTier::PREMIUM,
            },
        );
    }

    #[test]
    fn rod_and_accessory_namespaces_do_not_collide() {
        let fragments = [
            CostFragment::equipment(EquipmentId(5), EquipmentCategory::Rod, 1),
            CostFragment::equipment(EquipmentId(5), EquipmentCategory::Accessory, 2),
        ];
        let plan = ResolvedPaymentPlan::from_fragments(&fragments).unwrap();
        assert_eq!(plan.rods.get(&EquipmentId(5)).copied(), Some(1));
        assert_eq!(plan.accessories.get(&EquipmentId(5)).copied(), Some(2));
    }

    #[test]
    fn empty_plan_reports_empty() {
        assert!(ResolvedPaymentPlan::default().is_empty());
        let plan = ResolvedPaymentPlan::from_fragments(&[CostFragment::premium(1)]).unwrap();
        assert!(!plan.is_empty());
    }
}
