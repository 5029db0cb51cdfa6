//! Simulated deduction: can this fragment be paid out of this snapshot?
//!
//! These functions are pure. They never touch real storage and never
//! mutate their input snapshot; every call returns a new snapshot value
//! with the fragment deducted. The solver leans on this to branch and
//! discard candidate worlds freely.
//!
//! Missing map entries read as zero, reaching exactly zero is valid, and
//! a fish cost at one quality tier never draws from a sibling tier.

use std::collections::BTreeMap;

use tidepool_types::{CostFragment, CostKind, ResourceSnapshot};

use crate::error::Insufficiency;

/// Check one fragment against a snapshot, returning the snapshot that
/// remains after paying it.
///
/// # Errors
///
/// Returns [`Insufficiency`] naming the resource and shortfall when the
/// snapshot cannot cover the fragment.
pub fn check(
    snapshot: &ResourceSnapshot,
    fragment: &CostFragment,
) -> Result<ResourceSnapshot, Insufficiency> {
    let mut next = snapshot.clone();
    deduct_in_place(&mut next, fragment)?;
    Ok(next)
}

/// Fold [`check`] over `fragments` left to right, short-circuiting on the
/// first insufficient fragment.
///
/// # Errors
///
/// Returns the first [`Insufficiency`] encountered; on success returns
/// the cumulative resulting snapshot.
pub fn check_many(
    snapshot: &ResourceSnapshot,
    fragments: &[CostFragment],
) -> Result<ResourceSnapshot, Insufficiency> {
    let mut current = snapshot.clone();
    for fragment in fragments {
        deduct_in_place(&mut current, fragment)?;
    }
    Ok(current)
}

/// Deduct one fragment from a snapshot the caller owns.
fn deduct_in_place(
    snapshot: &mut ResourceSnapshot,
    fragment: &CostFragment,
) -> Result<(), Insufficiency> {
    match fragment.kind {
        CostKind::Currency(currency) => {
            let balance = snapshot.currency_mut(currency);
            if *balance < fragment.amount {
                return Err(Insufficiency {
                    kind: fragment.kind,
                    required: fragment.amount,
                    available: *balance,
                });
            }
            *balance = balance.saturating_sub(fragment.amount);
        }
        CostKind::Item(item_id) => {
            take_count(&mut snapshot.items, item_id, fragment)?;
        }
        CostKind::Fish { fish_id, quality } => {
            let available = snapshot.fish_count(fish_id, quality);
            if available < fragment.amount {
                return Err(Insufficiency {
                    kind: fragment.kind,
                    required: fragment.amount,
                    available,
                });
            }
            let mut prune_species = false;
            if let Some(tiers) = snapshot.fish.get_mut(&fish_id) {
                let remaining = available.saturating_sub(fragment.amount);
                if remaining == 0 {
                    tiers.remove(&quality);
                } else {
                    tiers.insert(quality, remaining);
                }
                prune_species = tiers.is_empty();
            }
            if prune_species {
                snapshot.fish.remove(&fish_id);
            }
        }
        CostKind::Equipment {
            equipment_id,
            category,
        } => {
            take_count(snapshot.equipment_mut(category), equipment_id, fragment)?;
        }
    }
    Ok(())
}

/// Deduct from one flat count map, pruning the key at zero.
fn take_count<K: Ord>(
    map: &mut BTreeMap<K, u64>,
    key: K,
    fragment: &CostFragment,
) -> Result<(), Insufficiency> {
    let available = map.get(&key).copied().unwrap_or(0);
    if available < fragment.amount {
        return Err(Insufficiency {
            kind: fragment.kind,
            required: fragment.amount,
            available,
        });
    }
    let remaining = available.saturating_sub(fragment.amount);
    if remaining == 0 {
        map.remove(&key);
    } else {
        map.insert(key, remaining);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tidepool_types::{EquipmentCategory, EquipmentId, FishId, ItemId, QualityTier};

    use super::*;

    fn snapshot_with_coins(amount: u64) -> ResourceSnapshot {
        let mut snapshot = ResourceSnapshot::new();
        snapshot.primary_currency = amount;
        snapshot
    }

    #[test]
    fn currency_deducts_down_to_zero() {
        let snapshot = snapshot_with_coins(300);
        let after = check(&snapshot, &CostFragment::coins(300)).unwrap();
        assert_eq!(after.primary_currency, 0);
        // The input snapshot is untouched.
        assert_eq!(snapshot.primary_currency, 300);
    }

    #[test]
    fn currency_shortfall_names_the_gap() {
        let snapshot = snapshot_with_coins(100);
        let err = check(&snapshot, &CostFragment::coins(300)).unwrap_err();
        assert_eq!(err.required, 300);
        assert_eq!(err.available, 100);
    }

    #[test]
    fn missing_item_entry_reads_as_zero() {
        let snapshot = ResourceSnapshot::new();
        let err = check(&snapshot, &CostFragment::item(ItemId(9), 1)).unwrap_err();
        assert_eq!(err.available, 0);
    }

    #[test]
    fn fish_tier_never_borrows_from_sibling_tier() {
        let mut snapshot = ResourceSnapshot::new();
        snapshot
            .fish
            .entry(FishId(7))
            .or_default()
            .insert(QualityTier::STANDARD, 10);

        // Abundant tier-0 stock cannot satisfy a tier-1 cost.
        let fragment = CostFragment::fish(FishId(7), QualityTier::PREMIUM, 1);
        let err = check(&snapshot, &fragment).unwrap_err();
        assert_eq!(err.available, 0);

        // The tier-0 cost is satisfied from the tier-0 cell.
        let fragment = CostFragment::fish(FishId(7), QualityTier::STANDARD, 4);
        let after = check(&snapshot, &fragment).unwrap();
        assert_eq!(after.fish_count(FishId(7), QualityTier::STANDARD), 6);
    }

    #[test]
    fn equipment_draws_from_its_own_category() {
        let mut snapshot = ResourceSnapshot::new();
        snapshot.rods.insert(EquipmentId(5), 1);

        let as_accessory =
            CostFragment::equipment(EquipmentId(5), EquipmentCategory::Accessory, 1);
        assert!(check(&snapshot, &as_accessory).is_err());

        let as_rod = CostFragment::equipment(EquipmentId(5), EquipmentCategory::Rod, 1);
        let after = check(&snapshot, &as_rod).unwrap();
        assert_eq!(
            after.equipment_count(EquipmentCategory::Rod, EquipmentId(5)),
            0,
        );
    }

    #[test]
    fn check_many_accumulates_and_short_circuits() {
        let mut snapshot = snapshot_with_coins(100);
        snapshot.items.insert(ItemId(1), 2);

        let fragments = [
            CostFragment::coins(60),
            CostFragment::item(ItemId(1), 2),
            CostFragment::coins(40),
        ];
        let after = check_many(&snapshot, &fragments).unwrap();
        assert_eq!(after.primary_currency, 0);
        assert_eq!(after.item_count(ItemId(1)), 0);

        // Two sequential 60-coin fragments exceed the 100 balance even
        // though each alone would fit.
        let fragments = [CostFragment::coins(60), CostFragment::coins(60)];
        let err = check_many(&snapshot, &fragments).unwrap_err();
        assert_eq!(err.required, 60);
        assert_eq!(err.available, 40);
    }
}
