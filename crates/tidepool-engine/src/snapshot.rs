//! Snapshot building: one consistent read of an actor's spendable
//! resources.
//!
//! The snapshot is built fresh for every purchase attempt and discarded
//! afterwards; it is never cached or shared across requests. Building is
//! a read-only aggregation over the repository -- currency balances,
//! generic item counts, fish counts per quality tier (already aggregated
//! across storage locations by the repository contract), and equipment
//! counts filtered to unlocked, unequipped instances.

use tidepool_store::{ResourceRepository, StoreError};
use tidepool_types::{ActorId, EquipmentCategory, ResourceSnapshot};

/// Build a point-in-time snapshot of `actor`'s spendable resources.
///
/// # Errors
///
/// Propagates any [`StoreError`] from the underlying reads.
pub fn build_snapshot<R>(repo: &R, actor: &ActorId) -> Result<ResourceSnapshot, StoreError>
where
    R: ResourceRepository + ?Sized,
{
    let balances = repo.balances(actor)?;
    Ok(ResourceSnapshot {
        primary_currency: balances.primary,
        secondary_currency: balances.secondary,
        items: repo.item_counts(actor)?,
        fish: repo.fish_counts(actor)?,
        rods: repo.spendable_equipment(actor, EquipmentCategory::Rod)?,
        accessories: repo.spendable_equipment(actor, EquipmentCategory::Accessory)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tidepool_store::{EquipmentInstance, MemoryStore};
    use tidepool_types::{EquipmentId, FishId, ItemId, QualityTier};

    use super::*;

    #[test]
    fn snapshot_aggregates_every_pool() {
        let mut store = MemoryStore::new();
        let actor = ActorId::new("snapshot-actor");
        store.set_balances(&actor, 500, 20);
        store.seed_items(&actor, ItemId(9), 3);
        store.seed_pond_fish(&actor, FishId(3), QualityTier::STANDARD, 1);
        store.seed_tank_fish(&actor, FishId(3), QualityTier::STANDARD, 1);
        store.seed_equipment(
            &actor,
            EquipmentInstance::new(EquipmentId(5), EquipmentCategory::Rod, 1),
        );
        let mut locked = EquipmentInstance::new(EquipmentId(5), EquipmentCategory::Rod, 1);
        locked.locked = true;
        store.seed_equipment(&actor, locked);

        let snapshot = build_snapshot(&store, &actor).unwrap();
        assert_eq!(snapshot.primary_currency, 500);
        assert_eq!(snapshot.secondary_currency, 20);
        assert_eq!(snapshot.item_count(ItemId(9)), 3);
        // Pond and tank fish arrive as one aggregated count.
        assert_eq!(snapshot.fish_count(FishId(3), QualityTier::STANDARD), 2);
        // The locked rod is invisible.
        assert_eq!(
            snapshot.equipment_count(EquipmentCategory::Rod, EquipmentId(5)),
            1,
        );
    }

    #[test]
    fn unknown_actor_propagates_the_store_error() {
        let store = MemoryStore::new();
        let result = build_snapshot(&store, &ActorId::new("nobody"));
        assert!(matches!(result, Err(StoreError::UnknownActor(_))));
    }
}
