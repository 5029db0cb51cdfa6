//! In-memory store used by tests and embedders without a database.
//!
//! Mirrors the observable behavior of the production storage layer:
//! fish live in two locations (pond and tank) and are aggregated on read,
//! fish deductions drain the pond before the tank, equipment instances
//! carry lock/equip flags, and every deduction is a compare-and-decrement
//! against the live balance.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use tidepool_types::{
    ActorId, CurrencyKind, EquipmentCategory, EquipmentId, FishId, ItemId, OfferId,
    PurchaseRecord, QualityTier, RewardGrant, RewardKind,
};

use crate::error::StoreError;
use crate::repository::{
    CurrencyBalances, EquipmentInstance, PurchaseJournal, ResourceRepository,
};

/// Fish holdings of one storage location: species -> tier -> count.
type FishMap = BTreeMap<FishId, BTreeMap<QualityTier, u64>>;

// ---------------------------------------------------------------------------
// Account state
// ---------------------------------------------------------------------------

/// Everything one actor owns.
#[derive(Debug, Clone, Default)]
struct ActorAccount {
    primary: u64,
    secondary: u64,
    items: BTreeMap<ItemId, u64>,
    baits: BTreeMap<ItemId, u64>,
    pond_fish: FishMap,
    tank_fish: FishMap,
    equipment: Vec<EquipmentInstance>,
}

/// An in-memory implementation of the repository contracts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    accounts: BTreeMap<ActorId, ActorAccount>,
    purchases: Vec<PurchaseRecord>,
}

// ---------------------------------------------------------------------------
// Map helpers
// ---------------------------------------------------------------------------

fn fish_cell(map: &FishMap, fish_id: FishId, quality: QualityTier) -> u64 {
    map.get(&fish_id)
        .and_then(|tiers| tiers.get(&quality))
        .copied()
        .unwrap_or(0)
}

fn add_to_fish_cell(
    map: &mut FishMap,
    fish_id: FishId,
    quality: QualityTier,
    amount: u64,
) -> Result<(), StoreError> {
    let cell = map.entry(fish_id).or_default().entry(quality).or_insert(0);
    *cell = cell
        .checked_add(amount)
        .ok_or_else(|| StoreError::ArithmeticOverflow {
            context: format!("fish {fish_id} quality {quality} count overflow"),
        })?;
    Ok(())
}

/// Remove `amount` from one fish cell, pruning empty entries. The caller
/// has already verified the cell holds at least `amount`.
fn drain_fish_cell(map: &mut FishMap, fish_id: FishId, quality: QualityTier, amount: u64) {
    let mut prune_species = false;
    if let Some(tiers) = map.get_mut(&fish_id) {
        let remaining = tiers
            .get(&quality)
            .copied()
            .unwrap_or(0)
            .saturating_sub(amount);
        if remaining == 0 {
            tiers.remove(&quality);
        } else {
            tiers.insert(quality, remaining);
        }
        prune_species = tiers.is_empty();
    }
    if prune_species {
        map.remove(&fish_id);
    }
}

fn add_to_count_map<K: Ord + core::fmt::Display>(
    map: &mut BTreeMap<K, u64>,
    key: K,
    amount: u64,
    what: &str,
) -> Result<(), StoreError> {
    let context = format!("{what} {key} count overflow");
    let entry = map.entry(key).or_insert(0);
    *entry = entry
        .checked_add(amount)
        .ok_or(StoreError::ArithmeticOverflow { context })?;
    Ok(())
}

fn take_from_count_map<K: Ord + core::fmt::Display>(
    map: &mut BTreeMap<K, u64>,
    key: &K,
    amount: u64,
    resource: &str,
) -> Result<(), StoreError> {
    let available = map.get(key).copied().unwrap_or(0);
    if available < amount {
        return Err(StoreError::RaceLost {
            resource: format!("{resource} {key}"),
            requested: amount,
            available,
        });
    }
    let remaining = available.saturating_sub(amount);
    if remaining == 0 {
        map.remove(key);
    } else if let Some(entry) = map.get_mut(key) {
        *entry = remaining;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Seeding and inspection
// ---------------------------------------------------------------------------

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
            purchases: Vec::new(),
        }
    }

    fn account(&self, actor: &ActorId) -> Result<&ActorAccount, StoreError> {
        self.accounts
            .get(actor)
            .ok_or_else(|| StoreError::UnknownActor(actor.clone()))
    }

    fn account_mut(&mut self, actor: &ActorId) -> Result<&mut ActorAccount, StoreError> {
        self.accounts
            .get_mut(actor)
            .ok_or_else(|| StoreError::UnknownActor(actor.clone()))
    }

    /// Create the actor's account (if needed) and set both balances.
    pub fn set_balances(&mut self, actor: &ActorId, primary: u64, secondary: u64) {
        let account = self.accounts.entry(actor.clone()).or_default();
        account.primary = primary;
        account.secondary = secondary;
    }

    /// Add generic items to the actor's holdings, creating the account if
    /// needed.
    pub fn seed_items(&mut self, actor: &ActorId, item_id: ItemId, amount: u64) {
        let account = self.accounts.entry(actor.clone()).or_default();
        let entry = account.items.entry(item_id).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Add fish to the actor's pond.
    pub fn seed_pond_fish(
        &mut self,
        actor: &ActorId,
        fish_id: FishId,
        quality: QualityTier,
        amount: u64,
    ) {
        let account = self.accounts.entry(actor.clone()).or_default();
        let cell = account
            .pond_fish
            .entry(fish_id)
            .or_default()
            .entry(quality)
            .or_insert(0);
        *cell = cell.saturating_add(amount);
    }

    /// Add fish to the actor's tank.
    pub fn seed_tank_fish(
        &mut self,
        actor: &ActorId,
        fish_id: FishId,
        quality: QualityTier,
        amount: u64,
    ) {
        let account = self.accounts.entry(actor.clone()).or_default();
        let cell = account
            .tank_fish
            .entry(fish_id)
            .or_default()
            .entry(quality)
            .or_insert(0);
        *cell = cell.saturating_add(amount);
    }

    /// Add one equipment instance to the actor's holdings.
    pub fn seed_equipment(&mut self, actor: &ActorId, instance: EquipmentInstance) {
        let account = self.accounts.entry(actor.clone()).or_default();
        account.equipment.push(instance);
    }

    /// All equipment instances the actor owns, spendable or not.
    pub fn equipment_instances(
        &self,
        actor: &ActorId,
    ) -> Result<Vec<EquipmentInstance>, StoreError> {
        Ok(self.account(actor)?.equipment.clone())
    }

    /// Bait count for one bait template.
    pub fn bait_count(&self, actor: &ActorId, item_id: ItemId) -> Result<u64, StoreError> {
        Ok(self.account(actor)?.baits.get(&item_id).copied().unwrap_or(0))
    }

    /// All recorded purchases, in insertion order.
    #[must_use]
    pub fn purchase_records(&self) -> &[PurchaseRecord] {
        &self.purchases
    }
}

// ---------------------------------------------------------------------------
// ResourceRepository
// ---------------------------------------------------------------------------

impl ResourceRepository for MemoryStore {
    fn balances(&self, actor: &ActorId) -> Result<CurrencyBalances, StoreError> {
        let account = self.account(actor)?;
        Ok(CurrencyBalances {
            primary: account.primary,
            secondary: account.secondary,
        })
    }

    fn item_counts(&self, actor: &ActorId) -> Result<BTreeMap<ItemId, u64>, StoreError> {
        Ok(self.account(actor)?.items.clone())
    }

    fn fish_counts(
        &self,
        actor: &ActorId,
    ) -> Result<BTreeMap<FishId, BTreeMap<QualityTier, u64>>, StoreError> {
        let account = self.account(actor)?;
        let mut merged = account.pond_fish.clone();
        for (fish_id, tiers) in &account.tank_fish {
            for (quality, count) in tiers {
                let cell = merged.entry(*fish_id).or_default().entry(*quality).or_insert(0);
                *cell = cell.saturating_add(*count);
            }
        }
        Ok(merged)
    }

    fn spendable_equipment(
        &self,
        actor: &ActorId,
        category: EquipmentCategory,
    ) -> Result<BTreeMap<EquipmentId, u64>, StoreError> {
        let account = self.account(actor)?;
        let mut counts: BTreeMap<EquipmentId, u64> = BTreeMap::new();
        for instance in &account.equipment {
            if instance.category == category && instance.is_spendable() {
                let entry = counts.entry(instance.template_id).or_insert(0);
                *entry = entry.saturating_add(1);
            }
        }
        Ok(counts)
    }

    fn deduct_currency(
        &mut self,
        actor: &ActorId,
        primary: u64,
        secondary: u64,
    ) -> Result<(), StoreError> {
        let account = self.account_mut(actor)?;
        if account.primary < primary {
            return Err(StoreError::RaceLost {
                resource: String::from("primary currency"),
                requested: primary,
                available: account.primary,
            });
        }
        if account.secondary < secondary {
            return Err(StoreError::RaceLost {
                resource: String::from("secondary currency"),
                requested: secondary,
                available: account.secondary,
            });
        }
        account.primary = account.primary.saturating_sub(primary);
        account.secondary = account.secondary.saturating_sub(secondary);
        Ok(())
    }

    fn deduct_items(
        &mut self,
        actor: &ActorId,
        item_id: ItemId,
        amount: u64,
    ) -> Result<(), StoreError> {
        let account = self.account_mut(actor)?;
        take_from_count_map(&mut account.items, &item_id, amount, "item")
    }

    fn deduct_fish(
        &mut self,
        actor: &ActorId,
        fish_id: FishId,
        quality: QualityTier,
        amount: u64,
    ) -> Result<(), StoreError> {
        let account = self.account_mut(actor)?;
        let in_pond = fish_cell(&account.pond_fish, fish_id, quality);
        let in_tank = fish_cell(&account.tank_fish, fish_id, quality);
        let available = in_pond.saturating_add(in_tank);
        if available < amount {
            return Err(StoreError::RaceLost {
                resource: format!("fish {fish_id} (quality {quality})"),
                requested: amount,
                available,
            });
        }
        // Pond first, tank for the remainder.
        let from_pond = in_pond.min(amount);
        drain_fish_cell(&mut account.pond_fish, fish_id, quality, from_pond);
        let from_tank = amount.saturating_sub(from_pond);
        if from_tank > 0 {
            drain_fish_cell(&mut account.tank_fish, fish_id, quality, from_tank);
        }
        Ok(())
    }

    fn remove_equipment_instances(
        &mut self,
        actor: &ActorId,
        category: EquipmentCategory,
        equipment_id: EquipmentId,
        amount: u64,
    ) -> Result<Vec<EquipmentInstance>, StoreError> {
        let account = self.account_mut(actor)?;
        let wanted = usize::try_from(amount).unwrap_or(usize::MAX);

        let mut taken = Vec::new();
        let mut kept = Vec::new();
        for instance in account.equipment.drain(..) {
            if taken.len() < wanted
                && instance.category == category
                && instance.template_id == equipment_id
                && instance.is_spendable()
            {
                taken.push(instance);
            } else {
                kept.push(instance);
            }
        }

        if taken.len() < wanted {
            let available = u64::try_from(taken.len()).unwrap_or(u64::MAX);
            // Not enough spendable instances: put everything back untouched.
            kept.append(&mut taken);
            account.equipment = kept;
            let resource = match category {
                EquipmentCategory::Rod => format!("rod {equipment_id}"),
                EquipmentCategory::Accessory => format!("accessory {equipment_id}"),
            };
            return Err(StoreError::RaceLost {
                resource,
                requested: amount,
                available,
            });
        }

        account.equipment = kept;
        Ok(taken)
    }

    fn deposit_currency(
        &mut self,
        actor: &ActorId,
        primary: u64,
        secondary: u64,
    ) -> Result<(), StoreError> {
        let account = self.account_mut(actor)?;
        account.primary = account
            .primary
            .checked_add(primary)
            .ok_or_else(|| StoreError::ArithmeticOverflow {
                context: String::from("primary currency balance overflow"),
            })?;
        account.secondary = account
            .secondary
            .checked_add(secondary)
            .ok_or_else(|| StoreError::ArithmeticOverflow {
                context: String::from("secondary currency balance overflow"),
            })?;
        Ok(())
    }

    fn credit_items(
        &mut self,
        actor: &ActorId,
        item_id: ItemId,
        amount: u64,
    ) -> Result<(), StoreError> {
        let account = self.account_mut(actor)?;
        add_to_count_map(&mut account.items, item_id, amount, "item")
    }

    fn credit_fish(
        &mut self,
        actor: &ActorId,
        fish_id: FishId,
        quality: QualityTier,
        amount: u64,
    ) -> Result<(), StoreError> {
        let account = self.account_mut(actor)?;
        add_to_fish_cell(&mut account.pond_fish, fish_id, quality, amount)
    }

    fn restore_equipment_instances(
        &mut self,
        actor: &ActorId,
        instances: Vec<EquipmentInstance>,
    ) -> Result<(), StoreError> {
        let account = self.account_mut(actor)?;
        account.equipment.extend(instances);
        Ok(())
    }

    fn grant_reward(&mut self, actor: &ActorId, grant: &RewardGrant) -> Result<(), StoreError> {
        let account = self.account_mut(actor)?;
        match grant.kind {
            RewardKind::Currency(CurrencyKind::Primary) => {
                account.primary = account.primary.checked_add(grant.amount).ok_or_else(|| {
                    StoreError::ArithmeticOverflow {
                        context: String::from("primary currency balance overflow"),
                    }
                })?;
            }
            RewardKind::Currency(CurrencyKind::Secondary) => {
                account.secondary =
                    account.secondary.checked_add(grant.amount).ok_or_else(|| {
                        StoreError::ArithmeticOverflow {
                            context: String::from("secondary currency balance overflow"),
                        }
                    })?;
            }
            RewardKind::Item(item_id) => {
                add_to_count_map(&mut account.items, item_id, grant.amount, "item")?;
            }
            RewardKind::Bait(item_id) => {
                add_to_count_map(&mut account.baits, item_id, grant.amount, "bait")?;
            }
            RewardKind::Fish { fish_id, quality } => {
                add_to_fish_cell(&mut account.pond_fish, fish_id, quality, grant.amount)?;
            }
            RewardKind::Rod {
                equipment_id,
                refine_level,
            } => {
                for _ in 0..grant.amount {
                    account.equipment.push(EquipmentInstance::new(
                        equipment_id,
                        EquipmentCategory::Rod,
                        refine_level,
                    ));
                }
            }
            RewardKind::Accessory {
                equipment_id,
                refine_level,
            } => {
                for _ in 0..grant.amount {
                    account.equipment.push(EquipmentInstance::new(
                        equipment_id,
                        EquipmentCategory::Accessory,
                        refine_level,
                    ));
                }
            }
        }
        Ok(())
    }

    fn revoke_reward(&mut self, actor: &ActorId, grant: &RewardGrant) -> Result<(), StoreError> {
        match grant.kind {
            RewardKind::Currency(CurrencyKind::Primary) => {
                self.deduct_currency(actor, grant.amount, 0)
            }
            RewardKind::Currency(CurrencyKind::Secondary) => {
                self.deduct_currency(actor, 0, grant.amount)
            }
            RewardKind::Item(item_id) => self.deduct_items(actor, item_id, grant.amount),
            RewardKind::Bait(item_id) => {
                let account = self.account_mut(actor)?;
                take_from_count_map(&mut account.baits, &item_id, grant.amount, "bait")
            }
            RewardKind::Fish { fish_id, quality } => {
                self.deduct_fish(actor, fish_id, quality, grant.amount)
            }
            RewardKind::Rod { equipment_id, .. } => self
                .remove_equipment_instances(
                    actor,
                    EquipmentCategory::Rod,
                    equipment_id,
                    grant.amount,
                )
                .map(|_| ()),
            RewardKind::Accessory { equipment_id, .. } => self
                .remove_equipment_instances(
                    actor,
                    EquipmentCategory::Accessory,
                    equipment_id,
                    grant.amount,
                )
                .map(|_| ()),
        }
    }
}

// ---------------------------------------------------------------------------
// PurchaseJournal
// ---------------------------------------------------------------------------

impl PurchaseJournal for MemoryStore {
    fn record_purchase(&mut self, record: PurchaseRecord) -> Result<(), StoreError> {
        self.purchases.push(record);
        Ok(())
    }

    fn purchased_count(
        &self,
        actor: &ActorId,
        offer_id: OfferId,
        since: Option<DateTime<Utc>>,
    ) -> Result<u64, StoreError> {
        let mut total: u64 = 0;
        for record in &self.purchases {
            if record.actor != *actor || record.offer_id != offer_id {
                continue;
            }
            if let Some(cutoff) = since
                && record.at < cutoff
            {
                continue;
            }
            total = total.saturating_add(record.quantity);
        }
        Ok(total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn actor() -> ActorId {
        ActorId::new("actor-1")
    }

    #[test]
    fn unknown_actor_is_an_error() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.balances(&actor()),
            Err(StoreError::UnknownActor(_)),
        ));
    }

    #[test]
    fn fish_counts_aggregate_pond_and_tank() {
        let mut store = MemoryStore::new();
        let a = actor();
        store.seed_pond_fish(&a, FishId(3), QualityTier::STANDARD, 2);
        store.seed_tank_fish(&a, FishId(3), QualityTier::STANDARD, 3);
        store.seed_tank_fish(&a, FishId(3), QualityTier::PREMIUM, 1);

        let counts = store.fish_counts(&a).unwrap();
        let tiers = counts.get(&FishId(3)).unwrap();
        assert_eq!(tiers.get(&QualityTier::STANDARD).copied(), Some(5));
        assert_eq!(tiers.get(&QualityTier::PREMIUM).copied(), Some(1));
    }

    #[test]
    fn deduct_fish_drains_pond_before_tank() {
        let mut store = MemoryStore::new();
        let a = actor();
        store.seed_pond_fish(&a, FishId(3), QualityTier::STANDARD, 2);
        store.seed_tank_fish(&a, FishId(3), QualityTier::STANDARD, 3);

        store.deduct_fish(&a, FishId(3), QualityTier::STANDARD, 4).unwrap();

        let counts = store.fish_counts(&a).unwrap();
        let remaining = counts
            .get(&FishId(3))
            .and_then(|tiers| tiers.get(&QualityTier::STANDARD))
            .copied()
            .unwrap_or(0);
        assert_eq!(remaining, 1);
    }

    #[test]
    fn deduct_fish_never_crosses_quality_tiers() {
        let mut store = MemoryStore::new();
        let a = actor();
        store.seed_pond_fish(&a, FishId(3), QualityTier::STANDARD, 10);

        let result = store.deduct_fish(&a, FishId(3), QualityTier::PREMIUM, 1);
        assert!(matches!(result, Err(StoreError::RaceLost { .. })));
    }

    #[test]
    fn spendable_equipment_excludes_locked_and_equipped() {
        let mut store = MemoryStore::new();
        let a = actor();
        let mut locked = EquipmentInstance::new(EquipmentId(5), EquipmentCategory::Rod, 1);
        locked.locked = true;
        let mut equipped = EquipmentInstance::new(EquipmentId(5), EquipmentCategory::Rod, 1);
        equipped.equipped = true;
        store.seed_equipment(&a, locked);
        store.seed_equipment(&a, equipped);
        store.seed_equipment(&a, EquipmentInstance::new(EquipmentId(5), EquipmentCategory::Rod, 2));

        let counts = store.spendable_equipment(&a, EquipmentCategory::Rod).unwrap();
        assert_eq!(counts.get(&EquipmentId(5)).copied(), Some(1));
    }

    #[test]
    fn remove_equipment_is_all_or_nothing() {
        let mut store = MemoryStore::new();
        let a = actor();
        store.seed_equipment(&a, EquipmentInstance::new(EquipmentId(5), EquipmentCategory::Rod, 1));

        let result = store.remove_equipment_instances(&a, EquipmentCategory::Rod, EquipmentId(5), 2);
        assert!(matches!(result, Err(StoreError::RaceLost { .. })));
        // The single spendable instance is still there.
        assert_eq!(store.equipment_instances(&a).unwrap().len(), 1);
    }

    #[test]
    fn removed_instances_can_be_restored_exactly() {
        let mut store = MemoryStore::new();
        let a = actor();
        let instance = EquipmentInstance::new(EquipmentId(7), EquipmentCategory::Accessory, 3);
        let instance_id = instance.instance_id;
        store.seed_equipment(&a, instance);

        let removed = store
            .remove_equipment_instances(&a, EquipmentCategory::Accessory, EquipmentId(7), 1)
            .unwrap();
        assert_eq!(store.equipment_instances(&a).unwrap().len(), 0);

        store.restore_equipment_instances(&a, removed).unwrap();
        let restored = store.equipment_instances(&a).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.first().map(|i| i.instance_id), Some(instance_id));
        assert_eq!(restored.first().map(|i| i.refine_level), Some(3));
    }

    #[test]
    fn currency_deduction_is_atomic_across_both_balances() {
        let mut store = MemoryStore::new();
        let a = actor();
        store.set_balances(&a, 100, 5);

        // Secondary is short: neither balance may change.
        let result = store.deduct_currency(&a, 50, 10);
        assert!(matches!(result, Err(StoreError::RaceLost { .. })));
        let balances = store.balances(&a).unwrap();
        assert_eq!(balances.primary, 100);
        assert_eq!(balances.secondary, 5);
    }

    #[test]
    fn grant_and_revoke_round_trip() {
        let mut store = MemoryStore::new();
        let a = actor();
        store.set_balances(&a, 0, 0);

        let rod = RewardGrant::rod(EquipmentId(9), 2);
        store.grant_reward(&a, &rod).unwrap();
        assert_eq!(store.equipment_instances(&a).unwrap().len(), 1);

        store.revoke_reward(&a, &rod).unwrap();
        assert_eq!(store.equipment_instances(&a).unwrap().len(), 0);

        let bait = RewardGrant {
            kind: RewardKind::Bait(ItemId(2)),
            amount: 5,
        };
        store.grant_reward(&a, &bait).unwrap();
        assert_eq!(store.bait_count(&a, ItemId(2)).unwrap(), 5);
    }

    #[test]
    fn purchased_count_honors_the_since_filter() {
        let mut store = MemoryStore::new();
        let a = actor();
        let now = Utc::now();
        store
            .record_purchase(PurchaseRecord {
                actor: a.clone(),
                offer_id: OfferId(1),
                quantity: 2,
                at: now - Duration::days(2),
            })
            .unwrap();
        store
            .record_purchase(PurchaseRecord {
                actor: a.clone(),
                offer_id: OfferId(1),
                quantity: 3,
                at: now,
            })
            .unwrap();

        assert_eq!(store.purchased_count(&a, OfferId(1), None).unwrap(), 5);
        assert_eq!(
            store
                .purchased_count(&a, OfferId(1), Some(now - Duration::days(1)))
                .unwrap(),
            3,
        );
        assert_eq!(store.purchased_count(&a, OfferId(2), None).unwrap(), 0);
    }
}
