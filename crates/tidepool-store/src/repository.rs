//! Repository contracts consumed by the purchase engine.
//!
//! The engine never talks to a database. It is handed implementations of
//! these traits and stays free of any storage concern, which is also what
//! makes it trivially testable with in-memory fakes.
//!
//! # Write semantics
//!
//! Every deduction is a compare-and-decrement against the *live* balance:
//! when the balance at write time is insufficient, the operation fails
//! with [`StoreError::RaceLost`] and leaves the balance untouched. The
//! credit/deposit/restore methods are the compensating inverses the
//! engine's executor uses to unwind a partially applied payment.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tidepool_types::{
    ActorId, EquipmentCategory, EquipmentId, EquipmentInstanceId, FishId, ItemId, OfferId,
    PurchaseRecord, QualityTier, RewardGrant,
};

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Equipment instances
// ---------------------------------------------------------------------------

/// One concrete equipment instance owned by an actor.
///
/// Instances marked locked or equipped are invisible to the purchase
/// engine: they are never counted as spendable and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentInstance {
    /// Unique id of this instance.
    pub instance_id: EquipmentInstanceId,
    /// The template this instance was created from.
    pub template_id: EquipmentId,
    /// Which template namespace the id belongs to.
    pub category: EquipmentCategory,
    /// Current refine level.
    pub refine_level: u8,
    /// Whether the owner has locked the instance against spending.
    pub locked: bool,
    /// Whether the instance is currently equipped.
    pub equipped: bool,
}

impl EquipmentInstance {
    /// Create a fresh, unlocked, unequipped instance of a template.
    pub fn new(template_id: EquipmentId, category: EquipmentCategory, refine_level: u8) -> Self {
        Self {
            instance_id: EquipmentInstanceId::new(),
            template_id,
            category,
            refine_level,
            locked: false,
            equipped: false,
        }
    }

    /// Whether this instance may be spent by a purchase.
    #[must_use]
    pub const fn is_spendable(&self) -> bool {
        !self.locked && !self.equipped
    }
}

/// An actor's currency balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBalances {
    /// Primary-currency balance.
    pub primary: u64,
    /// Secondary-currency balance.
    pub secondary: u64,
}

// ---------------------------------------------------------------------------
// Resource repository
// ---------------------------------------------------------------------------

/// Read and write access to one actor's spendable resources.
///
/// Reads are single logical reads of the actor's current state. Fish
/// counts are aggregated across every storage location the fish may
/// reside in; equipment counts exclude locked and equipped instances.
pub trait ResourceRepository {
    /// Current currency balances.
    fn balances(&self, actor: &ActorId) -> Result<CurrencyBalances, StoreError>;

    /// Generic item counts by template id.
    fn item_counts(&self, actor: &ActorId) -> Result<BTreeMap<ItemId, u64>, StoreError>;

    /// Fish counts by species and quality tier, aggregated across storage
    /// locations.
    fn fish_counts(
        &self,
        actor: &ActorId,
    ) -> Result<BTreeMap<FishId, BTreeMap<QualityTier, u64>>, StoreError>;

    /// Spendable equipment counts for one category, by template id.
    fn spendable_equipment(
        &self,
        actor: &ActorId,
        category: EquipmentCategory,
    ) -> Result<BTreeMap<EquipmentId, u64>, StoreError>;

    /// Deduct both currencies in one compare-and-decrement.
    ///
    /// Fails with [`StoreError::RaceLost`] if either live balance is
    /// insufficient; on failure neither balance changes.
    fn deduct_currency(
        &mut self,
        actor: &ActorId,
        primary: u64,
        secondary: u64,
    ) -> Result<(), StoreError>;

    /// Deduct generic items.
    fn deduct_items(
        &mut self,
        actor: &ActorId,
        item_id: ItemId,
        amount: u64,
    ) -> Result<(), StoreError>;

    /// Deduct fish at one exact quality tier, drawing across storage
    /// locations.
    fn deduct_fish(
        &mut self,
        actor: &ActorId,
        fish_id: FishId,
        quality: QualityTier,
        amount: u64,
    ) -> Result<(), StoreError>;

    /// Remove `amount` spendable instances of one equipment template.
    ///
    /// Which concrete instances are removed among equal candidates is
    /// unspecified. Returns the removed instances so a failed execution
    /// can restore them exactly. Fails with [`StoreError::RaceLost`]
    /// (removing nothing) if fewer than `amount` spendable instances
    /// exist at write time.
    fn remove_equipment_instances(
        &mut self,
        actor: &ActorId,
        category: EquipmentCategory,
        equipment_id: EquipmentId,
        amount: u64,
    ) -> Result<Vec<EquipmentInstance>, StoreError>;

    /// Compensating inverse of [`deduct_currency`](Self::deduct_currency).
    fn deposit_currency(
        &mut self,
        actor: &ActorId,
        primary: u64,
        secondary: u64,
    ) -> Result<(), StoreError>;

    /// Compensating inverse of [`deduct_items`](Self::deduct_items).
    fn credit_items(
        &mut self,
        actor: &ActorId,
        item_id: ItemId,
        amount: u64,
    ) -> Result<(), StoreError>;

    /// Compensating inverse of [`deduct_fish`](Self::deduct_fish).
    fn credit_fish(
        &mut self,
        actor: &ActorId,
        fish_id: FishId,
        quality: QualityTier,
        amount: u64,
    ) -> Result<(), StoreError>;

    /// Put previously removed equipment instances back, unchanged.
    fn restore_equipment_instances(
        &mut self,
        actor: &ActorId,
        instances: Vec<EquipmentInstance>,
    ) -> Result<(), StoreError>;

    /// Apply one reward grant to the actor's holdings.
    fn grant_reward(&mut self, actor: &ActorId, grant: &RewardGrant) -> Result<(), StoreError>;

    /// Compensating inverse of [`grant_reward`](Self::grant_reward).
    ///
    /// For equipment grants this removes freshly granted spendable
    /// instances of the template rather than tracking the exact instance
    /// ids.
    fn revoke_reward(&mut self, actor: &ActorId, grant: &RewardGrant) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Purchase journal
// ---------------------------------------------------------------------------

/// Durable record of completed purchases, consulted by per-user limit
/// checks.
pub trait PurchaseJournal {
    /// Append one completed purchase.
    fn record_purchase(&mut self, record: PurchaseRecord) -> Result<(), StoreError>;

    /// Total units of one offer purchased by one actor, optionally
    /// restricted to purchases at or after `since`.
    fn purchased_count(
        &self,
        actor: &ActorId,
        offer_id: OfferId,
        since: Option<DateTime<Utc>>,
    ) -> Result<u64, StoreError>;
}
