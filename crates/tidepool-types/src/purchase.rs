//! Purchase vocabulary: offers, requests, records, and receipts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cost::RawCost;
use crate::ids::{ActorId, OfferId};
use crate::reward::RewardGrant;

/// A purchasable offer's cost and reward definition.
///
/// Catalog storage is external to the engine; callers load the offer from
/// wherever it lives and hand the definition in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDefinition {
    /// The offer being purchased.
    pub offer_id: OfferId,
    /// Raw cost rows, per unit, grouped by `group_id`.
    pub costs: Vec<RawCost>,
    /// Rewards applied once per purchased unit, in declaration order.
    pub rewards: Vec<RewardGrant>,
}

/// One actor's request to purchase some quantity of an offer.
///
/// The offer itself travels separately as an [`OfferDefinition`]; the
/// request only says who is buying and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// The purchasing actor.
    pub actor: ActorId,
    /// How many units to purchase. Must be positive.
    pub quantity: u64,
}

/// The durable record of one completed purchase, used by per-user limit
/// checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// The purchasing actor.
    pub actor: ActorId,
    /// The purchased offer.
    pub offer_id: OfferId,
    /// How many units were purchased.
    pub quantity: u64,
    /// When the purchase completed.
    pub at: DateTime<Utc>,
}

/// The success payload of a resolved purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// The purchased offer.
    pub offer_id: OfferId,
    /// How many units were purchased.
    pub quantity: u64,
    /// Every grant that was applied, in application order.
    pub granted: Vec<RewardGrant>,
}
