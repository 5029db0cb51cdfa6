//! Shared type definitions for the tidepool purchase engine.
//!
//! This crate is the single source of truth for the vocabulary used across
//! the tidepool workspace: typed identifiers, the cost and reward model,
//! the resource snapshot the solver branches on, and the purchase
//! request/record/receipt types.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers (catalog keys, actors,
//!   equipment instances)
//! - [`enums`] -- Enumeration types (currencies, equipment categories,
//!   cost relations, quality tiers)
//! - [`cost`] -- Raw cost rows and normalized cost fragments
//! - [`reward`] -- Reward grants
//! - [`snapshot`] -- The copy-on-branch resource snapshot
//! - [`purchase`] -- Offer definitions, requests, records, receipts

pub mod cost;
pub mod enums;
pub mod ids;
pub mod purchase;
pub mod reward;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use cost::{CostFragment, CostKind, RawCost, RawCostKind};
pub use enums::{CostRelation, CurrencyKind, EquipmentCategory, QualityTier};
pub use ids::{ActorId, EquipmentId, EquipmentInstanceId, FishId, ItemId, OfferId};
pub use purchase::{OfferDefinition, PurchaseRecord, PurchaseReceipt, PurchaseRequest};
pub use reward::{RewardGrant, RewardKind};
pub use snapshot::ResourceSnapshot;
