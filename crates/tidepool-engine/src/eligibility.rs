//! The eligibility boundary: may this actor purchase this offer at all?
//!
//! Shop opening windows, offer sale windows, remaining stock, and per-user
//! limits live outside the engine, behind catalog storage the engine never
//! sees. The orchestrator consults an [`EligibilityGate`] before doing any
//! resolution work and aborts with the gate's reason when the purchase is
//! not allowed.
//!
//! Stock and limit counters are shared across actors; gate implementations
//! must check them with atomic increment-with-check semantics at their
//! storage layer. The engine does not lock for them.

use tidepool_types::{ActorId, OfferId};

/// Why a purchase is not currently allowed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EligibilityError {
    /// The shop is disabled.
    #[error("the shop is not currently enabled")]
    ShopInactive,

    /// The shop's opening date has not arrived.
    #[error("the shop has not opened yet")]
    ShopNotYetOpen,

    /// The shop's closing date has passed.
    #[error("the shop has closed")]
    ShopClosed,

    /// The current time falls outside the shop's daily opening window.
    /// Windows may span midnight (e.g. 21:00-04:00).
    #[error("the shop is outside its daily opening hours ({window})")]
    OutsideDailyWindow {
        /// The window, formatted as "HH:MM-HH:MM".
        window: String,
    },

    /// The offer is disabled.
    #[error("the offer is not currently enabled")]
    OfferInactive,

    /// The offer's sale window has not started.
    #[error("the offer is not on sale yet")]
    OfferNotYetOnSale,

    /// The offer's sale window has ended.
    #[error("the offer is no longer on sale")]
    OfferExpired,

    /// Global stock cannot cover the requested quantity.
    #[error("insufficient stock: {remaining} remaining")]
    OutOfStock {
        /// Units still available.
        remaining: u64,
    },

    /// The actor's lifetime purchase limit cannot cover the requested
    /// quantity.
    #[error("per-user limit reached: {remaining} more allowed")]
    PurchaseLimitReached {
        /// Units the actor may still purchase.
        remaining: u64,
    },

    /// The actor's daily purchase limit cannot cover the requested
    /// quantity.
    #[error("per-user daily limit reached: {remaining} more allowed today")]
    DailyLimitReached {
        /// Units the actor may still purchase today.
        remaining: u64,
    },
}

/// External gate deciding whether a purchase may proceed.
pub trait EligibilityGate {
    /// Check whether `actor` may purchase `quantity` units of `offer_id`
    /// right now.
    fn check(
        &self,
        actor: &ActorId,
        offer_id: OfferId,
        quantity: u64,
    ) -> Result<(), EligibilityError>;
}

/// A gate that allows everything, for embedders that enforce eligibility
/// elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEligible;

impl EligibilityGate for AlwaysEligible {
    fn check(
        &self,
        _actor: &ActorId,
        _offer_id: OfferId,
        _quantity: u64,
    ) -> Result<(), EligibilityError> {
        Ok(())
    }
}
