//! Error types for the purchase engine.
//!
//! The taxonomy separates configuration errors (malformed cost
//! definitions, surfaced to operators), user-facing payment failures
//! (insufficient mandatory resources, no feasible alternative), and the
//! internal execution race that the orchestrator retries and never
//! surfaces directly. Nothing here is fatal to the process: every failure
//! is per-request, and actor state is untouched except on full success.

use tidepool_store::StoreError;
use tidepool_types::{CostKind, FishId, QualityTier, RawCostKind};

use crate::eligibility::EligibilityError;

// ---------------------------------------------------------------------------
// Cost definition errors
// ---------------------------------------------------------------------------

/// A cost definition that cannot be resolved into clauses.
///
/// These are configuration errors in the offer catalog, not user-facing
/// payment failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostDefinitionError {
    /// The requested purchase quantity was zero.
    #[error("requested quantity must be positive")]
    ZeroQuantity,

    /// A cost row names a kind that needs a catalog id but omits it.
    #[error("cost row of kind {kind:?} is missing its item id")]
    MissingItemId {
        /// The kind the row declared.
        kind: RawCostKind,
    },

    /// A cost row carries a zero per-unit amount.
    #[error("cost row of kind {kind:?} has a zero amount")]
    ZeroAmount {
        /// The kind the row declared.
        kind: RawCostKind,
    },

    /// An amount computation overflowed.
    #[error("arithmetic overflow in cost resolution: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// One payment plan would charge the same fish at two different
    /// quality tiers. Tiers never merge; this is a modeling error in the
    /// offer definition.
    #[error("fish {fish_id} appears at conflicting quality tiers {first} and {second}")]
    QualityTierConflict {
        /// The fish species charged twice.
        fish_id: FishId,
        /// The tier already recorded in the plan.
        first: QualityTier,
        /// The conflicting tier.
        second: QualityTier,
    },
}

// ---------------------------------------------------------------------------
// Insufficiency
// ---------------------------------------------------------------------------

/// A single resource shortfall found by a feasibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("need {required} of {kind}, have {available}")]
pub struct Insufficiency {
    /// The resource that fell short.
    pub kind: CostKind,
    /// How much the fragment required.
    pub required: u64,
    /// How much the snapshot held.
    pub available: u64,
}

// ---------------------------------------------------------------------------
// Execution race
// ---------------------------------------------------------------------------

/// The executor lost a write-time race: a deduction the solver proved
/// feasible against a snapshot failed against the live balance.
///
/// Every applied step has already been unwound when this is returned. The
/// orchestrator retries once with a fresh snapshot and never surfaces this
/// error to callers.
#[derive(Debug, thiserror::Error)]
#[error("execution lost a race to a concurrent writer: {source}")]
pub struct ExecutionRace {
    /// The storage-level failure that triggered the unwind.
    #[source]
    pub source: StoreError,
}

// ---------------------------------------------------------------------------
// Purchase errors
// ---------------------------------------------------------------------------

/// The failure side of a purchase outcome.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    /// The eligibility gate rejected the purchase before any resolution
    /// work.
    #[error("purchase not eligible: {0}")]
    Ineligible(#[from] EligibilityError),

    /// The offer's cost definition is malformed (operator-facing).
    #[error("malformed cost definition: {0}")]
    MalformedCostDefinition(#[from] CostDefinitionError),

    /// A mandatory cost cannot be met; names the missing resource and the
    /// shortfall.
    #[error("insufficient mandatory resource: {0}")]
    InsufficientMandatory(Insufficiency),

    /// Every alternative-group combination failed.
    #[error("no satisfiable combination of alternative payment options")]
    NoFeasibleAlternative,

    /// A storage read failed while building the snapshot.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
