//! Error types for the tidepool storage seam.

use tidepool_types::ActorId;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The actor has no account in this store.
    #[error("unknown actor: {0}")]
    UnknownActor(ActorId),

    /// A write-time compare-and-decrement lost against the live balance.
    ///
    /// Raised when a deduction finds less of a resource than it needs at
    /// the moment of the write. From the engine's point of view this means
    /// its snapshot went stale between decision and execution.
    #[error("write-time race lost for {resource}: wanted {requested}, live balance {available}")]
    RaceLost {
        /// Human-readable name of the contested resource.
        resource: String,
        /// The amount the write tried to remove.
        requested: u64,
        /// The live balance found at write time.
        available: u64,
    },

    /// An arithmetic overflow occurred while adjusting a balance.
    #[error("arithmetic overflow in store operation: {context}")]
    ArithmeticOverflow {
        /// Description of the operation that overflowed.
        context: String,
    },
}
