//! Storage seam for the tidepool purchase engine.
//!
//! The engine consumes storage through the traits in [`repository`] and
//! never opens a connection itself. Production embedders back the traits
//! with their database; tests and standalone embedders use the complete
//! in-memory implementation in [`memory`].
//!
//! # Write semantics
//!
//! Every deduction is a compare-and-decrement against the live balance
//! and fails with [`StoreError::RaceLost`] when the balance is short at
//! write time. Implementations backed by shared storage must provide
//! atomic compare-and-decrement for any counter shared across actors
//! (e.g. remaining stock); the engine does not lock for them.
//!
//! # Modules
//!
//! - [`repository`] -- The [`ResourceRepository`] and [`PurchaseJournal`]
//!   contracts plus the equipment-instance model
//! - [`memory`] -- [`MemoryStore`], the in-memory implementation
//! - [`error`] -- [`StoreError`]

pub mod error;
pub mod memory;
pub mod repository;

// Re-export primary types at crate root.
pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::{CurrencyBalances, EquipmentInstance, PurchaseJournal, ResourceRepository};
