//! Purchase cost resolution engine.
//!
//! Decides whether a purchase request can be paid for, picks *a* feasible
//! payment combination when an offer's cost is a boolean expression of
//! clauses (mandatory fragments plus groups of mutually exclusive
//! alternatives), and applies payment and rewards as a single atomic
//! step. Resources are heterogeneous: two currencies, generic items, fish
//! tracked by species and quality tier, and equipment tracked by template
//! while excluding locked and equipped instances.
//!
//! The engine is a library boundary, not a service. Catalog storage,
//! eligibility windows, and transport all live outside; storage is
//! reached only through the traits in `tidepool-store`.
//!
//! # Pipeline
//!
//! 1. [`eligibility`] -- external gate, consulted first
//! 2. [`clause`] -- raw cost rows into mandatory fragments and
//!    alternative groups
//! 3. [`snapshot`] -- one consistent read of the actor's spendable
//!    resources
//! 4. [`feasibility`] -- pure simulated deduction over snapshot values
//! 5. [`solver`] -- backtracking search for one feasible choice per group
//! 6. [`plan`] -- merge of mandatory and chosen fragments
//! 7. [`executor`] -- real deductions, rewards, and the purchase record,
//!    with unwind on any write-time race
//! 8. [`purchase`] -- the orchestrator tying the pipeline together
//!
//! # Concurrency contract
//!
//! The engine is synchronous and holds nothing across calls. Between the
//! snapshot read and the execution writes there is an unavoidable race
//! window; the engine closes it for a *single* request by unwinding on
//! any write-time failure, but callers must provide per-actor
//! serialization (one in-flight purchase per actor) and atomic
//! compare-and-decrement at the storage layer for any counter shared
//! across actors, such as remaining stock. A lost race is retried once
//! with a fresh snapshot and otherwise reported as
//! [`PurchaseError::NoFeasibleAlternative`], never as an error of its
//! own.

pub mod clause;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod executor;
pub mod feasibility;
pub mod plan;
pub mod purchase;
pub mod snapshot;
pub mod solver;

// Re-export primary types at crate root for convenience.
pub use clause::CostClauseSet;
pub use config::{ConfigError, EngineConfig, ExecutionConfig, SolverConfig};
pub use eligibility::{AlwaysEligible, EligibilityError, EligibilityGate};
pub use error::{CostDefinitionError, ExecutionRace, Insufficiency, PurchaseError};
pub use executor::ExecutionParams;
pub use plan::ResolvedPaymentPlan;
pub use purchase::resolve_and_execute_purchase;
pub use snapshot::build_snapshot;
pub use solver::solve;
