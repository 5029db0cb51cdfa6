//! The purchase orchestrator: the engine's single entry point.
//!
//! Sequence: eligibility gate, clause normalization, snapshot build,
//! mandatory feasibility, alternative solving, plan merge, execution.
//! Failures before execution abort with no mutation at all. A lost
//! execution race is retried with a fresh snapshot up to the configured
//! bound (one, by default) and then downgraded to "no feasible
//! alternative" -- resources legitimately changed between attempts, and
//! the race is never surfaced to callers.

use tracing::{debug, info, warn};

use tidepool_store::{PurchaseJournal, ResourceRepository};
use tidepool_types::{OfferDefinition, PurchaseReceipt, PurchaseRequest};

use crate::clause::CostClauseSet;
use crate::config::EngineConfig;
use crate::eligibility::EligibilityGate;
use crate::error::PurchaseError;
use crate::executor::{self, ExecutionParams};
use crate::plan::ResolvedPaymentPlan;
use crate::{feasibility, snapshot, solver};

/// Resolve how the offer will be paid and apply payment and rewards as
/// one atomic step.
///
/// The caller must serialize calls per actor (one in-flight purchase per
/// actor); see the crate documentation.
///
/// # Errors
///
/// - [`PurchaseError::Ineligible`] when the gate rejects the purchase.
/// - [`PurchaseError::MalformedCostDefinition`] for catalog errors.
/// - [`PurchaseError::InsufficientMandatory`] naming the missing
///   mandatory resource and shortfall.
/// - [`PurchaseError::NoFeasibleAlternative`] when every alternative
///   combination fails, or when execution raced twice.
/// - [`PurchaseError::Store`] when a snapshot read fails.
pub fn resolve_and_execute_purchase<R, J, G>(
    resources: &mut R,
    journal: &mut J,
    gate: &G,
    config: &EngineConfig,
    offer: &OfferDefinition,
    request: &PurchaseRequest,
) -> Result<PurchaseReceipt, PurchaseError>
where
    R: ResourceRepository + ?Sized,
    J: PurchaseJournal + ?Sized,
    G: EligibilityGate + ?Sized,
{
    gate.check(&request.actor, offer.offer_id, request.quantity)?;

    let clauses = CostClauseSet::resolve(&offer.costs, request.quantity)?;
    if clauses.alternative_groups.len() > config.solver.group_warn_threshold {
        warn!(
            offer = %offer.offer_id,
            groups = clauses.alternative_groups.len(),
            "alternative group count above advisory threshold; solve time is exponential in groups",
        );
    }

    let mut attempt: u32 = 0;
    loop {
        let world = snapshot::build_snapshot(resources, &request.actor)?;

        let after_mandatory = feasibility::check_many(&world, &clauses.mandatory)
            .map_err(PurchaseError::InsufficientMandatory)?;

        let Some(chosen) = solver::solve(&clauses.alternative_groups, &after_mandatory) else {
            debug!(
                actor = %request.actor,
                offer = %offer.offer_id,
                "no feasible alternative combination",
            );
            return Err(PurchaseError::NoFeasibleAlternative);
        };

        let plan =
            ResolvedPaymentPlan::from_fragments(clauses.mandatory.iter().chain(chosen.iter()))?;

        let params = ExecutionParams {
            actor: &request.actor,
            offer_id: offer.offer_id,
            quantity: request.quantity,
            plan: &plan,
            rewards: &offer.rewards,
        };

        match executor::execute(resources, journal, &params) {
            Ok(granted) => {
                info!(
                    actor = %request.actor,
                    offer = %offer.offer_id,
                    quantity = request.quantity,
                    granted = granted.len(),
                    "purchase completed",
                );
                return Ok(PurchaseReceipt {
                    offer_id: offer.offer_id,
                    quantity: request.quantity,
                    granted,
                });
            }
            Err(race) => {
                if attempt >= config.execution.race_retries {
                    warn!(
                        actor = %request.actor,
                        offer = %offer.offer_id,
                        error = %race,
                        "execution race retries exhausted",
                    );
                    return Err(PurchaseError::NoFeasibleAlternative);
                }
                warn!(
                    actor = %request.actor,
                    offer = %offer.offer_id,
                    error = %race,
                    "execution race lost; rebuilding snapshot and re-solving",
                );
                attempt = attempt.saturating_add(1);
            }
        }
    }
}
