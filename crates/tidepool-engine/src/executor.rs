//! The transaction executor: apply a proven payment plan for real.
//!
//! The executor is only ever invoked after the solver has proven
//! feasibility against a snapshot taken moments earlier. It deducts
//! currencies, then items, fish, and equipment, then grants every reward
//! once per purchased unit in declaration order, then records the
//! purchase for later limit checks.
//!
//! Real balances can still have moved since the snapshot. Every applied
//! step is journaled, and any storage failure unwinds the journal in
//! reverse -- crediting back currencies, items, and fish, and restoring
//! the exact equipment instances that were removed -- before
//! [`ExecutionRace`] is returned. Either every step applies or none do.

use chrono::Utc;
use tracing::{debug, warn};

use tidepool_store::{
    EquipmentInstance, PurchaseJournal, ResourceRepository, StoreError,
};
use tidepool_types::{
    ActorId, EquipmentCategory, FishId, ItemId, OfferId, PurchaseRecord, QualityTier, RewardGrant,
};

use crate::error::ExecutionRace;
use crate::plan::ResolvedPaymentPlan;

/// Everything the executor needs to apply one purchase.
#[derive(Debug)]
pub struct ExecutionParams<'a> {
    /// The purchasing actor.
    pub actor: &'a ActorId,
    /// The purchased offer.
    pub offer_id: OfferId,
    /// Units purchased; rewards apply once per unit.
    pub quantity: u64,
    /// The merged total cost.
    pub plan: &'a ResolvedPaymentPlan,
    /// Per-unit rewards in declaration order.
    pub rewards: &'a [RewardGrant],
}

/// One successfully applied step, kept so a later failure can undo it.
enum AppliedStep {
    Currency {
        primary: u64,
        secondary: u64,
    },
    Items {
        item_id: ItemId,
        amount: u64,
    },
    Fish {
        fish_id: FishId,
        quality: QualityTier,
        amount: u64,
    },
    Equipment {
        removed: Vec<EquipmentInstance>,
    },
    Granted {
        grant: RewardGrant,
    },
}

/// Apply the plan, grant rewards, and record the purchase.
///
/// Returns every grant that was applied, in application order.
///
/// # Errors
///
/// Returns [`ExecutionRace`] when any storage write fails; all previously
/// applied steps have been unwound by the time the error is returned.
pub fn execute<R, J>(
    resources: &mut R,
    journal: &mut J,
    params: &ExecutionParams<'_>,
) -> Result<Vec<RewardGrant>, ExecutionRace>
where
    R: ResourceRepository + ?Sized,
    J: PurchaseJournal + ?Sized,
{
    let mut applied = Vec::new();
    match apply_all(resources, journal, params, &mut applied) {
        Ok(granted) => {
            debug!(
                actor = %params.actor,
                offer = %params.offer_id,
                steps = applied.len(),
                "payment plan applied",
            );
            Ok(granted)
        }
        Err(source) => {
            unwind(resources, params.actor, applied);
            Err(ExecutionRace { source })
        }
    }
}

fn apply_all<R, J>(
    resources: &mut R,
    journal: &mut J,
    params: &ExecutionParams<'_>,
    applied: &mut Vec<AppliedStep>,
) -> Result<Vec<RewardGrant>, StoreError>
where
    R: ResourceRepository + ?Sized,
    J: PurchaseJournal + ?Sized,
{
    let plan = params.plan;
    let actor = params.actor;

    // Step 1: currencies.
    if plan.primary_currency > 0 || plan.secondary_currency > 0 {
        resources.deduct_currency(actor, plan.primary_currency, plan.secondary_currency)?;
        applied.push(AppliedStep::Currency {
            primary: plan.primary_currency,
            secondary: plan.secondary_currency,
        });
    }

    // Step 2: items, fish, equipment.
    for (&item_id, &amount) in &plan.items {
        resources.deduct_items(actor, item_id, amount)?;
        applied.push(AppliedStep::Items { item_id, amount });
    }
    for (&fish_id, &(quality, amount)) in &plan.fish {
        resources.deduct_fish(actor, fish_id, quality, amount)?;
        applied.push(AppliedStep::Fish {
            fish_id,
            quality,
            amount,
        });
    }
    for (&equipment_id, &amount) in &plan.rods {
        let removed = resources.remove_equipment_instances(
            actor,
            EquipmentCategory::Rod,
            equipment_id,
            amount,
        )?;
        applied.push(AppliedStep::Equipment { removed });
    }
    for (&equipment_id, &amount) in &plan.accessories {
        let removed = resources.remove_equipment_instances(
            actor,
            EquipmentCategory::Accessory,
            equipment_id,
            amount,
        )?;
        applied.push(AppliedStep::Equipment { removed });
    }

    // Step 3: rewards, once per purchased unit, in declaration order.
    let mut granted = Vec::new();
    for _unit in 0..params.quantity {
        for grant in params.rewards {
            resources.grant_reward(actor, grant)?;
            applied.push(AppliedStep::Granted {
                grant: grant.clone(),
            });
            granted.push(grant.clone());
        }
    }

    // Step 4: record the purchase for later limit checks.
    journal.record_purchase(PurchaseRecord {
        actor: actor.clone(),
        offer_id: params.offer_id,
        quantity: params.quantity,
        at: Utc::now(),
    })?;

    Ok(granted)
}

/// Undo applied steps in reverse order. Failures here are logged and
/// skipped; the remaining steps are still attempted.
fn unwind<R>(resources: &mut R, actor: &ActorId, applied: Vec<AppliedStep>)
where
    R: ResourceRepository + ?Sized,
{
    for step in applied.into_iter().rev() {
        let result = match step {
            AppliedStep::Currency { primary, secondary } => {
                resources.deposit_currency(actor, primary, secondary)
            }
            AppliedStep::Items { item_id, amount } => {
                resources.credit_items(actor, item_id, amount)
            }
            AppliedStep::Fish {
                fish_id,
                quality,
                amount,
            } => resources.credit_fish(actor, fish_id, quality, amount),
            AppliedStep::Equipment { removed } => {
                resources.restore_equipment_instances(actor, removed)
            }
            AppliedStep::Granted { grant } => resources.revoke_reward(actor, &grant),
        };
        if let Err(err) = result {
            warn!(%actor, error = %err, "compensating step failed during execution unwind");
        }
    }
}
