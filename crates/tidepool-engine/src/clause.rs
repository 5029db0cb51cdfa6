//! Cost clause normalization: raw catalog rows into mandatory fragments
//! and alternative groups.
//!
//! Rows are grouped by their `group_id` (absent ids default to group 0).
//! A group with a single member, or whose relation tag is `And`, folds
//! into the mandatory set; a group with more than one member marked `Or`
//! becomes one alternative group of mutually exclusive options. Groups
//! are processed in ascending `group_id` order so resolution is
//! reproducible for identical inputs.
//!
//! Every fragment amount is the row's per-unit amount multiplied by the
//! requested purchase quantity before any grouping decision is made.

use std::collections::BTreeMap;

use tidepool_types::{
    CostFragment, CostKind, CostRelation, CurrencyKind, EquipmentCategory, EquipmentId, FishId,
    ItemId, QualityTier, RawCost, RawCostKind,
};

use crate::error::CostDefinitionError;

/// The normalized representation of what must be paid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostClauseSet {
    /// Fragments that must always be paid.
    pub mandatory: Vec<CostFragment>,
    /// Groups of mutually exclusive alternatives; exactly one fragment
    /// per group must be paid.
    pub alternative_groups: Vec<Vec<CostFragment>>,
}

impl CostClauseSet {
    /// Normalize raw cost rows for a purchase of `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns [`CostDefinitionError::ZeroQuantity`] for a zero quantity,
    /// [`CostDefinitionError::MissingItemId`] when a row's kind needs a
    /// catalog id it does not carry, [`CostDefinitionError::ZeroAmount`]
    /// for zero per-unit amounts, and
    /// [`CostDefinitionError::ArithmeticOverflow`] when pre-multiplication
    /// overflows.
    pub fn resolve(rows: &[RawCost], quantity: u64) -> Result<Self, CostDefinitionError> {
        if quantity == 0 {
            return Err(CostDefinitionError::ZeroQuantity);
        }

        // Group rows by group id, keeping declaration order within each
        // group. BTreeMap iteration gives the stable ascending group order.
        let mut groups: BTreeMap<i64, Vec<&RawCost>> = BTreeMap::new();
        for row in rows {
            groups.entry(row.group_id.unwrap_or(0)).or_default().push(row);
        }

        let mut mandatory = Vec::new();
        let mut alternative_groups = Vec::new();

        for members in groups.values() {
            let is_alternative = members.len() > 1
                && members.first().map(|row| row.relation) == Some(CostRelation::Or);

            if is_alternative {
                let mut options = Vec::with_capacity(members.len());
                for &row in members {
                    options.push(fragment_from_row(row, quantity)?);
                }
                alternative_groups.push(options);
            } else {
                for &row in members {
                    mandatory.push(fragment_from_row(row, quantity)?);
                }
            }
        }

        Ok(Self {
            mandatory,
            alternative_groups,
        })
    }
}

/// Validate one raw row and scale its amount by the purchase quantity.
fn fragment_from_row(row: &RawCost, quantity: u64) -> Result<CostFragment, CostDefinitionError> {
    if row.amount == 0 {
        return Err(CostDefinitionError::ZeroAmount { kind: row.kind });
    }

    let amount = row.amount.checked_mul(quantity).ok_or_else(|| {
        CostDefinitionError::ArithmeticOverflow {
            context: format!("per-unit amount {} times quantity {quantity}", row.amount),
        }
    })?;

    let kind = match row.kind {
        RawCostKind::Coins => CostKind::Currency(CurrencyKind::Primary),
        RawCostKind::Premium => CostKind::Currency(CurrencyKind::Secondary),
        RawCostKind::Item => CostKind::Item(ItemId(require_item_id(row)?)),
        RawCostKind::Fish => CostKind::Fish {
            fish_id: FishId(require_item_id(row)?),
            quality: row.quality.unwrap_or(QualityTier::STANDARD),
        },
        RawCostKind::Rod => CostKind::Equipment {
            equipment_id: EquipmentId(require_item_id(row)?),
            category: EquipmentCategory::Rod,
        },
        RawCostKind::Accessory => CostKind::Equipment {
            equipment_id: EquipmentId(require_item_id(row)?),
            category: EquipmentCategory::Accessory,
        },
    };

    Ok(CostFragment { kind, amount })
}

fn require_item_id(row: &RawCost) -> Result<i64, CostDefinitionError> {
    row.cost_item_id
        .ok_or(CostDefinitionError::MissingItemId { kind: row.kind })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins_row(group_id: Option<i64>, relation: CostRelation, amount: u64) -> RawCost {
        RawCost {
            group_id,
            relation,
            kind: RawCostKind::Coins,
            cost_item_id: None,
            quality: None,
            amount,
        }
    }

    fn item_row(group_id: Option<i64>, relation: CostRelation, item_id: i64, amount: u64) -> RawCost {
        RawCost {
            group_id,
            relation,
            kind: RawCostKind::Item,
            cost_item_id: Some(item_id),
            quality: None,
            amount,
        }
    }

    #[test]
    fn ungrouped_rows_fold_into_mandatory() {
        let rows = [coins_row(None, CostRelation::And, 100)];
        let clauses = CostClauseSet::resolve(&rows, 1);
        assert_eq!(
            clauses.ok(),
            Some(CostClauseSet {
                mandatory: vec![CostFragment::coins(100)],
                alternative_groups: Vec::new(),
            }),
        );
    }

    #[test]
    fn single_member_or_group_is_mandatory() {
        let rows = [item_row(Some(1), CostRelation::Or, 9, 2)];
        let clauses = CostClauseSet::resolve(&rows, 1);
        assert_eq!(
            clauses.ok(),
            Some(CostClauseSet {
                mandatory: vec![CostFragment::item(ItemId(9), 2)],
                alternative_groups: Vec::new(),
            }),
        );
    }

    #[test]
    fn multi_member_or_group_becomes_alternatives() {
        let rows = [
            item_row(Some(1), CostRelation::Or, 9, 1),
            coins_row(Some(1), CostRelation::Or, 50),
        ];
        let clauses = CostClauseSet::resolve(&rows, 1);
        assert_eq!(
            clauses.ok(),
            Some(CostClauseSet {
                mandatory: Vec::new(),
                alternative_groups: vec![vec![
                    CostFragment::item(ItemId(9), 1),
                    CostFragment::coins(50),
                ]],
            }),
        );
    }

    #[test]
    fn multi_member_and_group_stays_mandatory() {
        let rows = [
            coins_row(Some(2), CostRelation::And, 10),
            item_row(Some(2), CostRelation::And, 4, 1),
        ];
        let clauses = CostClauseSet::resolve(&rows, 1).ok();
        let clauses = clauses.unwrap_or_default();
        assert_eq!(clauses.mandatory.len(), 2);
        assert!(clauses.alternative_groups.is_empty());
    }

    #[test]
    fn groups_resolve_in_ascending_id_order() {
        // Declared out of order; groups 3 and 1 must come back as 1, 3.
        let rows = [
            item_row(Some(3), CostRelation::Or, 7, 1),
            coins_row(Some(3), CostRelation::Or, 30),
            item_row(Some(1), CostRelation::Or, 5, 1),
            coins_row(Some(1), CostRelation::Or, 10),
        ];
        let clauses = CostClauseSet::resolve(&rows, 1).ok().unwrap_or_default();
        assert_eq!(clauses.alternative_groups.len(), 2);
        assert_eq!(
            clauses.alternative_groups.first().and_then(|g| g.first()),
            Some(&CostFragment::item(ItemId(5), 1)),
        );
        assert_eq!(
            clauses.alternative_groups.get(1).and_then(|g| g.first()),
            Some(&CostFragment::item(ItemId(7), 1)),
        );
    }

    #[test]
    fn amounts_are_premultiplied_by_quantity() {
        let rows = [
            coins_row(None, CostRelation::And, 100),
            item_row(Some(1), CostRelation::Or, 9, 2),
            coins_row(Some(1), CostRelation::Or, 50),
        ];
        let clauses = CostClauseSet::resolve(&rows, 3).ok().unwrap_or_default();
        assert_eq!(clauses.mandatory, vec![CostFragment::coins(300)]);
        assert_eq!(
            clauses.alternative_groups,
            vec![vec![
                CostFragment::item(ItemId(9), 6),
                CostFragment::coins(150),
            ]],
        );
    }

    #[test]
    fn missing_item_id_is_malformed() {
        let rows = [RawCost {
            group_id: None,
            relation: CostRelation::And,
            kind: RawCostKind::Fish,
            cost_item_id: None,
            quality: Some(QualityTier::STANDARD),
            amount: 1,
        }];
        assert_eq!(
            CostClauseSet::resolve(&rows, 1).err(),
            Some(CostDefinitionError::MissingItemId {
                kind: RawCostKind::Fish,
            }),
        );
    }

    #[test]
    fn zero_quantity_is_malformed() {
        assert_eq!(
            CostClauseSet::resolve(&[], 0).err(),
            Some(CostDefinitionError::ZeroQuantity),
        );
    }

    #[test]
    fn zero_amount_is_malformed() {
        let rows = [coins_row(None, CostRelation::And, 0)];
        assert_eq!(
            CostClauseSet::resolve(&rows, 1).err(),
            Some(CostDefinitionError::ZeroAmount {
                kind: RawCostKind::Coins,
            }),
        );
    }

    #[test]
    fn overflowing_premultiplication_is_malformed() {
        let rows = [coins_row(None, CostRelation::And, u64::MAX)];
        assert!(matches!(
            CostClauseSet::resolve(&rows, 2),
            Err(CostDefinitionError::ArithmeticOverflow { .. }),
        ));
    }

    #[test]
    fn fish_quality_defaults_to_standard() {
        let rows = [RawCost {
            group_id: None,
            relation: CostRelation::And,
            kind: RawCostKind::Fish,
            cost_item_id: Some(3),
            quality: None,
            amount: 2,
        }];
        let clauses = CostClauseSet::resolve(&rows, 1).ok().unwrap_or_default();
        assert_eq!(
            clauses.mandatory,
            vec![CostFragment::fish(FishId(3), QualityTier::STANDARD, 2)],
        );
    }
}
