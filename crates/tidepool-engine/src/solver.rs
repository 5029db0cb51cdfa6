//! The combination solver: pick one feasible fragment per alternative
//! group.
//!
//! Recursive backtracking over the groups, using the pure feasibility
//! check to prune. The first end-to-end feasible combination in declared
//! group/fragment order wins -- the solver makes no attempt to find a
//! cost-minimal or resource-balanced solution. That is a deliberate
//! simplicity choice and must be preserved: identical inputs always
//! resolve to the identical combination.
//!
//! # Complexity
//!
//! Worst case is exponential: O(f^g) feasibility checks for `g` groups of
//! `f` fragments each. Group counts are small in practice (a handful),
//! but nothing here assumes a bound; callers with pathological catalogs
//! get a correct answer, slowly.

use tidepool_types::{CostFragment, ResourceSnapshot};

use crate::feasibility;

/// Find one feasible choice per alternative group, or `None` when no
/// combination is feasible.
///
/// Each chosen fragment is checked against the snapshot left over by the
/// choices before it, so the returned combination is payable as a whole,
/// not just fragment by fragment.
#[must_use]
pub fn solve(
    groups: &[Vec<CostFragment>],
    snapshot: &ResourceSnapshot,
) -> Option<Vec<CostFragment>> {
    let Some((first, rest)) = groups.split_first() else {
        return Some(Vec::new());
    };

    for fragment in first {
        let Ok(remaining) = feasibility::check(snapshot, fragment) else {
            continue;
        };
        if let Some(mut chosen) = solve(rest, &remaining) {
            chosen.insert(0, fragment.clone());
            return Some(chosen);
        }
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tidepool_types::ItemId;

    use super::*;

    fn snapshot(coins: u64, items: &[(i64, u64)]) -> ResourceSnapshot {
        let mut snapshot = ResourceSnapshot::new();
        snapshot.primary_currency = coins;
        for &(id, count) in items {
            snapshot.items.insert(ItemId(id), count);
        }
        snapshot
    }

    #[test]
    fn no_groups_succeeds_with_empty_choice() {
        assert_eq!(solve(&[], &snapshot(0, &[])), Some(Vec::new()));
    }

    #[test]
    fn picks_the_first_feasible_fragment_per_group() {
        let groups = vec![vec![
            CostFragment::coins(50),
            CostFragment::item(ItemId(1), 1),
        ]];
        let chosen = solve(&groups, &snapshot(100, &[(1, 1)])).unwrap();
        // Both options are feasible; declared order decides.
        assert_eq!(chosen, vec![CostFragment::coins(50)]);
    }

    #[test]
    fn falls_through_to_a_later_option() {
        let groups = vec![vec![
            CostFragment::item(ItemId(9), 1),
            CostFragment::coins(50),
        ]];
        let chosen = solve(&groups, &snapshot(100, &[])).unwrap();
        assert_eq!(chosen, vec![CostFragment::coins(50)]);
    }

    #[test]
    fn backtracks_when_an_early_choice_starves_a_later_group() {
        // Group 1's first option takes the coins group 2 needs; only the
        // item option leaves group 2 feasible.
        let groups = vec![
            vec![CostFragment::coins(300), CostFragment::item(ItemId(1), 1)],
            vec![CostFragment::coins(300)],
        ];
        let chosen = solve(&groups, &snapshot(300, &[(1, 1)])).unwrap();
        assert_eq!(
            chosen,
            vec![CostFragment::item(ItemId(1), 1), CostFragment::coins(300)],
        );
    }

    #[test]
    fn infeasible_when_every_combination_fails() {
        let groups = vec![vec![
            CostFragment::coins(300),
            CostFragment::item(ItemId(9), 1),
        ]];
        assert_eq!(solve(&groups, &snapshot(100, &[])), None);
    }

    #[test]
    fn single_option_group_that_cannot_pay_fails() {
        let groups = vec![vec![CostFragment::item(ItemId(3), 3)]];
        assert_eq!(solve(&groups, &snapshot(500, &[(3, 2)])), None);
    }

    #[test]
    fn identical_inputs_resolve_identically() {
        let groups = vec![
            vec![CostFragment::coins(100), CostFragment::item(ItemId(1), 1)],
            vec![CostFragment::item(ItemId(2), 1), CostFragment::coins(100)],
        ];
        let world = snapshot(500, &[(1, 1), (2, 1)]);
        let first = solve(&groups, &world);
        let second = solve(&groups, &world);
        assert_eq!(first, second);
        assert_eq!(
            first.unwrap(),
            vec![CostFragment::coins(100), CostFragment::item(ItemId(2), 1)],
        );
    }

    #[test]
    fn solver_leaves_the_snapshot_untouched() {
        let world = snapshot(100, &[(1, 1)]);
        let groups = vec![vec![CostFragment::coins(100)]];
        let _ = solve(&groups, &world);
        assert_eq!(world.primary_currency, 100);
    }
}
