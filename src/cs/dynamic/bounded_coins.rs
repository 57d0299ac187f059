use log::{debug, trace};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::reachability::{table_len, ReachabilityTable};
use super::solution::{Combination, SolutionRecord};
use crate::error::{Error, Result};

/// Which unit count wins when several counts of one denomination reach a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountPolicy {
    /// Stop at the smallest count whose predecessor is reachable.
    #[default]
    FirstReachable,
    /// Keep scanning and take the largest count whose predecessor is reachable.
    LastReachable,
}

/// One link of a witness chain: `count` units of `denomination` on top of `parent`.
#[derive(Debug)]
struct WitnessNode {
    denomination: usize,
    count: usize,
    parent: Witness,
}

/// Snapshot of a combination. `None` is the empty combination.
///
/// Chains are immutable once built, so replacing a table slot later never
/// changes a witness that already points at the old snapshot.
type Witness = Option<Rc<WitnessNode>>;

fn materialize(witness: &Witness) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    let mut link = witness;
    while let Some(node) = link {
        *counts.entry(node.denomination).or_insert(0) += node.count;
        link = &node.parent;
    }
    counts
}

/// Exact reachability with a finite number of units per denomination.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedSolver {
    pub policy: CountPolicy,
}

impl BoundedSolver {
    pub fn new(policy: CountPolicy) -> Self {
        Self { policy }
    }

    /// Decides whether `target` is reachable from `coin_data` and returns one witness.
    ///
    /// `coin_data` holds `(denomination, max_count)` pairs. Pairs are processed in
    /// input order and repeated denominations act as separate supply buckets; the
    /// reported combination sums their counts per denomination.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if a denomination is zero or a max count is zero,
    /// `Error::Overflow` if `target` is `usize::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use coinreach::{BoundedSolver, Combination};
    /// use std::collections::BTreeMap;
    ///
    /// let record = BoundedSolver::default().solve(10, &[(3, 3), (7, 1)]).unwrap();
    /// assert!(record.feasible);
    /// assert_eq!(record.combination, Combination::Counts(BTreeMap::from([(3, 1), (7, 1)])));
    ///
    /// assert!(!BoundedSolver::default().solve(4, &[(3, 1)]).unwrap().feasible);
    /// ```
    pub fn solve(&self, target: usize, coin_data: &[(usize, usize)]) -> Result<SolutionRecord> {
        self.solve_observed(target, coin_data, |_| {})
    }

    /// Like [`BoundedSolver::solve`], calling `observe` with the table after each
    /// `(denomination, max_count)` pass.
    pub fn solve_observed<F>(
        &self,
        target: usize,
        coin_data: &[(usize, usize)],
        mut observe: F,
    ) -> Result<SolutionRecord>
    where
        F: FnMut(&ReachabilityTable),
    {
        validate(coin_data)?;

        let mut table = ReachabilityTable::new(target)?;
        let mut witnesses: Vec<Witness> = vec![None; table_len(target)?];

        for &(denomination, max_count) in coin_data {
            if denomination <= target {
                // Descending so this pass never reads a value it has already updated.
                for value in (denomination..=target).rev() {
                    if let Some((prev, count)) =
                        self.pick_count(&table, value, denomination, max_count)
                    {
                        table.mark(value);
                        witnesses[value] = Some(Rc::new(WitnessNode {
                            denomination,
                            count,
                            parent: witnesses[prev].clone(),
                        }));
                    }
                }
            }
            trace!(
                "denomination {} x{}: {} values reachable",
                denomination,
                max_count,
                table.count_reachable()
            );
            observe(&table);
        }

        let feasible = table.is_reachable(target);
        debug!(
            "bounded solve: target={} pairs={} feasible={}",
            target,
            coin_data.len(),
            feasible
        );

        if !feasible {
            return Ok(SolutionRecord::infeasible_counts());
        }
        Ok(SolutionRecord::found(Combination::Counts(materialize(
            &witnesses[target],
        ))))
    }

    /// Returns the predecessor and count chosen for `value`, if any count works.
    fn pick_count(
        &self,
        table: &ReachabilityTable,
        value: usize,
        denomination: usize,
        max_count: usize,
    ) -> Option<(usize, usize)> {
        let mut chosen = None;
        for count in 1..=max_count {
            let spent = match denomination.checked_mul(count) {
                Some(spent) if spent <= value => spent,
                _ => break,
            };
            let prev = value - spent;
            if table.is_reachable(prev) {
                chosen = Some((prev, count));
                if self.policy == CountPolicy::FirstReachable {
                    break;
                }
            }
        }
        chosen
    }
}

fn validate(coin_data: &[(usize, usize)]) -> Result<()> {
    for (i, &(denomination, max_count)) in coin_data.iter().enumerate() {
        if denomination == 0 {
            return Err(Error::invalid_input(format!(
                "denomination at position {} is zero",
                i
            )));
        }
        if max_count == 0 {
            return Err(Error::invalid_input(format!(
                "max count for denomination {} at position {} is zero",
                denomination, i
            )));
        }
    }
    Ok(())
}

/// Solves with the default [`CountPolicy`].
pub fn solve_bounded(target: usize, coin_data: &[(usize, usize)]) -> Result<SolutionRecord> {
    BoundedSolver::default().solve(target, coin_data)
}
