use log::debug;

use super::reachability::{table_len, ReachabilityTable};
use super::solution::{Combination, SolutionRecord};
use crate::error::{Error, Result};

/// How a flat coin list is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupplyModel {
    /// Every distinct value in the list may be used any number of times.
    #[default]
    Unbounded,
    /// Every listed coin is one unit and may be used at most once.
    SingleUse,
}

/// Exact reachability over a flat list of coin values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatSolver {
    pub model: SupplyModel,
}

impl FlatSolver {
    pub fn new(model: SupplyModel) -> Self {
        Self { model }
    }

    /// Decides whether `target` is reachable from `coins` and returns the coins
    /// picked during reconstruction.
    ///
    /// The caller's slice is left untouched; the solver sorts its own copy in
    /// descending order. Under [`SupplyModel::Unbounded`] the witness is built
    /// largest coin first.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if any coin is zero, `Error::Overflow` if `target`
    /// is `usize::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use coinreach::{Combination, FlatSolver, SupplyModel};
    ///
    /// let record = FlatSolver::default().solve(11, &[7, 5, 3]).unwrap();
    /// assert_eq!(record.combination, Combination::Sequence(vec![5, 3, 3]));
    ///
    /// let record = FlatSolver::new(SupplyModel::SingleUse).solve(11, &[7, 5, 3]).unwrap();
    /// assert!(!record.feasible);
    /// ```
    pub fn solve(&self, target: usize, coins: &[usize]) -> Result<SolutionRecord> {
        self.solve_observed(target, coins, |_| {})
    }

    /// Like [`FlatSolver::solve`], calling `observe` with the table after each
    /// coin pass: once per distinct value under [`SupplyModel::Unbounded`],
    /// once per listed unit under [`SupplyModel::SingleUse`].
    pub fn solve_observed<F>(
        &self,
        target: usize,
        coins: &[usize],
        mut observe: F,
    ) -> Result<SolutionRecord>
    where
        F: FnMut(&ReachabilityTable),
    {
        let sorted = sorted_descending(coins)?;

        let picked = match self.model {
            SupplyModel::Unbounded => {
                let table = fill_unbounded(target, &sorted, &mut observe)?;
                if table.is_reachable(target) {
                    Some(greedy_backtrace(&table, &sorted, target)?)
                } else {
                    None
                }
            }
            SupplyModel::SingleUse => {
                let (table, first_unit) = fill_single_use(target, &sorted, &mut observe)?;
                if table.is_reachable(target) {
                    Some(unit_backtrace(&first_unit, &sorted, target)?)
                } else {
                    None
                }
            }
        };

        debug!(
            "flat solve ({:?}): target={} coins={} feasible={}",
            self.model,
            target,
            coins.len(),
            picked.is_some()
        );

        Ok(match picked {
            Some(sequence) => SolutionRecord::found(Combination::Sequence(sequence)),
            None => SolutionRecord::infeasible_sequence(),
        })
    }

    /// Fills and returns the reachability table without reconstructing a witness.
    pub fn reachability(&self, target: usize, coins: &[usize]) -> Result<ReachabilityTable> {
        let sorted = sorted_descending(coins)?;
        let mut ignore = |_: &ReachabilityTable| {};
        Ok(match self.model {
            SupplyModel::Unbounded => fill_unbounded(target, &sorted, &mut ignore)?,
            SupplyModel::SingleUse => fill_single_use(target, &sorted, &mut ignore)?.0,
        })
    }
}

fn sorted_descending(coins: &[usize]) -> Result<Vec<usize>> {
    if let Some(pos) = coins.iter().position(|&c| c == 0) {
        return Err(Error::invalid_input(format!("coin at position {} is zero", pos)));
    }
    let mut sorted = coins.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    Ok(sorted)
}

/// Unbounded subset-sum fill. Ascending values let a coin build on itself.
fn fill_unbounded<F>(
    target: usize,
    sorted: &[usize],
    observe: &mut F,
) -> Result<ReachabilityTable>
where
    F: FnMut(&ReachabilityTable),
{
    let mut distinct = sorted.to_vec();
    distinct.dedup();

    let mut table = ReachabilityTable::new(target)?;
    for &coin in &distinct {
        if coin <= target {
            for value in coin..=target {
                if table.is_reachable(value - coin) {
                    table.mark(value);
                }
            }
        }
        observe(&table);
    }
    Ok(table)
}

/// Walks down from `target`, each step taking the largest coin that leaves a
/// reachable remainder.
///
/// Every reachable non-zero value was marked from some coin with a reachable
/// remainder, so a candidate always exists; each step removes at least 1, so
/// the walk takes at most `target` steps.
fn greedy_backtrace(
    table: &ReachabilityTable,
    sorted: &[usize],
    target: usize,
) -> Result<Vec<usize>> {
    let mut picked = Vec::new();
    let mut current = target;
    while current > 0 {
        let coin = sorted
            .iter()
            .copied()
            .find(|&c| c <= current && table.is_reachable(current - c))
            .ok_or(Error::InconsistentTable { value: current })?;
        picked.push(coin);
        current -= coin;
    }
    Ok(picked)
}

/// 0/1 fill over the listed units. Records, per value, the unit that first
/// made it reachable.
fn fill_single_use<F>(
    target: usize,
    sorted: &[usize],
    observe: &mut F,
) -> Result<(ReachabilityTable, Vec<Option<usize>>)>
where
    F: FnMut(&ReachabilityTable),
{
    let mut table = ReachabilityTable::new(target)?;
    let mut first_unit = vec![None; table_len(target)?];

    for (unit, &coin) in sorted.iter().enumerate() {
        if coin <= target {
            // Descending so each unit is consumed at most once per value.
            for value in (coin..=target).rev() {
                if !table.is_reachable(value) && table.is_reachable(value - coin) {
                    table.mark(value);
                    first_unit[value] = Some(unit);
                }
            }
        }
        observe(&table);
    }
    Ok((table, first_unit))
}

/// The remainder of a value first reached by unit `i` was reachable with
/// units before `i`, so following the records uses strictly decreasing unit
/// indices and never reuses a unit.
fn unit_backtrace(
    first_unit: &[Option<usize>],
    sorted: &[usize],
    target: usize,
) -> Result<Vec<usize>> {
    let mut picked = Vec::new();
    let mut current = target;
    while current > 0 {
        let unit = first_unit[current].ok_or(Error::InconsistentTable { value: current })?;
        let coin = sorted[unit];
        picked.push(coin);
        current -= coin;
    }
    Ok(picked)
}

/// Solves with the default [`SupplyModel`].
pub fn solve_flat(target: usize, coins: &[usize]) -> Result<SolutionRecord> {
    FlatSolver::default().solve(target, coins)
}
