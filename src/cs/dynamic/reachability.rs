use bitvec::prelude::*;

use crate::error::{Error, Result};

/// Number of slots for values `0..=target`.
pub(crate) fn table_len(target: usize) -> Result<usize> {
    target
        .checked_add(1)
        .ok_or(Error::Overflow("sizing the reachability table"))
}

/// Which values in `0..=target` are exactly constructible from a coin supply.
///
/// Value 0 is reachable from construction (the empty combination), and bits are
/// only ever set during a fill, never cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityTable {
    bits: BitVec,
}

impl ReachabilityTable {
    /// Creates a table for values `0..=target` with only 0 reachable.
    ///
    /// # Errors
    ///
    /// `Error::Overflow` when `target == usize::MAX`.
    pub fn new(target: usize) -> Result<Self> {
        let mut bits = bitvec![0; table_len(target)?];
        bits.set(0, true);
        Ok(Self { bits })
    }

    /// Largest value tracked by this table.
    pub fn target(&self) -> usize {
        self.bits.len() - 1
    }

    /// Returns `false` for values outside the table.
    pub fn is_reachable(&self, value: usize) -> bool {
        self.bits.get(value).map_or(false, |bit| *bit)
    }

    pub(crate) fn mark(&mut self, value: usize) {
        self.bits.set(value, true);
    }

    pub fn reachable_values(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    pub fn count_reachable(&self) -> usize {
        self.bits.count_ones()
    }

    /// True when every value reachable in `earlier` is still reachable here.
    pub fn covers(&self, earlier: &ReachabilityTable) -> bool {
        earlier.reachable_values().all(|value| self.is_reachable(value))
    }
}
