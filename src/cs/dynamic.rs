pub mod bounded_coins;
pub mod flat_coins;
pub mod reachability;
pub mod solution;

#[cfg(test)]
mod tests;

// Re-export dynamic programming algorithms with descriptive names
pub use bounded_coins::{solve_bounded, BoundedSolver, CountPolicy};
pub use flat_coins::{solve_flat, FlatSolver, SupplyModel};
pub use reachability::ReachabilityTable;
pub use solution::{Combination, SolutionRecord};
