pub mod cs;
pub mod error;
pub mod harness;

pub use cs::dynamic;
pub use cs::dynamic::{
    solve_bounded, solve_flat, BoundedSolver, Combination, CountPolicy, FlatSolver,
    SolutionRecord, SupplyModel,
};
pub use error::{Error, Result};
