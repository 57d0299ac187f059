use log::info;
use rayon::prelude::*;
use std::time::Duration;

use super::case::TestCase;
use super::timing::timed;
use crate::cs::dynamic::{BoundedSolver, FlatSolver, SolutionRecord};
use crate::error::Result;

/// Solver configuration used for a batch, one per row format.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solvers {
    pub bounded: BoundedSolver,
    pub flat: FlatSolver,
}

/// A solved case with its timing.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub case: TestCase,
    pub record: SolutionRecord,
    pub elapsed: Duration,
}

impl CaseOutcome {
    pub fn micros(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1e6
    }
}

fn solve_one(case: TestCase, solvers: &Solvers) -> Result<CaseOutcome> {
    let timed_record = timed(|| case.solve(solvers));
    let record = timed_record.value?;
    Ok(CaseOutcome {
        case,
        record,
        elapsed: timed_record.elapsed,
    })
}

/// Solves every case, keeping input order.
///
/// With `parallel` set the cases are spread over the rayon pool. Solves share
/// no state, but per-case timings then include scheduling noise.
pub fn solve_all(
    cases: Vec<TestCase>,
    solvers: &Solvers,
    parallel: bool,
) -> Result<Vec<CaseOutcome>> {
    info!("solving {} cases (parallel: {})", cases.len(), parallel);
    if parallel {
        cases
            .into_par_iter()
            .map(|case| solve_one(case, solvers))
            .collect()
    } else {
        cases
            .into_iter()
            .map(|case| solve_one(case, solvers))
            .collect()
    }
}
