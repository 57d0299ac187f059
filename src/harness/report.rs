use serde::{Deserialize, Serialize};
use std::io::Write;

use super::batch::CaseOutcome;
use super::case::Mode;
use crate::cs::dynamic::Combination;
use crate::error::Result;

pub const SEPARATOR: &str = "---------------------------------------------------";

/// The witness line of a feasible case, as read back by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub target: usize,
    pub combination: Combination,
}

/// One case as a JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub label: String,
    pub mode: Mode,
    pub target: usize,
    pub feasible: bool,
    pub combination: Combination,
    pub supply_size: usize,
    pub elapsed_micros: f64,
}

impl From<&CaseOutcome> for CaseReport {
    fn from(outcome: &CaseOutcome) -> Self {
        Self {
            label: outcome.case.label.clone(),
            mode: outcome.case.coins.mode(),
            target: outcome.case.target,
            feasible: outcome.record.feasible,
            combination: outcome.record.combination.clone(),
            supply_size: outcome.case.coins.supply_size(),
            elapsed_micros: outcome.micros(),
        }
    }
}

/// Writes the human-readable block for one case.
///
/// Feasible cases take five lines (header, verdict, witness JSON, timing,
/// separator), infeasible ones four.
pub fn write_text_block<W: Write>(out: &mut W, outcome: &CaseOutcome) -> Result<()> {
    let case = &outcome.case;
    writeln!(
        out,
        "Solving knapsack for {} case with total value: {} and coins: {}",
        case.label, case.target, case.coins
    )?;
    if outcome.record.feasible {
        writeln!(
            out,
            "A solution exists for the {} case with total value: {}",
            case.label, case.target
        )?;
        let record = OutputRecord {
            target: case.target,
            combination: outcome.record.combination.clone(),
        };
        writeln!(out, "{}", serde_json::to_string(&record)?)?;
    } else {
        writeln!(
            out,
            "No solution exists for the {} case with total value: {}",
            case.label, case.target
        )?;
    }
    writeln!(out, "Execution time: {:.2} microseconds", outcome.micros())?;
    writeln!(out, "{}", SEPARATOR)?;
    Ok(())
}

pub fn write_json_line<W: Write>(out: &mut W, outcome: &CaseOutcome) -> Result<()> {
    serde_json::to_writer(&mut *out, &CaseReport::from(outcome))?;
    writeln!(out)?;
    Ok(())
}
