use serde::{Deserialize, Serialize};
use std::io::Write;

use super::batch::CaseOutcome;
use crate::error::Result;

/// One scatter point: supply size against solve time, coloured by feasibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingPoint {
    pub x: usize,
    pub micros: f64,
    pub feasible: bool,
}

pub fn timing_points(outcomes: &[CaseOutcome]) -> Vec<TimingPoint> {
    outcomes
        .iter()
        .map(|outcome| TimingPoint {
            x: outcome.case.coins.supply_size(),
            micros: outcome.micros(),
            feasible: outcome.record.feasible,
        })
        .collect()
}

/// Writes the points as CSV with an `x,micros,feasible` header.
pub fn write_series<W: Write>(writer: W, points: &[TimingPoint]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    for point in points {
        out.serialize(point)?;
    }
    out.flush()?;
    Ok(())
}
