//! Checks a text report produced by [`write_text_block`](super::report::write_text_block).
//!
//! Each block is re-read, the witness JSON is parsed back, and its sum is
//! recomputed against the target. Blocks that cannot be read are reported
//! and skipped; they never abort the run.

use std::fmt;

use super::report::OutputRecord;
use crate::cs::dynamic::Combination;
use crate::error::{Error, Result};

/// Entries shown before a long combination is cut off with `...`.
pub const DISPLAY_LIMIT: usize = 15;

/// True if `combination` sums to exactly `target`.
pub fn verify_record(target: usize, combination: &Combination) -> Result<bool> {
    let total = combination
        .total()
        .ok_or(Error::Overflow("summing a combination"))?;
    Ok(total == target)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// The solver reported the case infeasible; nothing to check.
    NoSolution,
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// First line of the block.
    pub header: String,
    pub verdict: Verdict,
    pub record: Option<OutputRecord>,
    /// The `Execution time: ...` line, if present.
    pub timing: Option<String>,
}

impl VerifyOutcome {
    pub fn is_correct(&self) -> bool {
        self.verdict == Verdict::Correct
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.verdict, &self.record) {
            (Verdict::Correct, Some(record)) => write!(
                f,
                "Correct solution for target {} with combination {}",
                record.target,
                record.combination.abbreviated(DISPLAY_LIMIT)
            )?,
            (Verdict::Incorrect, Some(record)) => write!(
                f,
                "Incorrect solution for target {} with combination {}",
                record.target,
                record.combination.abbreviated(DISPLAY_LIMIT)
            )?,
            (Verdict::NoSolution, _) => write!(f, "Skipping case: {}", self.header)?,
            (Verdict::Malformed(reason), _) => {
                write!(f, "Error processing the solver output: {}", reason)?
            }
            (_, None) => write!(f, "Error processing the solver output: missing record")?,
        }
        if let Some(timing) = &self.timing {
            write!(f, "\n{}", timing)?;
        }
        Ok(())
    }
}

/// Verifies every block in a report.
///
/// NUL bytes are stripped and blank lines ignored. Blocks end at a line made
/// only of dashes or at the end of the text.
pub fn verify_report(text: &str) -> Vec<VerifyOutcome> {
    let cleaned = text.replace('\0', "");
    let mut outcomes = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in cleaned.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_separator(line) {
            if !block.is_empty() {
                outcomes.push(verify_block(&block));
                block.clear();
            }
        } else {
            block.push(line);
        }
    }
    if !block.is_empty() {
        outcomes.push(verify_block(&block));
    }
    outcomes
}

fn is_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

fn verify_block(block: &[&str]) -> VerifyOutcome {
    let header = block[0].to_string();
    let malformed = |reason: String, timing: Option<&&str>| VerifyOutcome {
        header: header.clone(),
        verdict: Verdict::Malformed(reason),
        record: None,
        timing: timing.map(|t| t.to_string()),
    };

    let Some(status) = block.get(1) else {
        return malformed("block has no verdict line".into(), None);
    };
    if status.contains("No solution exists") {
        return VerifyOutcome {
            header: header.clone(),
            verdict: Verdict::NoSolution,
            record: None,
            timing: block.get(2).map(|t| t.to_string()),
        };
    }

    let Some(witness) = block.get(2) else {
        return malformed("block has no witness line".into(), None);
    };
    let timing = block.get(3);
    let record: OutputRecord = match serde_json::from_str(witness) {
        Ok(record) => record,
        Err(err) => return malformed(err.to_string(), timing),
    };
    let verdict = match verify_record(record.target, &record.combination) {
        Ok(true) => Verdict::Correct,
        Ok(false) => Verdict::Incorrect,
        Err(err) => return malformed(err.to_string(), timing),
    };
    VerifyOutcome {
        header,
        verdict,
        record: Some(record),
        timing: timing.map(|t| t.to_string()),
    }
}
