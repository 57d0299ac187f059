//! Input/output plumbing around the solvers.
//!
//! This module provides the pieces needed to drive the solvers over many cases:
//! - CSV case records in the bounded and flat row formats
//! - Randomized case generation per size class
//! - Wall-clock timing and (optionally parallel) batch solving
//! - Text and JSON reports, and a verifier for the text report
//! - Timing series for external plotting

pub mod batch;
pub mod case;
pub mod generate;
pub mod report;
pub mod series;
pub mod timing;
pub mod verify;

pub use batch::{solve_all, CaseOutcome, Solvers};
pub use case::{read_cases, read_cases_lenient, write_cases, CaseCoins, Mode, TestCase};
pub use generate::{generate_cases, BoundedClass, FlatClass, GeneratorConfig};
pub use report::{write_json_line, write_text_block, CaseReport, OutputRecord};
pub use series::{timing_points, write_series, TimingPoint};
pub use timing::{timed, Timed};
pub use verify::{verify_record, verify_report, Verdict, VerifyOutcome};
