//! Command-line driver for the coin reachability solvers.
//!
//! - `generate`: write random cases for one row format
//! - `solve`: solve every case in a CSV file and print a report
//! - `verify`: re-check a text report produced by `solve`
//! - `series`: solve every case and emit `x,micros,feasible` for plotting
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use coinreach::harness::{
    generate_cases, read_cases, read_cases_lenient, solve_all, timing_points, verify_report,
    write_cases, write_json_line, write_series, write_text_block, CaseOutcome, GeneratorConfig,
    Mode, Solvers, TestCase, Verdict,
};
use coinreach::{BoundedSolver, CountPolicy, FlatSolver, SupplyModel};

#[derive(Debug, Copy, Clone, ValueEnum)]
enum PolicyArg {
    /// Smallest unit count that reaches a value wins.
    First,
    /// Largest unit count that reaches a value wins.
    Last,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum SupplyArg {
    /// Each distinct listed value can be reused.
    Unbounded,
    /// Each listed coin is used at most once.
    SingleUse,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Log verbosity: -v for debug, -vv for trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write random test cases as CSV.
    Generate {
        /// Row format to generate.
        #[arg(long, value_enum, default_value_t = Mode::Bounded)]
        mode: Mode,

        /// Number of cases per size class.
        #[arg(long, short = 's')]
        size: usize,

        /// Seed for reproducible output; drawn from the OS when absent.
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (overwritten). Defaults to stdout.
        #[arg(long, short = 'f', value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Solve every case in a CSV file.
    Solve {
        #[command(flatten)]
        input: SolveArgs,

        /// Emit one JSON object per case instead of the text report.
        #[arg(long)]
        json: bool,
    },
    /// Verify a text report (stdin when no file is given).
    Verify {
        #[arg(value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Solve every case and write the timing scatter series as CSV.
    Series {
        #[command(flatten)]
        input: SolveArgs,

        /// Output file. Defaults to stdout.
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct SolveArgs {
    /// CSV file with one case per row.
    #[arg(value_name = "CSVFILE")]
    csvfile: PathBuf,

    /// Row format of the input file.
    #[arg(long, value_enum, default_value_t = Mode::Bounded)]
    mode: Mode,

    /// Unit count selection for bounded rows.
    #[arg(long, value_enum, default_value_t = PolicyArg::First)]
    policy: PolicyArg,

    /// Coin reuse for flat rows.
    #[arg(long, value_enum, default_value_t = SupplyArg::Unbounded)]
    supply: SupplyArg,

    /// Solve cases on the rayon pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Skip malformed rows instead of failing.
    #[arg(long, default_value_t = false)]
    lenient: bool,
}

impl SolveArgs {
    fn solvers(&self) -> Solvers {
        Solvers {
            bounded: BoundedSolver::new(match self.policy {
                PolicyArg::First => CountPolicy::FirstReachable,
                PolicyArg::Last => CountPolicy::LastReachable,
            }),
            flat: FlatSolver::new(match self.supply {
                SupplyArg::Unbounded => SupplyModel::Unbounded,
                SupplyArg::SingleUse => SupplyModel::SingleUse,
            }),
        }
    }

    fn load(&self) -> Result<Vec<TestCase>> {
        let file = File::open(&self.csvfile)
            .with_context(|| format!("Failed to open {}", self.csvfile.display()))?;
        if self.lenient {
            let (cases, rejected) = read_cases_lenient(file, self.mode);
            if !rejected.is_empty() {
                info!("skipped {} malformed rows", rejected.len());
            }
            Ok(cases)
        } else {
            read_cases(file, self.mode)
                .with_context(|| format!("Failed to read cases from {}", self.csvfile.display()))
        }
    }

    fn run(&self) -> Result<Vec<CaseOutcome>> {
        let cases = self.load()?;
        Ok(solve_all(cases, &self.solvers(), self.parallel)?)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

fn output_writer(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn read_report(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate {
            mode,
            size,
            seed,
            file,
        } => {
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            let cases = generate_cases(&GeneratorConfig::for_mode(mode), size, &mut rng)?;
            write_cases(output_writer(file.as_deref())?, &cases)?;
            info!("wrote {} cases", cases.len());
        }
        Command::Solve { input, json } => {
            let outcomes = input.run()?;
            let mut out = output_writer(None)?;
            for outcome in &outcomes {
                if json {
                    write_json_line(&mut out, outcome)?;
                } else {
                    write_text_block(&mut out, outcome)?;
                }
            }
            out.flush()?;
        }
        Command::Verify { file } => {
            let text = read_report(file.as_deref())?;
            let outcomes = verify_report(&text);
            let mut out = output_writer(None)?;
            for outcome in &outcomes {
                writeln!(out, "{}", outcome)?;
            }
            out.flush()?;

            let incorrect = outcomes
                .iter()
                .filter(|o| o.verdict == Verdict::Incorrect)
                .count();
            let checked = outcomes
                .iter()
                .filter(|o| matches!(o.verdict, Verdict::Correct | Verdict::Incorrect))
                .count();
            info!(
                "{} blocks, {} checked, {} incorrect",
                outcomes.len(),
                checked,
                incorrect
            );
        }
        Command::Series { input, output } => {
            let outcomes = input.run()?;
            write_series(output_writer(output.as_deref())?, &timing_points(&outcomes))?;
        }
    }
    Ok(())
}
