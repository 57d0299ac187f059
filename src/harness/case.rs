use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

use super::batch::Solvers;
use crate::cs::dynamic::SolutionRecord;
use crate::error::{Error, Result};

/// Row format and solver family for a batch of cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// `label, target, denom1, count1, denom2, count2, ...`
    Bounded,
    /// `label, target, coin1, coin2, ...`
    Flat,
}

/// Coin supply of one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseCoins {
    Bounded(Vec<(usize, usize)>),
    Flat(Vec<usize>),
}

impl CaseCoins {
    pub fn mode(&self) -> Mode {
        match self {
            CaseCoins::Bounded(_) => Mode::Bounded,
            CaseCoins::Flat(_) => Mode::Flat,
        }
    }

    /// Total units on offer: summed max counts, or the length of a flat list.
    /// Saturates at `usize::MAX`.
    pub fn supply_size(&self) -> usize {
        match self {
            CaseCoins::Bounded(pairs) => pairs
                .iter()
                .fold(0usize, |acc, &(_, count)| acc.saturating_add(count)),
            CaseCoins::Flat(coins) => coins.len(),
        }
    }
}

impl fmt::Display for CaseCoins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseCoins::Bounded(pairs) => {
                let entries: Vec<String> = pairs
                    .iter()
                    .map(|(coin, count)| format!("({}, {})", coin, count))
                    .collect();
                write!(f, "[{}]", entries.join(", "))
            }
            CaseCoins::Flat(coins) => {
                let entries: Vec<String> = coins.iter().map(|c| c.to_string()).collect();
                write!(f, "[{}]", entries.join(", "))
            }
        }
    }
}

/// One labelled instance: reach `target` from `coins`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub label: String,
    pub target: usize,
    pub coins: CaseCoins,
}

impl TestCase {
    /// Parses a CSV record in the row format of `mode`. `line` is only used
    /// for error messages.
    pub fn from_record(record: &StringRecord, mode: Mode, line: usize) -> Result<Self> {
        let mut fields = record.iter();

        let label = fields
            .next()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .ok_or_else(|| Error::malformed_row(line, "missing case label"))?
            .to_string();
        let target = match fields.next() {
            Some(field) => parse_field(field, "target value", line)?,
            None => return Err(Error::malformed_row(line, "missing target value")),
        };
        let numbers = fields
            .map(|field| parse_field(field, "coin field", line))
            .collect::<Result<Vec<usize>>>()?;

        if numbers.contains(&0) {
            return Err(Error::malformed_row(
                line,
                "denominations and counts must be positive",
            ));
        }

        let coins = match mode {
            Mode::Bounded => {
                if numbers.is_empty() || numbers.len() % 2 != 0 {
                    return Err(Error::malformed_row(
                        line,
                        format!(
                            "expected denomination/count pairs, found {} coin fields",
                            numbers.len()
                        ),
                    ));
                }
                CaseCoins::Bounded(numbers.chunks_exact(2).map(|p| (p[0], p[1])).collect())
            }
            Mode::Flat => CaseCoins::Flat(numbers),
        };

        Ok(Self {
            label,
            target,
            coins,
        })
    }

    pub fn to_record(&self) -> Vec<String> {
        let mut fields = vec![self.label.clone(), self.target.to_string()];
        match &self.coins {
            CaseCoins::Bounded(pairs) => {
                for (coin, count) in pairs {
                    fields.push(coin.to_string());
                    fields.push(count.to_string());
                }
            }
            CaseCoins::Flat(coins) => fields.extend(coins.iter().map(|c| c.to_string())),
        }
        fields
    }

    /// Runs the solver matching this case's coin shape.
    pub fn solve(&self, solvers: &Solvers) -> Result<SolutionRecord> {
        match &self.coins {
            CaseCoins::Bounded(pairs) => solvers.bounded.solve(self.target, pairs),
            CaseCoins::Flat(coins) => solvers.flat.solve(self.target, coins),
        }
    }
}

fn parse_field(field: &str, what: &str, line: usize) -> Result<usize> {
    let trimmed = field.trim();
    trimmed.parse::<usize>().map_err(|_| {
        Error::malformed_row(
            line,
            format!("{} {:?} is not a non-negative integer", what, trimmed),
        )
    })
}

fn case_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn record_line(record: &StringRecord, fallback: usize) -> usize {
    record
        .position()
        .map(|pos| pos.line() as usize)
        .unwrap_or(fallback)
}

/// Reads every row, failing on the first malformed one.
pub fn read_cases<R: io::Read>(reader: R, mode: Mode) -> Result<Vec<TestCase>> {
    let mut cases = Vec::new();
    for (i, record) in case_reader(reader).records().enumerate() {
        let record = record?;
        let line = record_line(&record, i + 1);
        cases.push(TestCase::from_record(&record, mode, line)?);
    }
    Ok(cases)
}

/// Reads every row, skipping malformed ones and returning them as errors.
pub fn read_cases_lenient<R: io::Read>(reader: R, mode: Mode) -> (Vec<TestCase>, Vec<Error>) {
    let mut cases = Vec::new();
    let mut rejected = Vec::new();
    for (i, record) in case_reader(reader).records().enumerate() {
        let parsed = record.map_err(Error::from).and_then(|record| {
            let line = record_line(&record, i + 1);
            TestCase::from_record(&record, mode, line)
        });
        match parsed {
            Ok(case) => cases.push(case),
            Err(err) => {
                warn!("skipping row: {}", err);
                rejected.push(err);
            }
        }
    }
    (cases, rejected)
}

/// Writes one row per case, fields separated by a plain `,`.
pub fn write_cases<W: io::Write>(writer: W, cases: &[TestCase]) -> Result<()> {
    let mut out = WriterBuilder::new().flexible(true).from_writer(writer);
    for case in cases {
        out.write_record(case.to_record())?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bounded_rows() {
        let input = "Small, 120, 3, 12, 7, 15\nMedium,900,11,40\n";
        let cases = read_cases(input.as_bytes(), Mode::Bounded).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].label, "Small");
        assert_eq!(cases[0].target, 120);
        assert_eq!(cases[0].coins, CaseCoins::Bounded(vec![(3, 12), (7, 15)]));
        assert_eq!(cases[0].coins.supply_size(), 27);
        assert_eq!(cases[1].coins, CaseCoins::Bounded(vec![(11, 40)]));
    }

    #[test]
    fn test_supply_size_saturates() {
        let row = format!("Small, 6, 3, {}, 7, 2\n", usize::MAX);
        let cases = read_cases(row.as_bytes(), Mode::Bounded).unwrap();
        assert_eq!(cases[0].coins.supply_size(), usize::MAX);
    }

    #[test]
    fn test_read_flat_rows() {
        let input = "Large, 4000, 25, 1, 7, 7\nSmall, 0\n";
        let cases = read_cases(input.as_bytes(), Mode::Flat).unwrap();
        assert_eq!(cases[0].coins, CaseCoins::Flat(vec![25, 1, 7, 7]));
        assert_eq!(cases[1].coins, CaseCoins::Flat(vec![]));
        assert_eq!(cases[1].coins.mode(), Mode::Flat);
    }

    #[test]
    fn test_malformed_rows() {
        let odd = read_cases("Small, 10, 3, 2, 5\n".as_bytes(), Mode::Bounded);
        assert!(matches!(odd, Err(Error::MalformedRow { line: 1, .. })));

        let no_pairs = read_cases("Small, 10\n".as_bytes(), Mode::Bounded);
        assert!(matches!(no_pairs, Err(Error::MalformedRow { .. })));

        let bad_int = read_cases("Small, 10\nSmall, ten, 3\n".as_bytes(), Mode::Flat);
        assert!(matches!(bad_int, Err(Error::MalformedRow { line: 2, .. })));

        let negative = read_cases("Small, 10, -3\n".as_bytes(), Mode::Flat);
        assert!(matches!(negative, Err(Error::MalformedRow { .. })));

        let zero = read_cases("Small, 10, 3, 0\n".as_bytes(), Mode::Bounded);
        assert!(matches!(zero, Err(Error::MalformedRow { .. })));

        let no_target = read_cases("Small\n".as_bytes(), Mode::Flat);
        assert!(matches!(no_target, Err(Error::MalformedRow { .. })));
    }

    #[test]
    fn test_lenient_skips_bad_rows() {
        let input = "Small, 10, 3, 2\nSmall, x, 3, 2\nMedium, 20, 5, 4\n";
        let (cases, rejected) = read_cases_lenient(input.as_bytes(), Mode::Bounded);
        assert_eq!(cases.len(), 2);
        assert_eq!(rejected.len(), 1);
        assert!(matches!(rejected[0], Error::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_write_then_read() {
        let cases = vec![
            TestCase {
                label: "Small".into(),
                target: 77,
                coins: CaseCoins::Bounded(vec![(3, 10), (13, 2)]),
            },
            TestCase {
                label: "Large".into(),
                target: 1_000_000,
                coins: CaseCoins::Flat(vec![4, 9]),
            },
        ];
        let mut buf = Vec::new();
        write_cases(&mut buf, &cases).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Small,77,3,10,13,2\nLarge,1000000,4,9\n");

        let bounded = read_cases(text.lines().next().unwrap().as_bytes(), Mode::Bounded).unwrap();
        assert_eq!(bounded[0], cases[0]);

        // Space-padded rows from older generators read back the same.
        let padded = read_cases("Small, 77, 3, 10, 13, 2\n".as_bytes(), Mode::Bounded).unwrap();
        assert_eq!(padded[0], cases[0]);
    }

    #[test]
    fn test_display_coins() {
        assert_eq!(
            CaseCoins::Bounded(vec![(3, 5), (7, 2)]).to_string(),
            "[(3, 5), (7, 2)]"
        );
        assert_eq!(CaseCoins::Flat(vec![3, 5]).to_string(), "[3, 5]");
    }
}
