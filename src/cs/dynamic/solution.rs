use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A concrete set of coins that witnesses a reachable target.
///
/// Bounded solves report how many units of each denomination were used, flat
/// solves report the picked coins in pick order. Serialized untagged, so a
/// `Counts` witness becomes a JSON object keyed by denomination and a
/// `Sequence` witness a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Combination {
    Counts(BTreeMap<usize, usize>),
    Sequence(Vec<usize>),
}

impl Combination {
    /// Weighted sum for `Counts`, plain sum for `Sequence`. `None` on overflow.
    pub fn total(&self) -> Option<usize> {
        match self {
            Combination::Counts(counts) => counts.iter().try_fold(0usize, |acc, (&coin, &n)| {
                coin.checked_mul(n).and_then(|part| acc.checked_add(part))
            }),
            Combination::Sequence(coins) => {
                coins.iter().try_fold(0usize, |acc, &coin| acc.checked_add(coin))
            }
        }
    }

    /// Number of coins used, counting every unit. Saturates at `usize::MAX`.
    pub fn units(&self) -> usize {
        match self {
            Combination::Counts(counts) => counts
                .values()
                .fold(0usize, |acc, &n| acc.saturating_add(n)),
            Combination::Sequence(coins) => coins.len(),
        }
    }

    /// Number of entries: distinct denominations for `Counts`, picks for `Sequence`.
    pub fn len(&self) -> usize {
        match self {
            Combination::Counts(counts) => counts.len(),
            Combination::Sequence(coins) => coins.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders at most `limit` entries, followed by `...` when truncated.
    pub fn abbreviated(&self, limit: usize) -> String {
        if self.len() <= limit {
            return self.to_string();
        }
        match self {
            Combination::Counts(counts) => {
                let shown: Vec<String> = counts
                    .iter()
                    .take(limit)
                    .map(|(coin, n)| format!("{}: {}", coin, n))
                    .collect();
                format!("{{{}}}...", shown.join(", "))
            }
            Combination::Sequence(coins) => {
                let shown: Vec<String> = coins.iter().take(limit).map(|c| c.to_string()).collect();
                format!("[{}]...", shown.join(", "))
            }
        }
    }
}

// Map keys must go straight to the format's key parser: JSON keys are strings.
impl<'de> Deserialize<'de> for Combination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CombinationVisitor;

        impl<'de> Visitor<'de> for CombinationVisitor {
            type Value = Combination;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a denomination-to-count map or a list of coins")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Combination, A::Error> {
                let mut counts = BTreeMap::new();
                while let Some((coin, n)) = map.next_entry::<usize, usize>()? {
                    if counts.insert(coin, n).is_some() {
                        return Err(de::Error::custom(format!(
                            "duplicate denomination {}",
                            coin
                        )));
                    }
                }
                Ok(Combination::Counts(counts))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Combination, A::Error> {
                let mut coins = Vec::new();
                while let Some(coin) = seq.next_element::<usize>()? {
                    coins.push(coin);
                }
                Ok(Combination::Sequence(coins))
            }
        }

        deserializer.deserialize_any(CombinationVisitor)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combination::Counts(counts) => {
                let entries: Vec<String> = counts
                    .iter()
                    .map(|(coin, n)| format!("{}: {}", coin, n))
                    .collect();
                write!(f, "{{{}}}", entries.join(", "))
            }
            Combination::Sequence(coins) => {
                let entries: Vec<String> = coins.iter().map(|c| c.to_string()).collect();
                write!(f, "[{}]", entries.join(", "))
            }
        }
    }
}

/// Outcome of one solve: whether the target is reachable and, if so, a witness.
///
/// Infeasible records always carry an empty combination of the solver's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub feasible: bool,
    pub combination: Combination,
}

impl SolutionRecord {
    pub fn found(combination: Combination) -> Self {
        Self {
            feasible: true,
            combination,
        }
    }

    pub fn infeasible_counts() -> Self {
        Self {
            feasible: false,
            combination: Combination::Counts(BTreeMap::new()),
        }
    }

    pub fn infeasible_sequence() -> Self {
        Self {
            feasible: false,
            combination: Combination::Sequence(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let counts = Combination::Counts(BTreeMap::from([(3, 1), (7, 1)]));
        assert_eq!(counts.total(), Some(10));
        assert_eq!(counts.units(), 2);

        let seq = Combination::Sequence(vec![5, 3, 3]);
        assert_eq!(seq.total(), Some(11));
        assert_eq!(seq.units(), 3);

        let huge = Combination::Counts(BTreeMap::from([(usize::MAX, 2)]));
        assert_eq!(huge.total(), None);

        let many = Combination::Counts(BTreeMap::from([(1, usize::MAX), (2, 5)]));
        assert_eq!(many.units(), usize::MAX);
    }

    #[test]
    fn test_json_shapes() {
        let counts = Combination::Counts(BTreeMap::from([(3, 1), (7, 1)]));
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"3":1,"7":1}"#);
        let back: Combination = serde_json::from_str(r#"{"3":1,"7":1}"#).unwrap();
        assert_eq!(back, counts);

        let seq: Combination = serde_json::from_str("[5,3,3]").unwrap();
        assert_eq!(seq, Combination::Sequence(vec![5, 3, 3]));

        assert!(serde_json::from_str::<Combination>(r#"{"3":1,"3":2}"#).is_err());
        assert!(serde_json::from_str::<Combination>(r#"{"x":1}"#).is_err());
        assert!(serde_json::from_str::<Combination>("7").is_err());
    }

    #[test]
    fn test_display_and_abbreviation() {
        let seq = Combination::Sequence((1..=20).collect());
        assert_eq!(seq.abbreviated(3), "[1, 2, 3]...");
        assert_eq!(Combination::Sequence(vec![4, 2]).abbreviated(15), "[4, 2]");

        let counts = Combination::Counts(BTreeMap::from([(3, 2), (11, 4)]));
        assert_eq!(counts.to_string(), "{3: 2, 11: 4}");
        assert_eq!(counts.abbreviated(1), "{3: 2}...");
    }

    #[test]
    fn test_infeasible_records_are_empty() {
        assert!(SolutionRecord::infeasible_counts().combination.is_empty());
        assert!(SolutionRecord::infeasible_sequence().combination.is_empty());
        assert!(!SolutionRecord::infeasible_sequence().feasible);
    }
}
