use log::debug;
use rand::Rng;
use std::ops::RangeInclusive;

use super::case::{CaseCoins, Mode, TestCase};
use crate::error::{Error, Result};

/// One size class of bounded rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedClass {
    pub label: String,
    /// Target values are drawn uniformly from this range.
    pub targets: RangeInclusive<usize>,
    /// Units available per denomination.
    pub quantities: RangeInclusive<usize>,
}

impl BoundedClass {
    pub fn new(
        label: &str,
        targets: RangeInclusive<usize>,
        quantities: RangeInclusive<usize>,
    ) -> Self {
        Self {
            label: label.to_string(),
            targets,
            quantities,
        }
    }
}

/// One size class of flat rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatClass {
    pub label: String,
    pub targets: RangeInclusive<usize>,
    /// Coin values are drawn from `1..=max_coin`.
    pub max_coin: usize,
}

impl FlatClass {
    pub fn new(label: &str, targets: RangeInclusive<usize>, max_coin: usize) -> Self {
        Self {
            label: label.to_string(),
            targets,
            max_coin,
        }
    }
}

/// Configuration for [`generate_cases`]. The variant decides the row format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorConfig {
    Bounded {
        /// Every row uses all of these denominations, in order.
        denominations: Vec<usize>,
        classes: Vec<BoundedClass>,
    },
    Flat {
        /// Number of coins in every row.
        coins_per_case: usize,
        classes: Vec<FlatClass>,
    },
}

impl GeneratorConfig {
    /// Denominations that are not multiples of each other, with growing targets
    /// and supplies per class.
    pub fn bounded() -> Self {
        GeneratorConfig::Bounded {
            denominations: vec![3, 7, 11, 13],
            classes: vec![
                BoundedClass::new("Small", 50..=200, 10..=20),
                BoundedClass::new("Medium", 500..=2000, 30..=60),
                BoundedClass::new("Large", 5000..=20000, 300..=800),
            ],
        }
    }

    /// Four coins up to 25 against targets spanning several orders of magnitude.
    pub fn flat() -> Self {
        GeneratorConfig::Flat {
            coins_per_case: 4,
            classes: vec![
                FlatClass::new("Small", 0..=1_000, 25),
                FlatClass::new("Medium", 10_000..=100_000, 25),
                FlatClass::new("Large", 1_000_000..=10_000_000, 25),
            ],
        }
    }

    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Bounded => Self::bounded(),
            Mode::Flat => Self::flat(),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            GeneratorConfig::Bounded { .. } => Mode::Bounded,
            GeneratorConfig::Flat { .. } => Mode::Flat,
        }
    }

    fn class_count(&self) -> usize {
        match self {
            GeneratorConfig::Bounded { classes, .. } => classes.len(),
            GeneratorConfig::Flat { classes, .. } => classes.len(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            GeneratorConfig::Bounded {
                denominations,
                classes,
            } => {
                if denominations.is_empty() || denominations.contains(&0) {
                    return Err(Error::invalid_input(
                        "bounded generation needs positive denominations",
                    ));
                }
                for class in classes {
                    check_targets(&class.label, &class.targets)?;
                    if class.quantities.is_empty() || *class.quantities.start() == 0 {
                        return Err(Error::invalid_input(format!(
                            "size class {} needs quantities of at least 1",
                            class.label
                        )));
                    }
                }
            }
            GeneratorConfig::Flat { classes, .. } => {
                for class in classes {
                    check_targets(&class.label, &class.targets)?;
                    if class.max_coin == 0 {
                        return Err(Error::invalid_input(format!(
                            "size class {} has max_coin 0",
                            class.label
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn check_targets(label: &str, targets: &RangeInclusive<usize>) -> Result<()> {
    if targets.is_empty() {
        return Err(Error::invalid_input(format!(
            "size class {} has an empty target range",
            label
        )));
    }
    Ok(())
}

/// Draws `per_class` cases for every size class in `config`, class by class.
pub fn generate_cases<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    per_class: usize,
    rng: &mut R,
) -> Result<Vec<TestCase>> {
    config.validate()?;

    let mut cases = Vec::with_capacity(per_class.saturating_mul(config.class_count()));
    match config {
        GeneratorConfig::Bounded {
            denominations,
            classes,
        } => {
            for class in classes {
                for _ in 0..per_class {
                    let target = rng.gen_range(class.targets.clone());
                    let pairs = denominations
                        .iter()
                        .map(|&coin| (coin, rng.gen_range(class.quantities.clone())))
                        .collect();
                    cases.push(TestCase {
                        label: class.label.clone(),
                        target,
                        coins: CaseCoins::Bounded(pairs),
                    });
                }
                debug!("generated {} bounded {} cases", per_class, class.label);
            }
        }
        GeneratorConfig::Flat {
            coins_per_case,
            classes,
        } => {
            for class in classes {
                for _ in 0..per_class {
                    let target = rng.gen_range(class.targets.clone());
                    let coins = (0..*coins_per_case)
                        .map(|_| rng.gen_range(1..=class.max_coin))
                        .collect();
                    cases.push(TestCase {
                        label: class.label.clone(),
                        target,
                        coins: CaseCoins::Flat(coins),
                    });
                }
                debug!("generated {} flat {} cases", per_class, class.label);
            }
        }
    }
    Ok(cases)
}
