use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};

use crate::cs::dynamic::{
    BoundedSolver, Combination, CountPolicy, FlatSolver, ReachabilityTable, SupplyModel,
};

/// Every sum reachable by picking 0..=max_count units from each bucket.
fn brute_force_bounded(coin_data: &[(usize, usize)]) -> BTreeSet<usize> {
    let mut sums = BTreeSet::from([0]);
    for &(denomination, max_count) in coin_data {
        let mut next = BTreeSet::new();
        for &sum in &sums {
            for count in 0..=max_count {
                next.insert(sum + denomination * count);
            }
        }
        sums = next;
    }
    sums
}

fn brute_force_single_use(coins: &[usize]) -> BTreeSet<usize> {
    let mut sums = BTreeSet::from([0]);
    for &coin in coins {
        let shifted: Vec<usize> = sums.iter().map(|s| s + coin).collect();
        sums.extend(shifted);
    }
    sums
}

fn brute_force_unbounded(coins: &[usize], limit: usize) -> BTreeSet<usize> {
    let mut sums = BTreeSet::from([0]);
    let mut frontier = vec![0];
    while let Some(sum) = frontier.pop() {
        for &coin in coins {
            let next = sum + coin;
            if next <= limit && sums.insert(next) {
                frontier.push(next);
            }
        }
    }
    sums
}

fn random_pairs(rng: &mut ChaCha8Rng) -> Vec<(usize, usize)> {
    let n = rng.gen_range(0..=4);
    (0..n)
        .map(|_| (rng.gen_range(1..=9), rng.gen_range(1..=3)))
        .collect()
}

fn random_coins(rng: &mut ChaCha8Rng) -> Vec<usize> {
    let n = rng.gen_range(0..=5);
    (0..n).map(|_| rng.gen_range(1..=12)).collect()
}

/// Per-denomination supply after merging duplicate buckets.
fn merged_supply(coin_data: &[(usize, usize)]) -> BTreeMap<usize, usize> {
    let mut supply = BTreeMap::new();
    for &(denomination, max_count) in coin_data {
        *supply.entry(denomination).or_insert(0) += max_count;
    }
    supply
}

#[test]
fn test_bounded_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    for _ in 0..200 {
        let coin_data = random_pairs(&mut rng);
        let reachable = brute_force_bounded(&coin_data);
        let supply = merged_supply(&coin_data);

        for policy in [CountPolicy::FirstReachable, CountPolicy::LastReachable] {
            let solver = BoundedSolver::new(policy);
            for target in 0..=40 {
                let record = solver.solve(target, &coin_data).unwrap();
                assert_eq!(
                    record.feasible,
                    reachable.contains(&target),
                    "target {} coins {:?}",
                    target,
                    coin_data
                );
                if !record.feasible {
                    assert!(record.combination.is_empty());
                    continue;
                }
                assert_eq!(record.combination.total(), Some(target));
                match &record.combination {
                    Combination::Counts(counts) => {
                        for (denomination, used) in counts {
                            assert!(used <= &supply[denomination]);
                        }
                    }
                    Combination::Sequence(_) => panic!("bounded solve returned a sequence"),
                }
            }
        }
    }
}

#[test]
fn test_flat_unbounded_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(29);
    let solver = FlatSolver::new(SupplyModel::Unbounded);
    for _ in 0..200 {
        let coins = random_coins(&mut rng);
        let reachable = brute_force_unbounded(&coins, 60);
        for target in 0..=60 {
            let record = solver.solve(target, &coins).unwrap();
            assert_eq!(record.feasible, reachable.contains(&target));
            if let Combination::Sequence(picked) = &record.combination {
                assert_eq!(picked.iter().sum::<usize>(), if record.feasible { target } else { 0 });
                assert!(picked.len() <= target);
                assert!(picked.iter().all(|c| coins.contains(c)));
                assert!(picked.windows(2).all(|w| w[0] >= w[1]));
            } else {
                panic!("flat solve returned counts");
            }
        }
    }
}

#[test]
fn test_flat_single_use_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(41);
    let solver = FlatSolver::new(SupplyModel::SingleUse);
    for _ in 0..200 {
        let coins = random_coins(&mut rng);
        let reachable = brute_force_single_use(&coins);
        for target in 0..=60 {
            let record = solver.solve(target, &coins).unwrap();
            assert_eq!(record.feasible, reachable.contains(&target));
            if !record.feasible {
                continue;
            }
            assert_eq!(record.combination.total(), Some(target));
            if let Combination::Sequence(picked) = &record.combination {
                let mut remaining = coins.clone();
                for coin in picked {
                    let pos = remaining.iter().position(|c| c == coin).unwrap();
                    remaining.swap_remove(pos);
                }
            } else {
                panic!("flat solve returned counts");
            }
        }
    }
}

#[test]
fn test_bounded_table_is_monotonic() {
    let mut rng = ChaCha8Rng::seed_from_u64(53);
    for _ in 0..50 {
        let coin_data = random_pairs(&mut rng);
        let mut previous = ReachabilityTable::new(60).unwrap();
        BoundedSolver::default()
            .solve_observed(60, &coin_data, |table| {
                assert!(table.covers(&previous));
                previous = table.clone();
            })
            .unwrap();
    }
}

#[test]
fn test_flat_tables_are_monotonic() {
    let mut rng = ChaCha8Rng::seed_from_u64(79);
    for model in [SupplyModel::Unbounded, SupplyModel::SingleUse] {
        let solver = FlatSolver::new(model);
        for _ in 0..50 {
            let coins = random_coins(&mut rng);
            let mut previous = ReachabilityTable::new(60).unwrap();
            let mut passes = 0;
            let record = solver
                .solve_observed(60, &coins, |table| {
                    assert!(table.covers(&previous));
                    previous = table.clone();
                    passes += 1;
                })
                .unwrap();
            assert_eq!(record.feasible, previous.is_reachable(60));
            let expected_passes = match model {
                SupplyModel::Unbounded => coins.iter().collect::<BTreeSet<_>>().len(),
                SupplyModel::SingleUse => coins.len(),
            };
            assert_eq!(passes, expected_passes);
        }
    }
}

#[test]
fn test_bounded_reachability_agrees_with_single_use_expansion() {
    // Expanding each bucket into max_count single units describes the same supply.
    let mut rng = ChaCha8Rng::seed_from_u64(67);
    for _ in 0..100 {
        let coin_data = random_pairs(&mut rng);
        let units: Vec<usize> = coin_data
            .iter()
            .flat_map(|&(denomination, max_count)| std::iter::repeat(denomination).take(max_count))
            .collect();
        let table = FlatSolver::new(SupplyModel::SingleUse)
            .reachability(40, &units)
            .unwrap();
        for target in 0..=40 {
            let record = BoundedSolver::default().solve(target, &coin_data).unwrap();
            assert_eq!(record.feasible, table.is_reachable(target));
        }
    }
}
