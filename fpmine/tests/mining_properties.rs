use fpmine::{
    fpgrowth, levels, preprocess, ImmutableKey, Miner, MinerConfig, OneHotDecoder, PatternResult,
    Tuning,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

fn random_transactions(
    rng: &mut StdRng,
    num_transactions: usize,
    num_items: u32,
    max_len: usize,
) -> Vec<Vec<u32>> {
    (0..num_transactions)
        .map(|_| {
            let len = rng.gen_range(1..=max_len);
            (0..len).map(|_| rng.gen_range(0..num_items)).collect()
        })
        .collect()
}

fn true_support(transactions: &[Vec<u32>], itemset: &[u32]) -> usize {
    transactions
        .iter()
        .filter(|tx| itemset.iter().all(|item| tx.contains(item)))
        .count()
}

/// Every non-empty subset of `0..num_items` reaching `min_support`.
fn brute_force(
    transactions: &[Vec<u32>],
    num_items: u32,
    min_support: usize,
) -> BTreeMap<Vec<u32>, usize> {
    let mut expected = BTreeMap::new();
    for mask in 1u32..(1 << num_items) {
        let itemset: Vec<u32> = (0..num_items).filter(|bit| mask & (1 << bit) != 0).collect();
        let support = true_support(transactions, &itemset);
        if support >= min_support {
            expected.insert(itemset, support);
        }
    }
    expected
}

fn canonical(patterns: &PatternResult<u32>) -> BTreeMap<Vec<u32>, usize> {
    patterns
        .iter()
        .map(|(pattern, &support)| {
            let mut items = pattern.to_vec();
            items.sort_unstable();
            (items, support)
        })
        .collect()
}

#[test]
fn test_matches_brute_force_on_random_data() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..25 {
        let num_items = rng.gen_range(3..=9);
        let num_transactions = rng.gen_range(5..=60);
        let transactions = random_transactions(&mut rng, num_transactions, num_items, 6);
        let min_support = rng.gen_range(1..=6);

        let grouped = preprocess(&transactions, min_support).unwrap();
        let patterns = fpgrowth(&grouped, min_support).unwrap();
        let found = canonical(&patterns);

        // No item set is reported twice under different orders.
        assert_eq!(found.len(), patterns.len());
        assert_eq!(found, brute_force(&transactions, num_items, min_support));
    }
}

#[test]
fn test_single_path_yields_every_subset() {
    let transaction: Vec<u32> = (0..12).collect();
    let transactions = vec![transaction.clone(), transaction.clone(), transaction];

    let grouped = preprocess(&transactions, 3).unwrap();
    assert_eq!(grouped.len(), 1);

    let patterns = fpgrowth(&grouped, 3).unwrap();
    assert_eq!(patterns.len(), (1 << 12) - 1);
    assert!(patterns.values().all(|&support| support == 3));
}

#[test]
fn test_nothing_frequent() {
    let transactions = vec![vec![1u32], vec![2], vec![3]];
    let grouped = preprocess(&transactions, 2).unwrap();

    assert!(grouped.is_empty());
    assert!(fpgrowth(&grouped, 2).unwrap().is_empty());
}

#[test]
fn test_repeated_runs_agree() {
    let mut rng = StdRng::seed_from_u64(7);
    let transactions = random_transactions(&mut rng, 200, 15, 8);
    let miner = Miner::new(MinerConfig::with_min_support(8)).unwrap();

    let first = miner.run(&transactions).unwrap();
    let second = miner.run(&transactions).unwrap();

    assert_eq!(first, second);
    assert_eq!(levels(&first), levels(&second));
}

#[test]
fn test_small_tuning_matches_default() {
    let mut rng = StdRng::seed_from_u64(99);
    let transactions = random_transactions(&mut rng, 120, 10, 5);

    let cramped = Miner::new(MinerConfig {
        min_support: 4,
        tuning: Tuning { initial_capacity: 2, load_factor: 0.9 },
    })
    .unwrap();
    let roomy = Miner::new(MinerConfig {
        min_support: 4,
        tuning: Tuning { initial_capacity: 256, load_factor: 0.25 },
    })
    .unwrap();

    assert_eq!(
        canonical(&cramped.run(&transactions).unwrap()),
        canonical(&roomy.run(&transactions).unwrap())
    );
}

#[test]
fn test_one_hot_rows_to_patterns() {
    let header = ["bread", "milk", "diaper", "beer", "egg", "cola"];
    let rows = vec![
        vec!["1", "1", "0", "0", "0", "0"],
        vec!["1", "0", "1", "1", "1", "0"],
        vec!["0", "yes", "1", "1", "0", "1"],
        vec!["1", "1", "1", "TRUE", "0", "0"],
        vec!["1", "1", "1", "0", "0", "1"],
        vec!["0", "0", "0", "0", "0", "0"],
    ];

    let transactions = OneHotDecoder::default().decode(&header, &rows);
    assert_eq!(transactions.len(), 5);

    let miner = Miner::new(MinerConfig::with_min_support(3)).unwrap();
    let patterns = miner.run(&transactions).unwrap();

    assert_eq!(patterns.get(&ImmutableKey::new(vec!["beer", "diaper"])), Some(&3));
    let pairs = &levels(&patterns)[1];
    assert_eq!(pairs.support_of(&["bread", "milk"]), Some(3));
    assert_eq!(pairs.support_of(&["bread", "beer"]), None);
}
