use std::collections::HashSet;
use std::sync::Arc;

use permtable::cache::PermCache;
use permtable::checked_factorial;
use permtable::generate::{Backtracking, Generator, Strategy};
use permtable::perm::PermView;
use permtable::El;

fn snapshots<G: Generator>(generator: G) -> Vec<Vec<El>> {
    let mut perms = vec![];
    generator.for_each(|perm| perms.push(perm.as_slice().to_vec()));
    perms
}

fn all_permutations(n: usize) -> HashSet<Vec<El>> {
    // Independent reference: all n-digit base-n numbers without repeated digits.
    let mut result = HashSet::new();
    let total = (n as u64).pow(n as u32);
    for mut code in 0..total {
        let mut digits = Vec::with_capacity(n);
        for _ in 0..n {
            digits.push((code % n as u64) as El);
            code /= n as u64;
        }
        let distinct = digits.iter().collect::<HashSet<_>>().len();
        if distinct == n {
            result.insert(digits);
        }
    }
    result
}

#[test_log::test]
fn cached_covers_every_permutation_once() {
    let mut cache = PermCache::new();
    for n in 0..=7 {
        let mut buffer = vec![0; n];
        let perms = snapshots(cache.generate(&mut buffer));
        assert_eq!(Some(perms.len()), checked_factorial::<usize>(n));

        let distinct = perms.iter().cloned().collect::<HashSet<_>>();
        assert_eq!(distinct.len(), perms.len(), "duplicates for order {}", n);
        assert_eq!(distinct, all_permutations(n), "missing permutations for order {}", n);
    }
}

#[test_log::test]
fn cached_order_eight_step_count() {
    let mut cache = PermCache::new();
    let mut buffer = vec![0; 8];
    let perms = snapshots(cache.generate(&mut buffer));
    assert_eq!(perms.len(), 40320);
    assert_eq!(perms.iter().collect::<HashSet<_>>().len(), 40320);
    for perm in perms.iter() {
        assert_eq!(perm.len(), 8);
        assert!(PermView::new(perm).is_permutation(), "{:?} is not a permutation", perm);
    }
}

#[test_log::test]
fn strategies_agree_on_permutation_sets() {
    let mut cache = PermCache::new();
    for n in 1..=8 {
        let mut buffer = vec![0; n];
        let cached = snapshots(cache.generate(&mut buffer))
            .into_iter()
            .collect::<HashSet<_>>();
        let backtracked = snapshots(Backtracking::new(&mut buffer))
            .into_iter()
            .collect::<HashSet<_>>();
        assert_eq!(cached, backtracked, "sets differ for order {}", n);
    }
}

#[test_log::test]
fn order_zero_discrepancy() {
    let mut cache = PermCache::new();
    let mut buffer: Vec<El> = vec![];

    let cached = snapshots(cache.generate(&mut buffer));
    assert_eq!(cached, vec![Vec::<El>::new()]);

    let backtracked = snapshots(Backtracking::new(&mut buffer));
    assert!(backtracked.is_empty());
}

#[test_log::test]
fn order_three_with_inversions() {
    let mut cache = PermCache::new();
    let mut buffer = [0; 3];
    let mut seen = vec![];
    cache.generate(&mut buffer).for_each(|perm| {
        seen.push((perm.to_string(), perm.count_inversions()));
    });
    seen.sort();
    assert_eq!(
        seen,
        vec![
            ("[0, 1, 2]".to_string(), 0),
            ("[0, 2, 1]".to_string(), 1),
            ("[1, 0, 2]".to_string(), 1),
            ("[1, 2, 0]".to_string(), 2),
            ("[2, 0, 1]".to_string(), 2),
            ("[2, 1, 0]".to_string(), 3),
        ]
    );
}

#[test_log::test]
fn repeated_generation_is_identical() {
    let mut cache = PermCache::new();
    cache.ensure(2);
    let two = cache.table(2).unwrap().clone();
    let two_before = two.as_slice().to_vec();

    let mut buffer = [0; 6];
    let first = snapshots(cache.generate(&mut buffer));
    let second = snapshots(cache.generate(&mut buffer));
    assert_eq!(first, second);

    assert!(Arc::ptr_eq(&two, cache.table(2).unwrap()));
    assert_eq!(cache.table(2).unwrap().as_slice(), &two_before[..]);
}

#[test_log::test]
fn independent_generators_interleave() {
    let mut cache = PermCache::new();
    let mut buffer_a = [0; 4];
    let mut buffer_b = [0; 4];
    let mut a = cache.generate(&mut buffer_a);
    let mut b = cache.generate(&mut buffer_b);

    a.advance();
    a.advance();
    let from_b = b.advance().unwrap().as_slice().to_vec();
    let from_a = a.advance().unwrap().as_slice().to_vec();
    assert_eq!(from_b, vec![0, 1, 2, 3]);
    assert_eq!(from_a, vec![0, 2, 1, 3]);
}

#[test_log::test]
fn strategy_selection() {
    let mut cache = PermCache::new();
    let mut buffer = [0; 5];
    let cached = cache
        .try_generate_with(Strategy::Cached, &mut buffer)
        .unwrap()
        .count();
    let backtracked = cache
        .try_generate_with(Strategy::Backtracking, &mut buffer)
        .unwrap()
        .count();
    assert_eq!(cached, 120);
    assert_eq!(backtracked, 120);
}
