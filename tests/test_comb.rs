use std::collections::HashSet;

use holdem_nash::comb::*;
use holdem_nash::error::NashError;
use itertools::Itertools;

fn drain(pool: &[u32], k: usize) -> Vec<Vec<u32>> {
    let mut out = Vec::new();
    let mut buf = vec![0u32; k];
    let mut combos = Combinations::new(pool, k);
    while combos.next_into(&mut buf) {
        out.push(buf.clone());
    }
    out
}

#[test]
fn test_binomial_known_values() {
    assert_eq!(binomial(52, 2).unwrap(), 1326);
    assert_eq!(binomial(52, 5).unwrap(), 2_598_960);
    assert_eq!(binomial(52, 7).unwrap(), 133_784_560);
    assert_eq!(binomial(10, 0).unwrap(), 1);
    assert_eq!(binomial(3, 5).unwrap(), 0);
}

#[test]
fn test_binomial_reports_overflow() {
    assert_eq!(binomial(67, 33).unwrap(), 14_226_520_737_620_288_370);
    assert!(matches!(binomial(70, 35), Err(NashError::InvalidValue(_))));
    assert!(matches!(binomial(140, 70), Err(NashError::InvalidValue(_))));
}

#[test]
fn test_yields_exactly_n_choose_k_distinct_subsets() {
    for n in 0..=10u32 {
        let pool: Vec<u32> = (0..n).collect();
        for k in 0..=n as usize {
            let all = drain(&pool, k);
            assert_eq!(all.len() as u64, binomial(n as u64, k as u64).unwrap(), "n={n} k={k}");
            let distinct: HashSet<Vec<u32>> = all
                .iter()
                .map(|v| v.iter().copied().sorted().collect())
                .collect();
            assert_eq!(distinct.len(), all.len(), "n={n} k={k}");
        }
    }
}

#[test]
fn test_exhaustion_is_sticky() {
    let pool = [1u32, 2, 3, 4];
    let mut buf = [0u32; 2];
    let mut combos = Combinations::new(&pool, 2);
    while combos.next_into(&mut buf) {}
    for _ in 0..3 {
        assert!(!combos.next_into(&mut buf));
    }
}

#[test]
fn test_k_zero_yields_one_empty_subset() {
    let pool = [7u32, 8, 9];
    let mut combos = Combinations::new(&pool, 0);
    let mut buf: [u32; 0] = [];
    assert!(combos.next_into(&mut buf));
    assert!(!combos.next_into(&mut buf));

    let empty: [u32; 0] = [];
    assert_eq!(drain(&empty, 0).len(), 1);
}

#[test]
fn test_k_greater_than_n_yields_nothing() {
    let pool = [1u32, 2];
    assert!(drain(&pool, 3).is_empty());
}

#[test]
fn test_matches_itertools_as_sets() {
    let pool: Vec<u32> = (10..20).collect();
    let ours: HashSet<Vec<u32>> = drain(&pool, 4)
        .into_iter()
        .map(|v| v.into_iter().sorted().collect())
        .collect();
    let theirs: HashSet<Vec<u32>> = pool.iter().copied().combinations(4).collect();
    assert_eq!(ours, theirs);
}

#[test]
fn test_duplicate_values_are_selected_by_position() {
    let pool = [5u32, 5, 5];
    let all = drain(&pool, 2);
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|v| v == &vec![5, 5]));
}

#[test]
fn test_iterator_matches_next_into() {
    let pool = ['a', 'b', 'c', 'd', 'e'];
    let via_iter: Vec<Vec<char>> = Combinations::new(&pool, 3).collect();
    let mut via_buf = Vec::new();
    let mut buf = ['x'; 3];
    let mut combos = Combinations::new(&pool, 3);
    assert_eq!(combos.arity(), 3);
    while combos.next_into(&mut buf) {
        via_buf.push(buf.to_vec());
    }
    assert_eq!(via_iter, via_buf);
    assert_eq!(via_iter.len(), 10);
}

#[test]
fn test_short_buffer_does_not_advance() {
    let pool = [1u32, 2, 3, 4];
    let mut combos = Combinations::new(&pool, 3);
    let mut short = [0u32; 2];
    assert!(!combos.next_into(&mut short));
    assert_eq!(short, [0, 0]);

    let mut buf = [0u32; 3];
    assert!(combos.next_into(&mut buf));
    assert_eq!(buf, [1, 2, 3]);
}
