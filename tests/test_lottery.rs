use std::collections::HashMap;

use holdem_nash::lottery::Lottery;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_zero_prizes_are_dropped() {
    let lotto = Lottery::new([("a", 0.4), ("b", 0.1), ("c", 0.5), ("d", 0.0)]);
    assert_eq!(lotto.len(), 3);
    assert_eq!(lotto.to_string(), "[ a:0.40 b:0.50 c:1.00 ]");
}

#[test]
fn test_draw_frequencies_follow_probabilities() {
    let lotto = Lottery::new([("fold", 0.2), ("call", 0.5), ("raise", 0.3)]);
    let mut rng = StdRng::seed_from_u64(4);
    let mut counts: HashMap<&str, u32> = HashMap::new();
    let draws = 50_000;
    for _ in 0..draws {
        *counts.entry(*lotto.play(&mut rng).unwrap()).or_default() += 1;
    }
    for (prize, p) in [("fold", 0.2), ("call", 0.5), ("raise", 0.3)] {
        let freq = counts[prize] as f64 / draws as f64;
        assert!((freq - p).abs() < 0.01, "{prize}: {freq}");
    }
}

#[test]
fn test_last_prize_absorbs_remainder() {
    let lotto = Lottery::new([("x", 0.1), ("y", 0.1)]);
    let mut rng = StdRng::seed_from_u64(2);
    let ys = (0..1_000)
        .filter(|_| lotto.play(&mut rng) == Some(&"y"))
        .count();
    assert!(ys > 800, "{ys}");
}

#[test]
fn test_empty_lottery() {
    let lotto: Lottery<&str> = Lottery::new([("only", 0.0)]);
    assert!(lotto.is_empty());
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(lotto.play(&mut rng), None);
}
