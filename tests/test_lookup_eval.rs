//! Checks against the real HandRanks.dat. Set `NASH_TABLE` to its path to
//! run them; without it they return early.

use std::env;

use holdem_nash::cards::*;
use holdem_nash::comb::Combinations;
use holdem_nash::config::TABLE_ENV;
use holdem_nash::error::NashError;
use holdem_nash::hand_evaluator::*;
use holdem_nash::lookup_eval::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn table() -> Option<&'static RankTable> {
    let path = env::var_os(TABLE_ENV)?;
    Some(RankTable::global(path).unwrap())
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(
        RankTable::load("/nonexistent/HandRanks.dat"),
        Err(NashError::Io(_))
    ));
}

#[test]
fn test_table_categories() {
    let Some(table) = table() else { return };
    let cat = |s: &str| split_rank(table.evaluate(&parse_board(s).unwrap()).unwrap().0).0;
    assert_eq!(cat("2c3c4c5c6c7c9c"), 9);
    assert_eq!(cat("AcAhAdAs7c8c9c"), 8);
    assert_eq!(cat("2c2h2dTsTcJsJh"), 7);
    assert_eq!(cat("2c3c4c5c7c8c9c"), 6);
    assert_eq!(cat("2s3h4c5d6c8c9c"), 5);
    assert_eq!(cat("5c5h5sTd7c8c9c"), 4);
    assert_eq!(cat("2c2d4h4s7c8c9c"), 3);
    assert_eq!(cat("AcAd4s5h7d8c9c"), 2);
    assert_eq!(cat("Ac3d4sTc7c5d9c"), 1);
}

#[test]
fn test_table_matches_direct_evaluator() {
    let Some(table) = table() else { return };
    let direct = DirectEvaluator::new();
    let mut rng = StdRng::seed_from_u64(17);
    for k in 5..=7 {
        for _ in 0..20_000 {
            let mut deck = Deck::new(&[]);
            let hand = deck.sample(&mut rng, k).unwrap().to_vec();
            assert_eq!(
                table.rank(&hand),
                direct.rank(&hand),
                "{}",
                format_cards(&hand).join("")
            );
        }
    }
}

#[test]
fn test_table_matches_direct_on_all_five_card_hands() {
    let Some(table) = table() else { return };
    let deck = new_deck(&[]);
    let mut hand = [deck[0]; 5];
    let mut combos = Combinations::new(&deck, 5);
    while combos.next_into(&mut hand) {
        assert_eq!(table.rank(&hand), DirectEvaluator.rank(&hand));
    }
}

#[test]
fn test_table_showdown_reuses_board_state() {
    let Some(table) = table() else { return };
    let board = parse_board("4s5h7d8c9c").unwrap();
    let aces = parse_board("AcAd").unwrap();
    let deuces = parse_board("2c2d").unwrap();
    let hands = [[aces[0], aces[1]], [deuces[0], deuces[1]]];
    assert_eq!(table.showdown(&board, &hands), vec![1.0, 0.0]);
    assert_eq!(table.heads_up(&board, hands[1], hands[0]), 0.0);
    assert_eq!(
        table.showdown(&board, &hands),
        DirectEvaluator.showdown(&board, &hands)
    );
}
