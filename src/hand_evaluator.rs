//! Hand strength as a packed 32-bit rank.
//!
//! A packed rank stores the hand category in the bits above 12 and a 1-based
//! ordinal within the category in the low 12 bits, so two ranks compare by
//! plain numeric order. [`DirectEvaluator`] computes the same values as the
//! perfect-hash table in [`crate::lookup_eval`] without needing the table.

use std::fmt;

use serde::Serialize;

use crate::cards::{card_set, Card};
use crate::comb::small_binomial;
use crate::error::{NashError, NashResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HandCategory {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
}

impl HandCategory {
    pub fn from_code(code: u32) -> Option<HandCategory> {
        Some(match code {
            1 => HandCategory::HighCard,
            2 => HandCategory::OnePair,
            3 => HandCategory::TwoPair,
            4 => HandCategory::ThreeOfAKind,
            5 => HandCategory::Straight,
            6 => HandCategory::Flush,
            7 => HandCategory::FullHouse,
            8 => HandCategory::FourOfAKind,
            9 => HandCategory::StraightFlush,
            _ => return None,
        })
    }

    /// Number of distinct ranks in the category.
    pub fn classes(self) -> u32 {
        match self {
            HandCategory::HighCard | HandCategory::Flush => 1277,
            HandCategory::OnePair => 2860,
            HandCategory::TwoPair | HandCategory::ThreeOfAKind => 858,
            HandCategory::Straight | HandCategory::StraightFlush => 10,
            HandCategory::FullHouse | HandCategory::FourOfAKind => 156,
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
        }
    }
}

/// Packed hand rank; higher is stronger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HandRank(pub u32);

impl HandRank {
    pub fn new(category: HandCategory, ordinal: u32) -> HandRank {
        HandRank((category as u32) << 12 | ordinal)
    }

    pub fn category(self) -> Option<HandCategory> {
        HandCategory::from_code(self.0 >> 12)
    }

    pub fn ordinal(self) -> u32 {
        self.0 & 0xFFF
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category() {
            Some(cat) => write!(f, "{} #{}", cat, self.ordinal()),
            None => write!(f, "invalid rank {}", self.0),
        }
    }
}

/// Splits a packed rank into `(category, ordinal)`.
pub fn split_rank(rank: u32) -> (u32, u32) {
    (rank >> 12, rank & 0xFFF)
}

/// Validates a 5 to 7 card hand with distinct cards.
pub fn check_hand(cards: &[Card]) -> NashResult<()> {
    if !(5..=7).contains(&cards.len()) {
        return Err(NashError::InvalidHand { got: cards.len() });
    }
    card_set(cards)?;
    Ok(())
}

/// Pot share of `a` in a heads-up showdown against `b`.
#[inline]
pub fn first_share(a: HandRank, b: HandRank) -> f64 {
    match (a.0 as i64 - b.0 as i64).signum() {
        1 => 1.0,
        -1 => 0.0,
        _ => 0.5,
    }
}

/// Share of a unit pot for each rank: 1 to a sole best hand, `1/winners`
/// to each tied best hand, 0 otherwise.
pub fn split_pot(ranks: &[HandRank]) -> Vec<f64> {
    if let [a, b] = ranks {
        let first = first_share(*a, *b);
        return vec![first, 1.0 - first];
    }

    let Some(&best) = ranks.iter().max() else {
        return Vec::new();
    };
    let winners = ranks.iter().filter(|&&r| r == best).count();
    let share = 1.0 / winners as f64;
    ranks
        .iter()
        .map(|&r| if r == best { share } else { 0.0 })
        .collect()
}

/// Something that turns 5 to 7 cards into a packed rank.
pub trait Evaluator: Sync {
    /// Rank of 5 to 7 distinct valid cards. Inputs are not checked.
    fn rank(&self, cards: &[Card]) -> HandRank;

    /// Checked version of [`Evaluator::rank`].
    fn evaluate(&self, cards: &[Card]) -> NashResult<HandRank> {
        check_hand(cards)?;
        Ok(self.rank(cards))
    }

    /// Pot share of `hero` against `villain` on a complete 5-card `board`.
    fn heads_up(&self, board: &[Card], hero: [Card; 2], villain: [Card; 2]) -> f64 {
        let mut seven = [board[0]; 7];
        seven[..5].copy_from_slice(&board[..5]);
        seven[5..].copy_from_slice(&hero);
        let a = self.rank(&seven);
        seven[5..].copy_from_slice(&villain);
        first_share(a, self.rank(&seven))
    }

    /// Pot shares of two-card `hands` on a complete 5-card `board`.
    fn showdown(&self, board: &[Card], hands: &[[Card; 2]]) -> Vec<f64> {
        let mut seven = [board[0]; 7];
        seven[..5].copy_from_slice(&board[..5]);
        let ranks: Vec<HandRank> = hands
            .iter()
            .map(|h| {
                seven[5..].copy_from_slice(h);
                self.rank(&seven)
            })
            .collect();
        split_pot(&ranks)
    }
}

/// Pot shares of each hand against a fixed 5-card board.
pub fn compare_hands<E: Evaluator + ?Sized>(
    evaluator: &E,
    board: &[Card],
    hands: &[[Card; 2]],
) -> NashResult<Vec<f64>> {
    if board.len() != 5 {
        return Err(NashError::InvalidBoard { got: board.len() });
    }
    if hands.is_empty() {
        return Err(NashError::InvalidValue("no hands to compare".to_string()));
    }
    let mut all: Vec<Card> = board.to_vec();
    all.extend(hands.iter().flatten());
    card_set(&all)?;
    Ok(evaluator.showdown(board, hands))
}

// ---------------------------------------------------------------------------
// Arithmetic evaluator
// ---------------------------------------------------------------------------

const WHEEL: u16 = 0x100F;

/// Highest straight in a rank mask, as the index of its top rank
/// (the wheel reports 3, the five).
fn straight_high(mask: u16) -> Option<u32> {
    for high in (4..=12u32).rev() {
        let run = 0x1F << (high - 4);
        if mask & run == run {
            return Some(high);
        }
    }
    (mask & WHEEL == WHEEL).then_some(3)
}

/// Keeps the `n` highest set bits of `mask`.
fn top_bits(mut mask: u16, n: u32) -> u16 {
    while mask.count_ones() > n {
        mask &= mask - 1;
    }
    mask
}

fn highest(mask: u16) -> u32 {
    15 - mask.leading_zeros()
}

/// Colex index of the set bits of `mask`.
fn colex_bits(mask: u16) -> u32 {
    let mut sum = 0;
    let mut i = 0;
    for bit in 0..16u64 {
        if mask & (1 << bit) != 0 {
            i += 1;
            sum += small_binomial(bit, i);
        }
    }
    sum as u32
}

/// Removes the bits in `holes` from `mask`, shifting higher bits down.
fn squeeze(mask: u16, holes: u16) -> u16 {
    let mut out = 0u16;
    let mut pos = 0;
    for bit in 0..13 {
        if holes & (1 << bit) != 0 {
            continue;
        }
        if mask & (1 << bit) != 0 {
            out |= 1 << pos;
        }
        pos += 1;
    }
    out
}

/// Ordinal of five distinct ranks among the 1277 non-straight rank sets.
fn distinct_five_ordinal(mask: u16) -> u32 {
    let straights_below = (0..=8)
        .map(|low| 0x1Fu16 << low)
        .chain(std::iter::once(WHEEL))
        .filter(|&s| s < mask)
        .count() as u32;
    colex_bits(mask) - straights_below + 1
}

/// Computes packed ranks from rank and suit counts.
///
/// Ordinals match the table: categories are indexed by their defining ranks
/// first, then kickers, each kicker set numbered in colex order over the
/// ranks still available.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectEvaluator;

impl DirectEvaluator {
    pub fn new() -> Self {
        DirectEvaluator
    }
}

impl Evaluator for DirectEvaluator {
    fn rank(&self, cards: &[Card]) -> HandRank {
        let mut suits = [0u16; 4];
        let mut counts = [0u8; 13];
        for c in cards {
            let r = c.rank().index();
            counts[r as usize] += 1;
            suits[c.suit().index() as usize] |= 1 << r;
        }
        let ranks = suits.iter().fold(0u16, |acc, s| acc | s);

        // Five of one suit rules out quads and full houses with at most 7 cards.
        if let Some(&flush) = suits.iter().find(|s| s.count_ones() >= 5) {
            if let Some(high) = straight_high(flush) {
                return HandRank::new(HandCategory::StraightFlush, high - 2);
            }
            return HandRank::new(
                HandCategory::Flush,
                distinct_five_ordinal(top_bits(flush, 5)),
            );
        }

        let with = |n: u8| -> u16 {
            counts
                .iter()
                .enumerate()
                .filter(|&(_, &c)| c >= n)
                .fold(0u16, |acc, (r, _)| acc | 1 << r)
        };
        let quads = with(4);
        let trips = with(3);
        let pairs = with(2);

        if quads != 0 {
            let q = highest(quads);
            let kicker = highest(ranks & !(1 << q));
            let kicker = if kicker > q { kicker - 1 } else { kicker };
            return HandRank::new(HandCategory::FourOfAKind, q * 12 + kicker + 1);
        }

        if trips != 0 {
            let t = highest(trips);
            let others = pairs & !(1 << t);
            if others != 0 {
                let p = highest(others);
                let p = if p > t { p - 1 } else { p };
                return HandRank::new(HandCategory::FullHouse, t * 12 + p + 1);
            }
        }

        if let Some(high) = straight_high(ranks) {
            return HandRank::new(HandCategory::Straight, high - 2);
        }

        if trips != 0 {
            let t = highest(trips);
            let hole = 1 << t;
            let kickers = top_bits(ranks & !hole, 2);
            let ordinal = t * 66 + colex_bits(squeeze(kickers, hole)) + 1;
            return HandRank::new(HandCategory::ThreeOfAKind, ordinal);
        }

        if pairs.count_ones() >= 2 {
            let both = top_bits(pairs, 2);
            let kicker = top_bits(ranks & !both, 1);
            let ordinal = colex_bits(both) * 11 + colex_bits(squeeze(kicker, both)) + 1;
            return HandRank::new(HandCategory::TwoPair, ordinal);
        }

        if pairs != 0 {
            let p = highest(pairs);
            let hole = 1 << p;
            let kickers = top_bits(ranks & !hole, 3);
            let ordinal = p * 220 + colex_bits(squeeze(kickers, hole)) + 1;
            return HandRank::new(HandCategory::OnePair, ordinal);
        }

        HandRank::new(
            HandCategory::HighCard,
            distinct_five_ordinal(top_bits(ranks, 5)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_high_prefers_longest_run_top() {
        // 2 through 7: six-card run, the seven is the top.
        assert_eq!(straight_high(0x3F), Some(5));
        assert_eq!(straight_high(WHEEL), Some(3));
        assert_eq!(straight_high(0x1F00 | WHEEL), Some(12));
        assert_eq!(straight_high(0x0F), None);
    }

    #[test]
    fn top_bits_keeps_highest() {
        assert_eq!(top_bits(0b1011_0110, 2), 0b1010_0000);
        assert_eq!(top_bits(0b11, 5), 0b11);
    }

    #[test]
    fn colex_bits_is_dense() {
        assert_eq!(colex_bits(0b11), 0);
        assert_eq!(colex_bits(0b101), 1);
        assert_eq!(colex_bits(0b110), 2);
        assert_eq!(colex_bits(0b1001), 3);
    }

    #[test]
    fn squeeze_closes_gaps() {
        assert_eq!(squeeze(0b1000, 0b0010), 0b0100);
        assert_eq!(squeeze(0b0001, 0b0010), 0b0001);
    }

    #[test]
    fn distinct_five_bounds() {
        assert_eq!(distinct_five_ordinal(0b10_1111), 1);
        // A K Q J 9
        assert_eq!(distinct_five_ordinal(0x1E80), 1277);
    }
}
