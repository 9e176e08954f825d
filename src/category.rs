use std::fmt;
use std::str::FromStr;

use crate::cards::{Card, Rank, ALL_SUITS, DECK_SIZE};
use crate::comb::small_binomial;
use crate::error::{NashError, NashResult};

/// A starting-hand shorthand: a pair (`"AA"`), an offsuit (`"AKo"`) or a
/// suited (`"AKs"`) holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoleCategory {
    Pair(Rank),
    Offsuit(Rank, Rank),
    Suited(Rank, Rank),
}

impl HoleCategory {
    /// Classifies two hole cards, high rank first.
    pub fn of(cards: &[Card]) -> NashResult<HoleCategory> {
        let [c1, c2] = cards else {
            return Err(NashError::InvalidHoleSize { got: cards.len() });
        };
        let (hi, lo) = if c1.rank() >= c2.rank() {
            (c1.rank(), c2.rank())
        } else {
            (c2.rank(), c1.rank())
        };
        Ok(if hi == lo {
            HoleCategory::Pair(hi)
        } else if c1.suit() == c2.suit() {
            HoleCategory::Suited(hi, lo)
        } else {
            HoleCategory::Offsuit(hi, lo)
        })
    }

    /// Every concrete two-card holding in the category.
    ///
    /// Pairs come in ascending suit-pair order, offsuit holdings over every
    /// ordered suit pair `i != j`, suited holdings by suit.
    pub fn combos(&self) -> Vec<[Card; 2]> {
        match *self {
            HoleCategory::Pair(r) => {
                let mut combos = Vec::with_capacity(6);
                for i in 0..ALL_SUITS.len() {
                    for j in (i + 1)..ALL_SUITS.len() {
                        combos.push([Card::new(r, ALL_SUITS[i]), Card::new(r, ALL_SUITS[j])]);
                    }
                }
                combos
            }
            HoleCategory::Offsuit(r1, r2) => {
                let mut combos = Vec::with_capacity(12);
                for &s1 in &ALL_SUITS {
                    for &s2 in &ALL_SUITS {
                        if s1 != s2 {
                            combos.push([Card::new(r1, s1), Card::new(r2, s2)]);
                        }
                    }
                }
                combos
            }
            HoleCategory::Suited(r1, r2) => ALL_SUITS
                .iter()
                .map(|&s| [Card::new(r1, s), Card::new(r2, s)])
                .collect(),
        }
    }

    /// Probability of being dealt this category given `seen` cards are out
    /// of the deck: live combinations over `C(52 - |seen|, 2)`.
    pub fn hole_probability(&self, seen: &[Card]) -> NashResult<f64> {
        if seen.len() + 2 > DECK_SIZE {
            return Err(NashError::Undefined(
                "fewer than two unseen cards remain",
            ));
        }
        let live = self
            .combos()
            .iter()
            .filter(|hand| !hand.iter().any(|c| seen.contains(c)))
            .count();
        let all_hands = small_binomial((DECK_SIZE - seen.len()) as u64, 2);
        Ok(live as f64 / all_hands as f64)
    }
}

impl FromStr for HoleCategory {
    type Err = NashError;

    fn from_str(notation: &str) -> NashResult<HoleCategory> {
        let notation = notation.trim();
        let invalid = || NashError::InvalidCategory(notation.to_string());
        let chars: Vec<char> = notation.chars().collect();

        match chars.as_slice() {
            [a, b] if a == b => Ok(HoleCategory::Pair(Rank::from_char(*a)?)),
            [a, b, kind] if a != b => {
                let r1 = Rank::from_char(*a)?;
                let r2 = Rank::from_char(*b)?;
                let (hi, lo) = if r1 > r2 { (r1, r2) } else { (r2, r1) };
                match kind {
                    's' => Ok(HoleCategory::Suited(hi, lo)),
                    'o' => Ok(HoleCategory::Offsuit(hi, lo)),
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for HoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoleCategory::Pair(r) => write!(f, "{}{}", r.to_char(), r.to_char()),
            HoleCategory::Offsuit(a, b) => write!(f, "{}{}o", a.to_char(), b.to_char()),
            HoleCategory::Suited(a, b) => write!(f, "{}{}s", a.to_char(), b.to_char()),
        }
    }
}

/// Expands a shorthand such as `"AKo"` into its concrete holdings.
pub fn expand_category(notation: &str) -> NashResult<Vec<[Card; 2]>> {
    Ok(notation.parse::<HoleCategory>()?.combos())
}

/// Shorthand for [`HoleCategory::hole_probability`].
pub fn hole_probability(notation: &str, seen: &[Card]) -> NashResult<f64> {
    notation.parse::<HoleCategory>()?.hole_probability(seen)
}

/// Number of holdings in a category: 6, 12 or 4. Zero for unknown notation.
pub fn combo_count(notation: &str) -> u32 {
    match notation.parse::<HoleCategory>() {
        Ok(HoleCategory::Pair(_)) => 6,
        Ok(HoleCategory::Offsuit(..)) => 12,
        Ok(HoleCategory::Suited(..)) => 4,
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_card;

    #[test]
    fn pair_order_follows_suit_pairs() {
        let combos = HoleCategory::Pair(Rank::Ace).combos();
        let first: Vec<String> = combos[0].iter().map(|c| c.to_string()).collect();
        let last: Vec<String> = combos[5].iter().map(|c| c.to_string()).collect();
        assert_eq!(first, vec!["Ac", "Ad"]);
        assert_eq!(last, vec!["Ah", "As"]);
    }

    #[test]
    fn of_normalizes_rank_order() {
        let cards = [parse_card("7h").unwrap(), parse_card("Kh").unwrap()];
        assert_eq!(
            HoleCategory::of(&cards).unwrap(),
            HoleCategory::Suited(Rank::King, Rank::Seven)
        );
    }
}
