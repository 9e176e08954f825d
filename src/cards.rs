use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Serialize, Serializer};

use crate::comb::small_binomial;
use crate::error::{NashError, NashResult};

pub const RANKS_STR: &str = "23456789TJQKA";
pub const SUITS_STR: &str = "cdhs";

/// Number of cards in the deck; card ids run from 1 to 52.
pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> NashResult<Rank> {
        match c {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(NashError::InvalidRank(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based index: Two = 0, Ace = 12.
    pub fn index(self) -> u8 {
        self as u8 - 2
    }

    pub fn from_index(index: u8) -> Option<Rank> {
        ALL_RANKS.get(index as usize).copied()
    }
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    pub fn from_char(c: char) -> NashResult<Suit> {
        match c {
            'c' => Ok(Suit::Clubs),
            'd' => Ok(Suit::Diamonds),
            'h' => Ok(Suit::Hearts),
            's' => Ok(Suit::Spades),
            _ => Err(NashError::InvalidSuit(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

/// A card identified by an integer in `1..=52`.
///
/// Ids follow the hand rank table layout: `id = 4 * rank_index + suit_index + 1`,
/// so `2c` is 1, `2d` is 2 and `As` is 52. Ordering is by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card(4 * rank.index() + suit.index() + 1)
    }

    pub fn from_id(id: u8) -> NashResult<Card> {
        if (1..=DECK_SIZE as u8).contains(&id) {
            Ok(Card(id))
        } else {
            Err(NashError::InvalidCardId(id))
        }
    }

    pub fn id(self) -> u8 {
        self.0
    }

    pub fn rank(self) -> Rank {
        ALL_RANKS[((self.0 - 1) / 4) as usize]
    }

    pub fn suit(self) -> Suit {
        ALL_SUITS[((self.0 - 1) % 4) as usize]
    }

    pub fn value(self) -> u8 {
        self.rank().value()
    }

    pub fn pretty(self) -> String {
        format!("{}{}", self.rank().to_char(), self.suit().symbol())
    }

    /// Bit for this card in a 64-bit card set.
    pub fn mask(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().to_char(), self.suit().to_char())
    }
}

impl FromStr for Card {
    type Err = NashError;

    fn from_str(s: &str) -> NashResult<Card> {
        parse_card(s)
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The 52-card universe in id order, minus `excluding`.
pub fn new_deck(excluding: &[Card]) -> Vec<Card> {
    let all: Vec<Card> = (1..=DECK_SIZE as u8).map(Card).collect();
    if excluding.is_empty() {
        return all;
    }
    minus(&all, excluding)
}

/// Set difference `a \ b`, keeping the order of `a`.
pub fn minus(a: &[Card], b: &[Card]) -> Vec<Card> {
    a.iter().filter(|c| !b.contains(c)).copied().collect()
}

/// Bit set of `cards`, failing on repeated cards.
pub fn card_set(cards: &[Card]) -> NashResult<u64> {
    let mut set = 0u64;
    for &c in cards {
        if set & c.mask() != 0 {
            return Err(NashError::DuplicateCard(c));
        }
        set |= c.mask();
    }
    Ok(set)
}

pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(excluding: &[Card]) -> Deck {
        Deck {
            cards: new_deck(excluding),
        }
    }

    /// Moves `k` uniformly chosen cards to the front of the deck with a
    /// partial Fisher-Yates shuffle and returns them.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R, k: usize) -> NashResult<&[Card]> {
        let n = self.cards.len();
        if k > n {
            return Err(NashError::NotEnoughDeck {
                requested: k,
                available: n,
            });
        }
        for i in 0..k {
            let j = rng.gen_range(i..n);
            self.cards.swap(i, j);
        }
        Ok(&self.cards[..k])
    }

    pub fn deal(&mut self, n: usize) -> NashResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(NashError::NotEnoughDeck {
                requested: n,
                available: self.cards.len(),
            });
        }
        let dealt: Vec<Card> = self.cards.drain(..n).collect();
        Ok(dealt)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn parse_card(notation: &str) -> NashResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(NashError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0])?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

pub fn parse_cards<S: AsRef<str>>(notations: &[S]) -> NashResult<Vec<Card>> {
    notations.iter().map(|s| parse_card(s.as_ref())).collect()
}

pub fn format_cards(cards: &[Card]) -> Vec<String> {
    cards.iter().map(|c| c.to_string()).collect()
}

/// Parses concatenated notation such as `"AsKd7c"` (spaces and commas ignored).
pub fn parse_board(notation: &str) -> NashResult<Vec<Card>> {
    let notation = notation.trim().replace(|c: char| c == ' ' || c == ',', "");
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() % 2 != 0 {
        return Err(NashError::InvalidCardNotation(notation));
    }
    chars
        .chunks(2)
        .map(|pair| parse_card(&pair.iter().collect::<String>()))
        .collect()
}

/// Colex index of a card set: `sum C(v_i - 1, i + 1)` over the ids sorted
/// ascending. Dense in `[0, C(52, k))` for k-card sets.
pub fn colex_index(cards: &[Card]) -> u64 {
    let mut ids: Vec<u64> = cards.iter().map(|c| c.id() as u64).collect();
    ids.sort_unstable();
    ids.iter()
        .enumerate()
        .map(|(i, &v)| small_binomial(v - 1, i as u64 + 1))
        .sum()
}

/// Reduces a card set to its suit-isomorphism representative.
///
/// Suits are ordered by descending card count, ties broken by the
/// lexicographically smaller rank sequence, then renamed clubs, diamonds,
/// hearts, spades in that order. Within a suit ranks ascend.
pub fn canonicalize(cards: &[Card]) -> Vec<Card> {
    let mut groups: [Vec<u8>; 4] = Default::default();
    for c in cards {
        groups[c.suit().index() as usize].push(c.rank().index());
    }
    for g in groups.iter_mut() {
        g.sort_unstable();
    }
    groups.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut canonical = Vec::with_capacity(cards.len());
    for (suit, ranks) in ALL_SUITS.iter().zip(groups.iter()) {
        for &r in ranks {
            canonical.push(Card::new(ALL_RANKS[r as usize], *suit));
        }
    }
    canonical
}
