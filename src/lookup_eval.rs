//! Perfect-hash hand evaluation backed by the precomputed HandRanks table.
//!
//! The table is a finite-state machine of 32,487,834 little-endian `u32`
//! words. Starting from state 53, each card advances the state with
//! `state = table[state + card]`. After seven cards the state is the packed
//! rank; five and six card hands take one more `table[state]` step.

use std::fs;
use std::path::Path;
use std::time::Instant;

use byteorder::{ByteOrder, LittleEndian};
use log::info;
use once_cell::sync::OnceCell;

use crate::cards::Card;
use crate::error::{NashError, NashResult};
use crate::hand_evaluator::{first_share, split_pot, Evaluator, HandRank};

/// Number of words in the table.
pub const TABLE_WORDS: usize = 32_487_834;

/// Exact size of the table resource in bytes.
pub const TABLE_BYTES: usize = TABLE_WORDS * 4;

/// Initial state of the state machine.
pub const START_STATE: u32 = 53;

static GLOBAL: OnceCell<RankTable> = OnceCell::new();

/// Immutable rank table, safe to share between threads.
pub struct RankTable {
    words: Box<[u32]>,
}

impl RankTable {
    /// Reads the table from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> NashResult<RankTable> {
        let path = path.as_ref();
        let started = Instant::now();
        let bytes = fs::read(path)?;
        let table = RankTable::from_bytes(&bytes)?;
        info!(
            "Loaded hand rank table {} ({} bytes) in {:.2?}",
            path.display(),
            bytes.len(),
            started.elapsed()
        );
        Ok(table)
    }

    /// Process-wide table, loaded from `path` on first use.
    ///
    /// Later calls return the already loaded table and ignore `path`.
    pub fn global<P: AsRef<Path>>(path: P) -> NashResult<&'static RankTable> {
        GLOBAL.get_or_try_init(|| RankTable::load(path))
    }

    pub fn from_bytes(bytes: &[u8]) -> NashResult<RankTable> {
        if bytes.len() != TABLE_BYTES {
            return Err(NashError::CorruptTable {
                expected: TABLE_BYTES,
                got: bytes.len(),
            });
        }
        let mut words = vec![0u32; TABLE_WORDS];
        LittleEndian::read_u32_into(bytes, &mut words);
        Ok(RankTable {
            words: words.into_boxed_slice(),
        })
    }

    pub fn from_words(words: Vec<u32>) -> NashResult<RankTable> {
        if words.len() != TABLE_WORDS {
            return Err(NashError::CorruptTable {
                expected: TABLE_BYTES,
                got: words.len() * 4,
            });
        }
        Ok(RankTable {
            words: words.into_boxed_slice(),
        })
    }

    #[inline]
    fn step(&self, state: u32, card: Card) -> u32 {
        self.words[(state + card.id() as u32) as usize]
    }

    /// State reached after feeding `cards` from the start state.
    #[inline]
    pub fn walk(&self, cards: &[Card]) -> u32 {
        cards
            .iter()
            .fold(START_STATE, |state, &c| self.step(state, c))
    }
}

impl Evaluator for RankTable {
    fn rank(&self, cards: &[Card]) -> HandRank {
        let state = self.walk(cards);
        if cards.len() < 7 {
            HandRank(self.words[state as usize])
        } else {
            HandRank(state)
        }
    }

    fn heads_up(&self, board: &[Card], hero: [Card; 2], villain: [Card; 2]) -> f64 {
        let base = self.walk(&board[..5]);
        let a = self.step(self.step(base, hero[0]), hero[1]);
        let b = self.step(self.step(base, villain[0]), villain[1]);
        first_share(HandRank(a), HandRank(b))
    }

    fn showdown(&self, board: &[Card], hands: &[[Card; 2]]) -> Vec<f64> {
        let base = self.walk(&board[..5]);
        let ranks: Vec<HandRank> = hands
            .iter()
            .map(|&[a, b]| HandRank(self.step(self.step(base, a), b)))
            .collect();
        split_pot(&ranks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_board;

    /// Hand-built state machine: every fed prefix gets its own 53-word node
    /// whose word 0 holds the rank of a 5 or 6 card hand.
    struct Wiring {
        words: Vec<u32>,
    }

    impl Wiring {
        fn new() -> Wiring {
            Wiring {
                words: vec![0; START_STATE as usize + 53],
            }
        }

        fn prefix(&mut self, cards: &[Card]) -> u32 {
            let mut state = START_STATE;
            for c in cards {
                let slot = (state + c.id() as u32) as usize;
                if self.words[slot] == 0 {
                    let node = self.words.len();
                    self.words.resize(node + 53, 0);
                    self.words[slot] = node as u32;
                }
                state = self.words[slot];
            }
            state
        }

        fn hand(&mut self, cards: &[Card], rank: u32) {
            if cards.len() == 7 {
                let state = self.prefix(&cards[..6]);
                self.words[(state + cards[6].id() as u32) as usize] = rank;
            } else {
                let state = self.prefix(cards);
                self.words[state as usize] = rank;
            }
        }

        fn table(self) -> RankTable {
            RankTable {
                words: self.words.into_boxed_slice(),
            }
        }
    }

    #[test]
    fn walks_wired_state_machine() {
        let board = parse_board("2c7d9hJsKc").unwrap();
        let hero = parse_board("AcAd").unwrap();
        let villain = parse_board("3c4d").unwrap();
        let with = |extra: &[Card]| [board.as_slice(), extra].concat();

        let five = (1 << 12) | 700;
        let six = (2 << 12) | 3_000;
        let hero_seven = (2 << 12) | 2_800;
        let villain_seven = (1 << 12) | 650;

        let mut wiring = Wiring::new();
        wiring.hand(&board, five);
        wiring.hand(&with(&hero[..1]), six);
        wiring.hand(&with(&hero), hero_seven);
        wiring.hand(&with(&villain), villain_seven);
        let table = wiring.table();

        assert_eq!(table.walk(&[]), START_STATE);
        let board_state = table.walk(&board);
        assert_ne!(board_state, five);
        assert_eq!(table.words[board_state as usize], five);

        assert_eq!(table.rank(&board), HandRank(five));
        assert_eq!(table.rank(&with(&hero[..1])), HandRank(six));
        assert_eq!(table.rank(&with(&hero)), HandRank(hero_seven));
        assert_eq!(table.rank(&with(&villain)), HandRank(villain_seven));

        let hero = [hero[0], hero[1]];
        let villain = [villain[0], villain[1]];
        assert_eq!(table.heads_up(&board, hero, villain), 1.0);
        assert_eq!(table.heads_up(&board, villain, hero), 0.0);
        assert_eq!(table.heads_up(&board, hero, hero), 0.5);
        assert_eq!(
            table.showdown(&board, &[hero, villain, hero]),
            vec![0.5, 0.0, 0.5]
        );
    }

    #[test]
    fn short_buffer_is_corrupt() {
        let err = RankTable::from_bytes(&[0u8; 16]).err().unwrap();
        match err {
            NashError::CorruptTable { expected, got } => {
                assert_eq!(expected, 129_951_336);
                assert_eq!(got, 16);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn wrong_word_count_is_corrupt() {
        assert!(matches!(
            RankTable::from_words(vec![0; 10]),
            Err(NashError::CorruptTable { got: 40, .. })
        ));
    }
}
