//! Hand equity by exhaustive enumeration or Monte-Carlo sampling.
//!
//! An [`Equity`] engine wraps an evaluator and a pool of random streams,
//! one per worker, seeded once when the engine is built. Parallel runs give
//! each worker its own stream and deck copy and join before averaging.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::cards::{card_set, minus, new_deck, Card, Deck};
use crate::category::HoleCategory;
use crate::comb::Combinations;
use crate::config::Config;
use crate::error::{NashError, NashResult};
use crate::hand_evaluator::Evaluator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquityResult {
    pub win: f64,
    pub tie: f64,
    pub lose: f64,
    pub scenarios: usize,
}

impl EquityResult {
    pub fn equity(&self) -> f64 {
        self.win + self.tie / 2.0
    }
}

impl fmt::Display for EquityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Win {:.1}% | Tie {:.1}% | Lose {:.1}% (equity: {:.1}%)",
            self.win * 100.0,
            self.tie * 100.0,
            self.lose * 100.0,
            self.equity() * 100.0,
        )
    }
}

/// Who the hero plays against.
#[derive(Debug, Clone, PartialEq)]
pub enum Opponent {
    /// A uniformly random two-card holding from the unseen cards.
    Random,
    /// One known holding.
    Holding([Card; 2]),
    /// Every live holding of the listed categories, equally weighted.
    Range(Vec<HoleCategory>),
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    win: f64,
    tie: f64,
    lose: f64,
    scenarios: usize,
}

impl Tally {
    #[inline]
    fn add(&mut self, share: f64) {
        if share >= 1.0 {
            self.win += 1.0;
        } else if share <= 0.0 {
            self.lose += 1.0;
        } else {
            self.tie += 1.0;
        }
        self.scenarios += 1;
    }

    fn finish(self) -> NashResult<EquityResult> {
        if self.scenarios == 0 {
            return Err(NashError::Undefined("no scenarios were evaluated"));
        }
        let n = self.scenarios as f64;
        Ok(EquityResult {
            win: self.win / n,
            tie: self.tie / n,
            lose: self.lose / n,
            scenarios: self.scenarios,
        })
    }
}

/// A validated equity question: hero cards, known board and unseen cards.
struct Spot {
    hero: [Card; 2],
    board: Vec<Card>,
    /// Unseen cards: the deck minus hero and board.
    deck: Vec<Card>,
    /// Known opponent holdings with the cards left once each is removed.
    /// `None` means a random opponent drawn from `deck`.
    villains: Option<Vec<([Card; 2], Vec<Card>)>>,
}

impl Spot {
    fn new(hole: &[Card], board: &[Card], opponent: &Opponent) -> NashResult<Spot> {
        let [a, b] = hole else {
            return Err(NashError::InvalidHoleSize { got: hole.len() });
        };
        if board.len() > 5 {
            return Err(NashError::InvalidBoard { got: board.len() });
        }
        let mut dead = vec![*a, *b];
        dead.extend_from_slice(board);
        card_set(&dead)?;
        let deck = new_deck(&dead);

        let villains = match opponent {
            Opponent::Random => None,
            Opponent::Holding(villain) => {
                let mut all = dead.clone();
                all.extend_from_slice(villain);
                card_set(&all)?;
                Some(vec![(*villain, minus(&deck, villain))])
            }
            Opponent::Range(categories) => {
                let mut seen: HashSet<u64> = HashSet::new();
                let mut live = Vec::new();
                for combo in categories.iter().flat_map(|c| c.combos()) {
                    if combo.iter().any(|c| dead.contains(c))
                        || !seen.insert(combo[0].mask() | combo[1].mask())
                    {
                        continue;
                    }
                    live.push((combo, minus(&deck, &combo)));
                }
                if live.is_empty() {
                    return Err(NashError::Undefined(
                        "no opponent holding is compatible with the known cards",
                    ));
                }
                Some(live)
            }
        };

        Ok(Spot {
            hero: [*a, *b],
            board: board.to_vec(),
            deck,
            villains,
        })
    }

    /// Board cards still to come.
    fn missing(&self) -> usize {
        5 - self.board.len()
    }

    fn full_board(&self) -> [Card; 5] {
        let mut full = [self.hero[0]; 5];
        full[..self.board.len()].copy_from_slice(&self.board);
        full
    }
}

/// Equity engine over an evaluator, with one random stream per worker.
pub struct Equity<'e, E: Evaluator + ?Sized> {
    evaluator: &'e E,
    streams: Vec<Mutex<StdRng>>,
}

impl<'e, E: Evaluator + ?Sized> Equity<'e, E> {
    /// Builds an engine with `workers` streams derived from `seed`.
    pub fn new(evaluator: &'e E, workers: usize, seed: u64) -> Self {
        let streams = (0..workers.max(1) as u64)
            .map(|i| {
                let stream_seed = seed ^ i.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                Mutex::new(StdRng::seed_from_u64(stream_seed))
            })
            .collect();
        Equity { evaluator, streams }
    }

    pub fn from_config(evaluator: &'e E, config: &Config) -> Self {
        Equity::new(evaluator, config.worker_count(), config.seed_or_random())
    }

    pub fn workers(&self) -> usize {
        self.streams.len()
    }

    /// Equity of `hole` against a random opponent given 0 to 5 board cards.
    ///
    /// `trials == 0` enumerates every opponent holding and runout; otherwise
    /// `trials` Monte-Carlo samples are drawn on the first stream.
    pub fn hand_equity(&self, hole: &[Card], board: &[Card], trials: usize) -> NashResult<EquityResult> {
        self.equity(hole, board, &Opponent::Random, trials, false)
    }

    /// Monte-Carlo equity against a random opponent on every worker.
    ///
    /// Trials are rounded up to a multiple of the worker count and split
    /// evenly; the per-worker results are averaged with equal weight.
    pub fn hand_equity_parallel(
        &self,
        hole: &[Card],
        board: &[Card],
        trials: usize,
    ) -> NashResult<EquityResult> {
        self.equity(hole, board, &Opponent::Random, trials, true)
    }

    pub fn equity_vs_hand(
        &self,
        hole: &[Card],
        villain: [Card; 2],
        board: &[Card],
        trials: usize,
    ) -> NashResult<EquityResult> {
        self.equity(hole, board, &Opponent::Holding(villain), trials, false)
    }

    pub fn equity_vs_range(
        &self,
        hole: &[Card],
        range: &[HoleCategory],
        board: &[Card],
        trials: usize,
    ) -> NashResult<EquityResult> {
        self.equity(hole, board, &Opponent::Range(range.to_vec()), trials, false)
    }

    /// General entry point: exhaustive when `trials == 0`, otherwise
    /// Monte-Carlo, spread over all workers when `parallel` is set.
    pub fn equity(
        &self,
        hole: &[Card],
        board: &[Card],
        opponent: &Opponent,
        trials: usize,
        parallel: bool,
    ) -> NashResult<EquityResult> {
        let spot = Spot::new(hole, board, opponent)?;
        if trials == 0 {
            debug!("exhaustive equity, board {} cards", board.len());
            return self.exhaustive(&spot)?.finish();
        }
        if !parallel {
            debug!("monte-carlo equity, {} trials", trials);
            return self.with_stream(0, |rng| self.monte_carlo(&spot, trials, rng))?.finish();
        }

        let workers = self.workers();
        let per_worker = trials.div_ceil(workers);
        debug!(
            "parallel monte-carlo equity, {} workers x {} trials",
            workers, per_worker
        );
        let results: Vec<NashResult<EquityResult>> = (0..workers)
            .into_par_iter()
            .map(|i| {
                self.with_stream(i, |rng| self.monte_carlo(&spot, per_worker, rng))?
                    .finish()
            })
            .collect();

        let mut total = EquityResult {
            win: 0.0,
            tie: 0.0,
            lose: 0.0,
            scenarios: 0,
        };
        for result in results {
            let r = result?;
            total.win += r.win;
            total.tie += r.tie;
            total.lose += r.lose;
            total.scenarios += r.scenarios;
        }
        let n = workers as f64;
        total.win /= n;
        total.tie /= n;
        total.lose /= n;
        Ok(total)
    }

    fn with_stream<T>(&self, index: usize, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.streams[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut *rng)
    }

    fn exhaustive(&self, spot: &Spot) -> NashResult<Tally> {
        let mut tally = Tally::default();
        let known = spot.board.len();
        let mut full = spot.full_board();

        match &spot.villains {
            None => {
                let mut villain = [spot.hero[0]; 2];
                let mut holdings = Combinations::new(&spot.deck, 2);
                while holdings.next_into(&mut villain) {
                    let rest = minus(&spot.deck, &villain);
                    let mut runouts = Combinations::new(&rest, spot.missing());
                    while runouts.next_into(&mut full[known..]) {
                        tally.add(self.evaluator.heads_up(&full, spot.hero, villain));
                    }
                }
            }
            Some(villains) => {
                for (villain, rest) in villains {
                    let mut runouts = Combinations::new(rest, spot.missing());
                    while runouts.next_into(&mut full[known..]) {
                        tally.add(self.evaluator.heads_up(&full, spot.hero, *villain));
                    }
                }
            }
        }
        Ok(tally)
    }

    fn monte_carlo(&self, spot: &Spot, trials: usize, rng: &mut StdRng) -> NashResult<Tally> {
        let mut tally = Tally::default();
        let known = spot.board.len();
        let mut full = spot.full_board();

        match &spot.villains {
            None => {
                let mut deck = Deck {
                    cards: spot.deck.clone(),
                };
                for _ in 0..trials {
                    let drawn = deck.sample(rng, 2 + spot.missing())?;
                    let villain = [drawn[0], drawn[1]];
                    full[known..].copy_from_slice(&drawn[2..]);
                    tally.add(self.evaluator.heads_up(&full, spot.hero, villain));
                }
            }
            Some(villains) => {
                let mut decks: Vec<([Card; 2], Deck)> = villains
                    .iter()
                    .map(|(v, rest)| (*v, Deck { cards: rest.clone() }))
                    .collect();
                for _ in 0..trials {
                    let pick = rng.gen_range(0..decks.len());
                    let (villain, deck) = &mut decks[pick];
                    let drawn = deck.sample(rng, spot.missing())?;
                    full[known..].copy_from_slice(drawn);
                    tally.add(self.evaluator.heads_up(&full, spot.hero, *villain));
                }
            }
        }
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_board;
    use crate::hand_evaluator::DirectEvaluator;

    #[test]
    fn spot_rejects_duplicate_hero_and_board() {
        let hole = parse_board("AsKs").unwrap();
        let board = parse_board("As2d3c").unwrap();
        assert!(matches!(
            Spot::new(&hole, &board, &Opponent::Random),
            Err(NashError::DuplicateCard(_))
        ));
    }

    #[test]
    fn range_dedupes_repeated_categories() {
        let hole = parse_board("AsKs").unwrap();
        let kk: HoleCategory = "KK".parse().unwrap();
        let spot = Spot::new(&hole, &[], &Opponent::Range(vec![kk, kk])).unwrap();
        // Ks is dead, leaving three kings.
        assert_eq!(spot.villains.unwrap().len(), 3);
    }

    #[test]
    fn range_keeps_holdings_that_share_single_cards() {
        let hole = parse_board("2c2d").unwrap();
        let range: Vec<HoleCategory> = ["AKs", "AA", "AKo", "AKs"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let spot = Spot::new(&hole, &[], &Opponent::Range(range)).unwrap();
        let villains = spot.villains.unwrap();
        assert_eq!(villains.len(), 4 + 6 + 12);
        let distinct: HashSet<u64> = villains
            .iter()
            .map(|(v, _)| v[0].mask() | v[1].mask())
            .collect();
        assert_eq!(distinct.len(), villains.len());
    }

    #[test]
    fn streams_differ_per_worker() {
        let eval = DirectEvaluator;
        let engine = Equity::new(&eval, 2, 7);
        let a: u64 = engine.with_stream(0, |rng| rng.gen());
        let b: u64 = engine.with_stream(1, |rng| rng.gen());
        assert_ne!(a, b);
    }
}
