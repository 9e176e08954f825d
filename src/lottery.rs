use std::fmt;

use rand::Rng;

/// A discrete distribution over prizes, drawn with a caller-supplied RNG.
///
/// Probabilities are stored cumulatively in insertion order. If they sum to
/// less than one, the last prize absorbs the remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct Lottery<T> {
    cumulative: Vec<f64>,
    prizes: Vec<T>,
}

impl<T> Lottery<T> {
    /// Builds a lottery from `(prize, probability)` pairs; zero-probability
    /// prizes are dropped.
    pub fn new<I>(dist: I) -> Lottery<T>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let mut sum = 0.0;
        let mut cumulative = Vec::new();
        let mut prizes = Vec::new();
        for (prize, p) in dist {
            if p != 0.0 {
                sum += p;
                cumulative.push(sum);
                prizes.push(prize);
            }
        }
        Lottery { cumulative, prizes }
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    /// Draws a prize; `None` only when the lottery has no prizes.
    pub fn play<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let draw: f64 = rng.gen();
        self.cumulative
            .iter()
            .position(|&p| p > draw)
            .and_then(|i| self.prizes.get(i))
            .or_else(|| self.prizes.last())
    }
}

impl<T: fmt::Display> fmt::Display for Lottery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for (prize, p) in self.prizes.iter().zip(&self.cumulative) {
            write!(f, "{}:{:.2} ", prize, p)?;
        }
        write!(f, "]")
    }
}
