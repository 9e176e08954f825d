//! Combination counting and enumeration.
//!
//! [`Combinations`] walks every k-subset of a slice in lexicographic order of
//! positions (Algorithm T, TAOCP 7.2.1.3). It writes each subset into a
//! caller buffer so the inner loops of the equity engine never allocate.

use crate::error::{NashError, NashResult};

/// Exact number of ways to choose `k` items out of `n`. Zero when `k > n`.
///
/// Fails with [`NashError::InvalidValue`] when the count does not fit in a
/// `u64`.
pub fn binomial(n: u64, k: u64) -> NashResult<u64> {
    if k > n {
        return Ok(0);
    }
    let overflow = || NashError::InvalidValue(format!("C({n}, {k}) does not fit in 64 bits"));
    // acc = C(n, i) never shrinks while i <= n / 2 and stays below 2^64, so
    // the next product fits in u128.
    let mut acc: u128 = 1;
    for i in 0..k.min(n - k) as u128 {
        acc = acc * (n as u128 - i) / (i + 1);
        if acc > u64::MAX as u128 {
            return Err(overflow());
        }
    }
    Ok(acc as u64)
}

/// `C(n, k)` for card-sized arguments, `n <= 64`, where the count always
/// fits in a `u64`.
pub(crate) fn small_binomial(n: u64, k: u64) -> u64 {
    debug_assert!(n <= 64, "small_binomial({n}, {k})");
    if k > n {
        return 0;
    }
    let mut acc: u128 = 1;
    for i in 0..k.min(n - k) as u128 {
        acc = acc * (n as u128 - i) / (i + 1);
    }
    acc as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Visit,
    Done,
}

/// Stateful, non-restartable generator of the k-combinations of `pool`.
///
/// Produces exactly `C(n, k)` subsets, selected by position, so repeated
/// values in `pool` yield repeated-valued subsets. `k = 0` yields the empty
/// subset once; `k > n` yields nothing.
pub struct Combinations<'a, T> {
    pool: &'a [T],
    k: usize,
    /// `c[1..=k]` hold the chosen positions, `c[k + 1] = n`, `c[k + 2] = 0`.
    c: Vec<usize>,
    j: usize,
    phase: Phase,
}

impl<'a, T: Copy> Combinations<'a, T> {
    pub fn new(pool: &'a [T], k: usize) -> Self {
        let n = pool.len();
        let mut c = vec![0usize; k + 3];
        for (j, slot) in c.iter_mut().enumerate().take(k + 1).skip(1) {
            *slot = j - 1;
        }
        c[k + 1] = n;
        c[k + 2] = 0;
        Combinations {
            pool,
            k,
            c,
            j: k,
            phase: if k > n { Phase::Done } else { Phase::Visit },
        }
    }

    /// Arity of the generated subsets.
    pub fn arity(&self) -> usize {
        self.k
    }

    /// Writes the next combination into `out[..k]` and returns `true`, or
    /// returns `false` once every combination has been produced.
    ///
    /// A buffer shorter than `k` also returns `false` and does not advance.
    pub fn next_into(&mut self, out: &mut [T]) -> bool {
        if self.phase == Phase::Done {
            return false;
        }
        let Some(out) = out.get_mut(..self.k) else {
            return false;
        };
        for (slot, &pos) in out.iter_mut().zip(&self.c[1..=self.k]) {
            *slot = self.pool[pos];
        }
        self.advance();
        true
    }

    fn advance(&mut self) {
        let k = self.k;
        if k == 0 || k == self.pool.len() {
            self.phase = Phase::Done;
            return;
        }

        let c = &mut self.c;
        let x = if self.j > 0 {
            self.j
        } else {
            if c[1] + 1 < c[2] {
                c[1] += 1;
                return;
            }
            self.j = 2;
            loop {
                c[self.j - 1] = self.j - 2;
                let x = c[self.j] + 1;
                if x != c[self.j + 1] {
                    break x;
                }
                self.j += 1;
            }
        };

        if self.j > k {
            self.phase = Phase::Done;
            return;
        }
        c[self.j] = x;
        self.j -= 1;
    }
}

impl<T: Copy> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.phase == Phase::Done {
            return None;
        }
        let mut out = Vec::with_capacity(self.k);
        out.extend(self.c[1..=self.k].iter().map(|&pos| self.pool[pos]));
        self.advance();
        Some(out)
    }
}
