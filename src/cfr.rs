//! Per-node update rules for counterfactual regret minimization.
//!
//! Zinkevich et al., "Regret minimization in games with incomplete
//! information" (NIPS 2007).

use crate::error::{NashError, NashResult};

/// Counterfactual regret of each action at a node.
///
/// `regret[i] = reach * (values[i] - ev)` where `ev` is the node value under
/// `strategy`. `reach` is the probability of the opponent reaching the node.
pub fn counterfactual_regret(values: &[f64], strategy: &[f64], reach: f64) -> NashResult<Vec<f64>> {
    if values.len() != strategy.len() {
        return Err(NashError::LengthMismatch {
            expected: values.len(),
            got: strategy.len(),
        });
    }
    let ev: f64 = values.iter().zip(strategy).map(|(v, s)| v * s).sum();
    Ok(values.iter().map(|v| reach * (v - ev)).collect())
}

/// New strategy proportional to the positive part of cumulative regret.
///
/// When no action has positive regret the result is all zeros, not a
/// uniform distribution. Callers that need a distribution must handle that
/// case; see [`crate::game_tree::Player::refresh_strategy`].
pub fn regret_matching(cumulative: &[f64]) -> Vec<f64> {
    let positive: f64 = cumulative.iter().filter(|&&r| r > 0.0).sum();
    if positive <= 0.0 {
        return vec![0.0; cumulative.len()];
    }
    cumulative
        .iter()
        .map(|&r| if r > 0.0 { r / positive } else { 0.0 })
        .collect()
}
