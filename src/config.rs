use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::NashResult;

/// Environment variable naming the HandRanks.dat file.
pub const TABLE_ENV: &str = "NASH_TABLE";

pub const DEFAULT_TRIALS: usize = 10_000;

/// Runtime settings, read from JSON and overridden by flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HandRanks.dat path; the direct evaluator is used when unset.
    pub table: Option<PathBuf>,
    /// Monte-Carlo workers; one per rayon thread when unset.
    pub workers: Option<usize>,
    /// Base seed for the per-worker random streams.
    pub seed: Option<u64>,
    /// Default Monte-Carlo trials for the command line.
    pub trials: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            table: None,
            workers: None,
            seed: None,
            trials: DEFAULT_TRIALS,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> NashResult<Config> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Fills the table path from `NASH_TABLE` when not already set.
    pub fn with_env(mut self) -> Config {
        if self.table.is_none() {
            self.table = std::env::var_os(TABLE_ENV).map(PathBuf::from);
        }
        self
    }

    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(0) => {
                warn!("workers = 0 is not usable, running one worker");
                1
            }
            Some(n) => n,
            None => rayon::current_num_threads(),
        }
    }

    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random::<u64>)
    }
}
