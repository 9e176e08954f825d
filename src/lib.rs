pub mod cards;
pub mod category;
pub mod cfr;
pub mod cli;
pub mod comb;
pub mod config;
pub mod display;
pub mod equity;
pub mod error;
pub mod game_tree;
pub mod hand_evaluator;
pub mod lookup_eval;
pub mod lottery;
