//! Ranking and league bookkeeping.

pub mod evaluation;
pub mod rank;
pub mod stats;
pub mod table;

pub use evaluation::{Evaluation, evaluate_game};
pub use rank::{RankWeights, player_rank, rank, rating_ceiling};
pub use stats::{GameStats, compute_stats};
pub use table::{build_league_table, regenerate_league_table};
