//! Quest assignment and game state.

pub mod catalog;
pub mod lifecycle;
pub mod messenger;
pub mod practice;
pub mod selector;
pub mod setup;

pub use catalog::{random_tasks, tasks_by_rating_ceiling};
pub use lifecycle::transition_game;
pub use messenger::QuestMessenger;
pub use practice::{PracticeLevel, practice_task};
pub use selector::{ExclusionSet, band_index, select_balanced};
pub use setup::{
    PlayerAssignment, SetupFailure, SetupOutcome, format_game_summary, format_quest_message,
    initialize_game, start_game,
};
