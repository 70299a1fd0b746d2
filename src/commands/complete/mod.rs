//! The command module for reporting a finished quest.

pub mod run;

use crate::constants::DIFFICULTY_BANDS;
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;

pub fn register() -> CreateCommand {
    CreateCommand::new("complete")
        .description("Mark one of your quests in a running game as completed.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "game_id", "Game ID")
                .required(true)
                .min_int_value(1),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "quest", "Quest number")
                .required(true)
                .min_int_value(1)
                .max_int_value(DIFFICULTY_BANDS as u64),
        )
}
