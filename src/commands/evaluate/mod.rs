//! The command module for scoring a finished game.

pub mod run;
pub mod ui;

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;

pub fn register() -> CreateCommand {
    CreateCommand::new("evaluate")
        .description("Score a running or stopped game and update the league (admin only).")
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "game_id", "Game ID")
                .required(true)
                .min_int_value(1),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "days", "Days the game lasted")
                .required(true)
                .min_int_value(0),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::String,
            "survived",
            "Players who dropped out early, e.g. `@Ana=3 @Bo=5`",
        ))
}
