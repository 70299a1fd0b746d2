//! The command module for moving a game through its lifecycle.

pub mod run;

use crate::database::models::GameStatus;
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;

pub fn register() -> CreateCommand {
    let mut status = CreateCommandOption::new(CommandOptionType::String, "status", "New status");
    for choice in GameStatus::ALL.into_iter().filter(|s| *s != GameStatus::Finished) {
        status = status.add_string_choice(choice.label(), choice.label());
    }
    CreateCommand::new("gamestatus")
        .description("List open games, show a game's status, or change it (admin only).")
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "game_id", "Game ID")
                .min_int_value(1),
        )
        .add_option(status)
}
