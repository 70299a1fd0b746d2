//! The command module for starting a task hunt game.

pub mod run;

use crate::constants::MAX_PLAYERS_PER_GAME;
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;

pub fn register() -> CreateCommand {
    let mut command = CreateCommand::new("taskhunt")
        .description("Start a task hunt game and send every player their quests.");
    for i in 1..=MAX_PLAYERS_PER_GAME {
        command = command.add_option(
            CreateCommandOption::new(CommandOptionType::User, format!("player{i}"), format!("Player {i}"))
                .required(i == 1),
        );
    }
    for i in 1..=MAX_PLAYERS_PER_GAME {
        command = command.add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                format!("hours{i}"),
                format!("Playing hours of player {i} (keeps the stored value when omitted)"),
            )
            .min_int_value(0),
        );
    }
    command
}
