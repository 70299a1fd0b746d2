//! The command module for solo practice tasks.

pub mod run;

use crate::game::PracticeLevel;
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;

pub fn register() -> CreateCommand {
    let mut level = CreateCommandOption::new(CommandOptionType::String, "level", "Difficulty level")
        .required(true);
    for choice in PracticeLevel::ALL {
        level = level.add_string_choice(choice.label(), choice.choice());
    }
    CreateCommand::new("practice")
        .description("Get a random practice task of the chosen difficulty.")
        .add_option(level)
}
