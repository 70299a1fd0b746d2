//! The command module for the league table.

pub mod run;
pub mod ui;

use serenity::builder::CreateCommand;

pub fn register() -> CreateCommand {
    CreateCommand::new("league").description("Show the current league table.")
}
