//! The command module for importing and exporting the task catalog.

pub mod run;

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;

pub fn register() -> CreateCommand {
    CreateCommand::new("catalog")
        .description("Manage the task catalog (admin only).")
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "import",
            "Load tasks from the configured catalog file",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "export",
            "Write every task to a dated file",
        ))
}
