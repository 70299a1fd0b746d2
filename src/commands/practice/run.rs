//! Implements the run logic for the `/practice` command.

use crate::commands::{app_state, defer, respond, str_option};
use crate::game::{PracticeLevel, practice_task};
use serenity::model::application::CommandInteraction;
use serenity::prelude::*;

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    defer(ctx, interaction, true).await;
    let Some(app_state) = app_state(ctx, interaction).await else {
        return;
    };
    let Some(level) = str_option(&interaction.data.options, "level").and_then(PracticeLevel::from_choice)
    else {
        respond(ctx, interaction, "Unknown difficulty level.").await;
        return;
    };

    let content = match practice_task(app_state.store.as_ref(), level).await {
        Some(task) => format!(
            "Practice task ({}):\n**{}**: {}",
            level.label(),
            task.name,
            task.description
        ),
        None => format!("No {} practice tasks are available right now.", level.choice()),
    };
    respond(ctx, interaction, content).await;
}
