//! Implements the run logic for the `/evaluate` command.

use super::ui::{create_evaluation_embed, parse_survival_overrides};
use crate::commands::{admin_state, defer, int_option, respond, str_option};
use crate::error::GameError;
use crate::league::evaluate_game;
use serenity::builder::EditInteractionResponse;
use serenity::model::application::CommandInteraction;
use serenity::prelude::*;
use tracing::error;

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    defer(ctx, interaction, false).await;
    let Some(app_state) = admin_state(ctx, interaction).await else {
        return;
    };
    let options = &interaction.data.options;
    let (Some(game_id), Some(days)) = (
        int_option(options, "game_id").and_then(|v| i32::try_from(v).ok()),
        int_option(options, "days").and_then(|v| i32::try_from(v).ok()),
    ) else {
        respond(ctx, interaction, "Invalid game id or day count.").await;
        return;
    };
    let overrides = match parse_survival_overrides(str_option(options, "survived").unwrap_or("")) {
        Ok(overrides) => overrides,
        Err(token) => {
            respond(
                ctx,
                interaction,
                format!("Could not read `{token}`; use `@player=days`."),
            )
            .await;
            return;
        }
    };

    match evaluate_game(app_state.store.as_ref(), game_id, days, &overrides).await {
        Ok(evaluation) => {
            let builder = EditInteractionResponse::new().embed(create_evaluation_embed(&evaluation));
            interaction.edit_response(&ctx.http, builder).await.ok();
        }
        Err(GameError::InvalidPlayingDays(days)) => {
            respond(ctx, interaction, format!("A game cannot last {days} days.")).await
        }
        Err(GameError::GameNotFound(id)) => {
            respond(ctx, interaction, format!("Game {id} does not exist.")).await
        }
        Err(GameError::InvalidTransition { from, .. }) => {
            respond(
                ctx,
                interaction,
                format!("Game {game_id} is {} and cannot be evaluated.", from.label()),
            )
            .await
        }
        Err(e) => {
            error!(command = "evaluate", game_id, error = %e, "evaluation failed");
            respond(ctx, interaction, "Evaluation failed, check logs.").await;
        }
    }
}
