//! Implements the run logic for the `/league` command.

use super::ui::create_league_embed;
use crate::commands::{app_state, defer, respond};
use crate::database::store::LeagueStore;
use serenity::builder::EditInteractionResponse;
use serenity::model::application::CommandInteraction;
use serenity::prelude::*;
use tracing::error;

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    defer(ctx, interaction, false).await;
    let Some(app_state) = app_state(ctx, interaction).await else {
        return;
    };

    let standings = match app_state.store.league_standings().await {
        Ok(standings) => standings,
        Err(e) => {
            error!(command = "league", error = %e, "could not load league standings");
            respond(ctx, interaction, "The league table is unavailable right now.").await;
            return;
        }
    };

    let builder = EditInteractionResponse::new().embed(create_league_embed(&standings));
    interaction.edit_response(&ctx.http, builder).await.ok();
}
