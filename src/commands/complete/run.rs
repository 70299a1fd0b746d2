//! Implements the run logic for the `/complete` command.

use crate::commands::{app_state, defer, int_option, respond};
use crate::constants::QUEST_MARKERS;
use crate::database::models::GameStatus;
use crate::database::store::{GameRecordStore, PlayerStore};
use crate::error::StoreError;
use crate::model::AppState;
use serenity::model::application::CommandInteraction;
use serenity::prelude::*;
use tracing::{error, info};

async fn complete(
    app_state: &AppState,
    discord_id: i64,
    name: &str,
    game_id: i32,
    position: i32,
) -> Result<String, StoreError> {
    let store = app_state.store.as_ref();
    let Some(game) = store.get_game(game_id).await? else {
        return Ok(format!("Game {game_id} does not exist."));
    };
    if game.status != GameStatus::Running {
        return Ok(format!(
            "Game {game_id} is {}, quests can only be completed while it runs.",
            game.status.label()
        ));
    }
    // Zero hours keeps whatever is stored.
    let player = store.upsert_player(discord_id, name, 0).await?;
    let Some(association) = store.association(game_id, player.player_id).await? else {
        return Ok(format!("You are not playing in game {game_id}."));
    };
    let marker = usize::try_from(position - 1)
        .ok()
        .and_then(|i| QUEST_MARKERS.get(i))
        .copied()
        .unwrap_or("?");
    match store.complete_quest(association.association_id, position).await? {
        Some(_) => {
            info!(command = "complete", game_id, player_id = player.player_id, position, "quest completed");
            Ok(format!("{marker} Quest completed, well done!"))
        }
        None => Ok(format!("{marker} There is no open quest with that number.")),
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    defer(ctx, interaction, true).await;
    let Some(app_state) = app_state(ctx, interaction).await else {
        return;
    };
    let options = &interaction.data.options;
    let (Some(game_id), Some(position)) = (
        int_option(options, "game_id").and_then(|v| i32::try_from(v).ok()),
        int_option(options, "quest").and_then(|v| i32::try_from(v).ok()),
    ) else {
        respond(ctx, interaction, "Invalid game id or quest number.").await;
        return;
    };

    let user = &interaction.user;
    let name = user.global_name.clone().unwrap_or_else(|| user.name.clone());
    let content = match complete(&app_state, user.id.get() as i64, &name, game_id, position).await {
        Ok(content) => content,
        Err(e) => {
            error!(command = "complete", game_id, error = %e, "quest completion failed");
            "Could not record the quest, check logs.".to_string()
        }
    };
    respond(ctx, interaction, content).await;
}
