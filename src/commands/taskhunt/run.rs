//! Implements the run logic for the `/taskhunt` command.

use crate::commands::{admin_state, defer, find_option, int_option, respond};
use crate::constants::{GAME_FAILURE_MESSAGE, MAX_PLAYERS_PER_GAME, TASK_HUNT_NAME};
use crate::database::models::{GameStatus, Player};
use crate::database::store::{GameRecordStore, PlayerStore};
use crate::game::{SetupOutcome, start_game};
use crate::services::DiscordMessenger;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serenity::model::application::CommandInteraction;
use serenity::prelude::*;
use std::collections::HashSet;
use tracing::{error, info};

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    defer(ctx, interaction, false).await;
    let Some(app_state) = admin_state(ctx, interaction).await else {
        return;
    };
    let Some(guild_id) = interaction.guild_id else {
        respond(ctx, interaction, "This command only works inside the server.").await;
        return;
    };
    let store = app_state.store.as_ref();
    let options = &interaction.data.options;

    let mut players: Vec<Player> = Vec::new();
    let mut seen = HashSet::new();
    for i in 1..=MAX_PLAYERS_PER_GAME {
        let Some(user_id) = find_option(options, &format!("player{i}")).and_then(|o| o.value.as_user_id())
        else {
            continue;
        };
        if !seen.insert(user_id) {
            continue;
        }
        let hours = int_option(options, &format!("hours{i}")).unwrap_or(0).max(0);
        let name = interaction
            .data
            .resolved
            .users
            .get(&user_id)
            .map(|u| u.global_name.clone().unwrap_or_else(|| u.name.clone()))
            .unwrap_or_else(|| user_id.to_string());
        match store.upsert_player(user_id.get() as i64, &name, hours).await {
            Ok(player) => players.push(player),
            Err(e) => {
                error!(command = "taskhunt", discord_id = user_id.get(), error = %e, "player upsert failed");
                respond(ctx, interaction, GAME_FAILURE_MESSAGE).await;
                return;
            }
        }
    }

    let player_ids: Vec<i32> = players.iter().map(|p| p.player_id).collect();
    let game = match store.create_game(TASK_HUNT_NAME, &player_ids).await {
        Ok(game) => game,
        Err(e) => {
            error!(command = "taskhunt", error = %e, "game creation failed");
            respond(ctx, interaction, GAME_FAILURE_MESSAGE).await;
            return;
        }
    };
    info!(command = "taskhunt", game_id = game.game_id, players = players.len(), "game created");

    let messenger = DiscordMessenger::new(ctx.http.clone(), guild_id, interaction.channel_id);
    let mut rng = StdRng::from_entropy();
    let outcome = start_game(
        store,
        &messenger,
        &app_state.settings.game,
        &game,
        players,
        &mut rng,
    )
    .await;

    let content = match outcome {
        SetupOutcome::Ready(assignments) => format!(
            "{} Game {} is running. {} players received their quests.",
            GameStatus::Running.icon(),
            game.game_id,
            assignments.len()
        ),
        SetupOutcome::Failed { .. } => GAME_FAILURE_MESSAGE.to_string(),
    };
    respond(ctx, interaction, content).await;
}
