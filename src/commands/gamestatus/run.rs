//! Implements the run logic for the `/gamestatus` command.

use crate::commands::{admin_state, app_state, defer, int_option, respond, str_option};
use crate::database::models::{Game, GameStatus};
use crate::database::store::GameRecordStore;
use crate::error::GameError;
use crate::game::transition_game;
use serenity::model::application::CommandInteraction;
use serenity::prelude::*;
use tracing::error;

fn describe(game: &Game) -> String {
    let targets: Vec<&str> = game
        .status
        .manual_targets()
        .into_iter()
        .map(GameStatus::label)
        .collect();
    let next = if targets.is_empty() {
        "none".to_string()
    } else {
        targets.join(", ")
    };
    format!(
        "{} Game {} \"{}\" is {}. Possible changes: {}.",
        game.status.icon(),
        game.game_id,
        game.name,
        game.status.label(),
        next
    )
}

async fn list_open_games(ctx: &Context, interaction: &CommandInteraction) {
    let Some(app_state) = app_state(ctx, interaction).await else {
        return;
    };
    let open: Vec<GameStatus> = GameStatus::ALL
        .into_iter()
        .filter(|s| !s.is_terminal())
        .collect();
    let content = match app_state.store.games_with_status(&open).await {
        Ok(games) if games.is_empty() => "There are no open games.".to_string(),
        Ok(games) => games.iter().map(describe).collect::<Vec<_>>().join("\n"),
        Err(e) => {
            error!(command = "gamestatus", error = %e, "could not list games");
            "Could not load the games, check logs.".to_string()
        }
    };
    respond(ctx, interaction, content).await;
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    defer(ctx, interaction, true).await;
    let options = &interaction.data.options;
    let Some(game_id) = int_option(options, "game_id") else {
        list_open_games(ctx, interaction).await;
        return;
    };
    let Ok(game_id) = i32::try_from(game_id) else {
        respond(ctx, interaction, "Invalid game id.").await;
        return;
    };

    let Some(target) = str_option(options, "status") else {
        let Some(app_state) = app_state(ctx, interaction).await else {
            return;
        };
        let content = match app_state.store.get_game(game_id).await {
            Ok(Some(game)) => describe(&game),
            Ok(None) => format!("Game {game_id} does not exist."),
            Err(e) => {
                error!(command = "gamestatus", game_id, error = %e, "could not load game");
                "Could not load the game, check logs.".to_string()
            }
        };
        respond(ctx, interaction, content).await;
        return;
    };

    let Some(app_state) = admin_state(ctx, interaction).await else {
        return;
    };
    let Some(target) = GameStatus::from_label(target) else {
        respond(ctx, interaction, "Unknown status.").await;
        return;
    };

    let content = match transition_game(app_state.store.as_ref(), game_id, target).await {
        Ok(game) => describe(&game),
        Err(GameError::EvaluationRequired) => {
            "A game is finished by evaluating it with /evaluate.".to_string()
        }
        Err(GameError::InvalidTransition { from, to }) => format!(
            "Game {game_id} cannot move from {} to {}.",
            from.label(),
            to.label()
        ),
        Err(GameError::GameNotFound(id)) => format!("Game {id} does not exist."),
        Err(e) => {
            error!(command = "gamestatus", game_id, error = %e, "status change failed");
            "Could not change the status, check logs.".to_string()
        }
    };
    respond(ctx, interaction, content).await;
}
