// src/commands/mod.rs
// Slash commands and the small helpers they share.

pub mod catalog;
pub mod complete;
pub mod evaluate;
pub mod gamestatus;
pub mod league;
pub mod practice;
pub mod taskhunt;

use crate::model::AppState;
use serenity::builder::{
    CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::model::application::{CommandDataOption, CommandInteraction};
use serenity::prelude::*;
use std::sync::Arc;
use tracing::warn;

pub(crate) async fn defer(ctx: &Context, interaction: &CommandInteraction, ephemeral: bool) {
    interaction
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(ephemeral),
            ),
        )
        .await
        .ok();
}

/// Replaces the deferred response with `content`.
pub(crate) async fn respond(ctx: &Context, interaction: &CommandInteraction, content: impl Into<String>) {
    interaction
        .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
        .await
        .ok();
}

pub(crate) fn find_option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a CommandDataOption> {
    options.iter().find(|o| o.name == name)
}

pub(crate) fn int_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    find_option(options, name).and_then(|o| o.value.as_i64())
}

pub(crate) fn str_option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a str> {
    find_option(options, name).and_then(|o| o.value.as_str())
}

/// Loads the app state, answering the interaction itself when it is missing.
pub(crate) async fn app_state(ctx: &Context, interaction: &CommandInteraction) -> Option<Arc<AppState>> {
    let state = AppState::from_ctx(ctx).await;
    if state.is_none() {
        warn!(command = %interaction.data.name, "missing_app_state");
        respond(ctx, interaction, "Internal error: missing app state").await;
    }
    state
}

/// Like [`app_state`], but also rejects users outside the admin list.
pub(crate) async fn admin_state(ctx: &Context, interaction: &CommandInteraction) -> Option<Arc<AppState>> {
    let state = app_state(ctx, interaction).await?;
    if !state.settings.is_admin(interaction.user.id.get()) {
        respond(ctx, interaction, "You are not permitted to use this command.").await;
        return None;
    }
    Some(state)
}
