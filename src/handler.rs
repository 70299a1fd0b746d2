use crate::commands;
use serenity::async_trait;
use serenity::client::Context;
use serenity::model::application::Interaction;
use serenity::model::{gateway::Ready, id::GuildId};
use serenity::prelude::EventHandler;
use tracing::{debug, error, info};

pub struct Handler {
    pub allowed_guild_id: GuildId,
}

#[async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        if command.guild_id != Some(self.allowed_guild_id) {
            debug!(command = %command.data.name, "ignoring command from another guild");
            return;
        }
        match command.data.name.as_str() {
            "taskhunt" => commands::taskhunt::run::run_slash(&ctx, &command).await,
            "practice" => commands::practice::run::run_slash(&ctx, &command).await,
            "league" => commands::league::run::run_slash(&ctx, &command).await,
            "gamestatus" => commands::gamestatus::run::run_slash(&ctx, &command).await,
            "complete" => commands::complete::run::run_slash(&ctx, &command).await,
            "evaluate" => commands::evaluate::run::run_slash(&ctx, &command).await,
            "catalog" => commands::catalog::run::run_slash(&ctx, &command).await,
            other => debug!(command = other, "unknown command"),
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "connected and ready");
        let commands_to_register = vec![
            commands::taskhunt::register(),
            commands::practice::register(),
            commands::league::register(),
            commands::gamestatus::register(),
            commands::complete::register(),
            commands::evaluate::register(),
            commands::catalog::register(),
        ];
        match self
            .allowed_guild_id
            .set_commands(&ctx.http, commands_to_register)
            .await
        {
            Ok(registered) => info!(count = registered.len(), "registered guild commands"),
            Err(e) => error!(error = %e, "error creating guild commands"),
        }
    }
}
