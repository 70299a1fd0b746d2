use std::sync::Arc;

use serenity::model::gateway::GatewayIntents;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use tracing::{error, info, warn};

use taskhunt_bot::config::Settings;
use taskhunt_bot::database::PgGameStore;
use taskhunt_bot::handler::Handler;
use taskhunt_bot::league::regenerate_league_table;
use taskhunt_bot::logging::LoggerGuard;
use taskhunt_bot::model::{AppState, ShardManagerContainer};

#[tokio::main]
async fn main() {
    let settings = Settings::from_env().expect("Invalid configuration.");
    let _logger = LoggerGuard::setup(&settings);

    let store = PgGameStore::connect(&settings.database_url)
        .await
        .expect("Could not connect to the database.");
    match regenerate_league_table(&store).await {
        Ok(rows) => info!(target = "startup", rows, "league table regenerated"),
        Err(e) => warn!(target = "startup", error = %e, "could not regenerate league table"),
    }

    let allowed_guild_id = GuildId::new(settings.guild_id);
    let app_state = Arc::new(AppState {
        store: Arc::new(store),
        settings: Arc::new(settings.clone()),
    });

    // Member lookups for quest delivery need GUILD_MEMBERS.
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

    let mut client = Client::builder(&settings.discord_token, intents)
        .event_handler(Handler { allowed_guild_id })
        .await
        .expect("Error creating the Discord client.");

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
        data.insert::<AppState>(app_state);
    }

    if let Err(why) = client.start().await {
        error!(target = "startup", error = ?why, "client error");
    }
}
