//! Shared state stored in Serenity's global `TypeMap`.

use crate::config::Settings;
use crate::database::PgGameStore;
use serenity::gateway::ShardManager;
use serenity::prelude::TypeMapKey;
use std::sync::Arc;

/// A container for the ShardManager, allowing it to be stored in the global context.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

/// The central, shared state of the application.
pub struct AppState {
    pub store: Arc<PgGameStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub async fn from_ctx(ctx: &serenity::prelude::Context) -> Option<Arc<Self>> {
        ctx.data.read().await.get::<AppState>().cloned()
    }
}

impl TypeMapKey for AppState {
    type Value = Arc<AppState>;
}
