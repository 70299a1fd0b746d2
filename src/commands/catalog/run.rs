//! Implements the run logic for the `/catalog` command.

use crate::commands::{admin_state, defer, respond};
use crate::services::catalog::{export_file, import_file};
use chrono::Utc;
use serenity::model::application::CommandInteraction;
use serenity::prelude::*;
use tracing::error;

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    defer(ctx, interaction, true).await;
    let Some(app_state) = admin_state(ctx, interaction).await else {
        return;
    };
    let store = app_state.store.as_ref();
    let settings = &app_state.settings;

    let content = match interaction.data.options.first().map(|o| o.name.as_str()) {
        Some("import") => match import_file(store, &settings.task_import_path).await {
            Ok(report) => report.summary(),
            Err(e) => {
                error!(command = "catalog", path = %settings.task_import_path.display(), error = %e, "import failed");
                format!("Import failed: {e}")
            }
        },
        Some("export") => {
            match export_file(store, &settings.task_export_dir, Utc::now().date_naive()).await {
                Ok(path) => format!("Tasks exported to `{}`.", path.display()),
                Err(e) => {
                    error!(command = "catalog", error = %e, "export failed");
                    format!("Export failed: {e}")
                }
            }
        }
        _ => "Use `/catalog import` or `/catalog export`.".to_string(),
    };
    respond(ctx, interaction, content).await;
}
