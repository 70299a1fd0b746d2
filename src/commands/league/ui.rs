//! Handles the UI creation for the `/league` command.

use crate::database::models::LeagueStanding;
use serenity::builder::CreateEmbed;

pub fn create_league_embed(standings: &[LeagueStanding]) -> CreateEmbed {
    let lines: Vec<String> = standings
        .iter()
        .map(|entry| {
            let medal = match entry.rank {
                1 => "🥇",
                2 => "🥈",
                3 => "🥉",
                _ => "🔹",
            };
            format!(
                "{} **{}**. <@{}> - `{} pts`, `{} days survived`",
                medal, entry.rank, entry.discord_id, entry.points, entry.survived
            )
        })
        .collect();

    let description = if lines.is_empty() {
        "No games have been evaluated yet.".to_string()
    } else {
        lines.join("\n")
    };

    CreateEmbed::new()
        .title("Task Hunt League")
        .description(description)
        .color(0xFFD700) // Gold
}
