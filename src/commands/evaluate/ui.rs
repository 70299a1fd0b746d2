//! Input parsing and result rendering for the `/evaluate` command.

use crate::league::Evaluation;
use serenity::builder::CreateEmbed;
use std::collections::HashMap;

/// Reads `<@id>=days` tokens separated by whitespace. Returns the first
/// unreadable token as the error.
pub fn parse_survival_overrides(input: &str) -> Result<HashMap<i64, i32>, String> {
    let mut overrides = HashMap::new();
    for token in input.split_whitespace() {
        let parsed = token.split_once('=').and_then(|(mention, days)| {
            let id = mention
                .trim_start_matches("<@")
                .trim_start_matches('!')
                .trim_end_matches('>')
                .parse::<i64>()
                .ok()?;
            let days = days.parse::<i32>().ok().filter(|d| *d >= 0)?;
            Some((id, days))
        });
        match parsed {
            Some((id, days)) => {
                overrides.insert(id, days);
            }
            None => return Err(token.to_string()),
        }
    }
    Ok(overrides)
}

pub fn create_evaluation_embed(evaluation: &Evaluation) -> CreateEmbed {
    let lines: Vec<String> = evaluation
        .standings
        .iter()
        .map(|(participant, rank)| {
            format!(
                "**{}**. <@{}> - {} quests, {} days, `{} pts`",
                rank.placement, participant.discord_id, participant.completed, rank.survived, rank.points
            )
        })
        .collect();

    CreateEmbed::new()
        .title(format!(
            "🏁 Game {} \"{}\" finished after {} days",
            evaluation.game.game_id, evaluation.game.name, evaluation.game.playing_days
        ))
        .description(lines.join("\n"))
        .footer(serenity::builder::CreateEmbedFooter::new(format!(
            "League table updated ({} players).",
            evaluation.league_rows
        )))
        .color(0x2ECC71)
}
