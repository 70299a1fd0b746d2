//! Runtime settings, read from `TT_*` environment variables (a `.env` file is
//! honoured). Values are validated here so the game core can trust them.

use crate::constants::DIFFICULTY_BANDS;
use crate::error::ConfigError;
use crate::league::RankWeights;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// The slice of configuration the ranking and quest core consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub weights: RankWeights,
    /// Upper bound on quests handed to one player.
    pub num_quests: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            weights: RankWeights::default(),
            num_quests: DIFFICULTY_BANDS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("TT_WEIGHTED_HOURS_G1", self.weights.hours),
            ("TT_WEIGHTED_LEAGUE_POS_G1", self.weights.league_position),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    key,
                    value: value.to_string(),
                });
            }
        }
        if !(1..=DIFFICULTY_BANDS).contains(&self.num_quests) {
            return Err(ConfigError::Invalid {
                key: "TT_NUM_QUESTS",
                value: self.num_quests.to_string(),
            });
        }
        if self.weights.max_rank() > 1.0 {
            warn!(
                target = "config",
                sum = self.weights.max_rank(),
                "rank weights sum above 1.0; ceilings may exceed the rating scale"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub guild_id: u64,
    pub database_url: String,
    pub game: GameConfig,
    pub task_import_path: PathBuf,
    pub task_export_dir: PathBuf,
    pub log_dir: String,
    pub log_file: String,
    pub log_level: String,
    /// Users allowed to run administrative commands; empty allows everyone.
    pub admin_ids: Vec<u64>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let game = GameConfig {
            weights: RankWeights {
                hours: parsed(&lookup, "TT_WEIGHTED_HOURS_G1", 0.6)?,
                league_position: parsed(&lookup, "TT_WEIGHTED_LEAGUE_POS_G1", 0.4)?,
            },
            num_quests: parsed(&lookup, "TT_NUM_QUESTS", DIFFICULTY_BANDS)?,
        };
        game.validate()?;

        let admin_ids = match lookup("TT_ADMIN_IDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u64>().map_err(|_| ConfigError::Invalid {
                        key: "TT_ADMIN_IDS",
                        value: s.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            discord_token: required(&lookup, "TT_DISCORD_TOKEN")?,
            guild_id: parse_value("TT_GUILD_ID", required(&lookup, "TT_GUILD_ID")?)?,
            database_url: required(&lookup, "TT_DATABASE_URL")?,
            game,
            task_import_path: lookup("TT_TASK_IMPORT_PATH")
                .unwrap_or_else(|| "files/tasks.json".to_string())
                .into(),
            task_export_dir: lookup("TT_TASK_EXPORT_DIR")
                .unwrap_or_else(|| "files".to_string())
                .into(),
            log_dir: lookup("TT_LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_file: lookup("TT_LOG_FILE").unwrap_or_else(|| "taskhunt.log".to_string()),
            log_level: lookup("TT_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            admin_ids,
        })
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.is_empty() || self.admin_ids.contains(&user_id)
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => parse_value(key, raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}
