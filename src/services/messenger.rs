//! Discord implementation of the quest messenger.

use crate::database::models::Player;
use crate::error::DeliveryError;
use crate::game::QuestMessenger;
use async_trait::async_trait;
use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct DiscordMessenger {
    http: Arc<Http>,
    guild_id: GuildId,
    channel_id: ChannelId,
}

impl DiscordMessenger {
    pub fn new(http: Arc<Http>, guild_id: GuildId, channel_id: ChannelId) -> Self {
        Self {
            http,
            guild_id,
            channel_id,
        }
    }

    fn user_id(player: &Player) -> UserId {
        UserId::new(player.discord_id as u64)
    }
}

#[async_trait]
impl QuestMessenger for DiscordMessenger {
    async fn resolve_member(&self, player: &Player) -> Result<(), DeliveryError> {
        match self
            .guild_id
            .member(self.http.as_ref(), Self::user_id(player))
            .await
        {
            Ok(member) => {
                debug!(target = "messenger", discord_id = player.discord_id, member = %member.user.name, "member resolved");
                Ok(())
            }
            Err(e) => {
                warn!(target = "messenger", discord_id = player.discord_id, error = %e, "member lookup failed");
                Err(DeliveryError::UnknownMember {
                    discord_id: player.discord_id,
                })
            }
        }
    }

    async fn deliver(&self, player: &Player, content: &str) -> Result<(), DeliveryError> {
        Self::user_id(player)
            .direct_message(self.http.as_ref(), CreateMessage::new().content(content))
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError::Send {
                discord_id: player.discord_id,
                reason: e.to_string(),
            })
    }

    async fn announce(&self, content: &str) -> Result<i64, DeliveryError> {
        self.channel_id
            .send_message(self.http.as_ref(), CreateMessage::new().content(content))
            .await
            .map(|message| message.id.get() as i64)
            .map_err(|e| DeliveryError::Announce {
                reason: e.to_string(),
            })
    }
}
