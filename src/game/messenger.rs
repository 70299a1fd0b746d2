//! Port to the chat platform used while handing out quests.

use crate::database::models::Player;
use crate::error::DeliveryError;
use async_trait::async_trait;

#[async_trait]
pub trait QuestMessenger: Send + Sync {
    /// Confirms the player can be reached on the platform.
    async fn resolve_member(&self, player: &Player) -> Result<(), DeliveryError>;

    /// Sends the player a private message.
    async fn deliver(&self, player: &Player, content: &str) -> Result<(), DeliveryError>;

    /// Posts to the channel the game was started from and returns the message id.
    async fn announce(&self, content: &str) -> Result<i64, DeliveryError>;
}
