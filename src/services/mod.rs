pub mod catalog;
pub mod messenger;

pub use messenger::DiscordMessenger;
