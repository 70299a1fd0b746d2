//! This module acts as a central hub for all database-related logic.
//! The core only talks to the traits in `store`; `postgres` backs the bot and
//! `memory` backs the tests.

pub mod init;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgGameStore;
pub use store::{GameRecordStore, GameStore, LeagueStore, PlayerStore, TaskCatalogStore};
