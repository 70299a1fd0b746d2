// Library entry so integration tests can reference internal modules.
pub mod commands;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod game;
pub mod handler;
pub mod league;
pub mod logging;
pub mod model;
pub mod services;

pub use model::AppState;
