pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod ui;

pub use db::DbPool;

use config::Config;

/// Shared by every handler through `Arc<AppState>`. The pool is opened
/// once at startup and never replaced.
pub struct AppState {
    pub config: Config,
    pub db: DbPool,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        Self { config, db }
    }
}
