//! Host adapters for the practice engine: SQLite storage, the Gemini client,
//! environment configuration and tracing.

pub mod config;
pub mod conversation;
pub mod error;
pub mod gemini;
pub mod state;
pub mod store;
pub mod telemetry;

use std::path::Path;

pub use config::HostConfig;
pub use conversation::ConversationService;
pub use error::{HostError, Result};
pub use gemini::GeminiClient;
pub use state::AppState;
pub use store::SqliteStore;

use lingo_core::content::load_lessons;
use lingo_core::LessonPlan;

/// Set up tracing, open the store and connect the model client.
pub fn bootstrap(config: &HostConfig) -> anyhow::Result<AppState> {
    telemetry::init_tracing();

    std::fs::create_dir_all(&config.data_dir)?;
    let store = SqliteStore::open(config.db_path())?;

    let model = match GeminiClient::from_config(config) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "language model disabled");
            None
        }
    };

    let state = AppState::new(store, model);
    tracing::info!(settings = ?state.settings, "practice state ready");
    Ok(state)
}

/// Read bundled lessons from a JSON file.
pub fn lessons_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<LessonPlan>> {
    let json = std::fs::read_to_string(path)?;
    Ok(load_lessons(&json)?)
}
