use crate::error::AppResult;
use crate::model::{FileStore, ModelManager};
use crate::state::AppState;
use crate::utils::Clock;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod error;
pub mod identity;
pub mod model;
pub mod progress;
pub mod state;
pub mod utils;

static APPLICATION_NAME: &str = "coursetrack";

/// Opens the configured data directory and restores the last session.
#[tracing::instrument(skip(config))]
pub fn build_state(config: &Config) -> AppResult<AppState> {
    let store = FileStore::open(config.storage().data_dir())?;
    let mm = ModelManager::new(store);
    let state = AppState::new(mm, Clock::system(), config)?;
    tracing::debug!(
        "session restored, active user: {:?}",
        state.current_user().map(|u| u.id())
    );
    Ok(state)
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}
