//! Process bootstrap: tracing, configuration and metrics.

use tracing::Level;

pub mod config;
pub mod metrics;

pub use config::{AppConfig, ConfigError};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .try_init();
}
