pub mod config;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

use crate::config::GroundingConfig;
use crate::pipeline::normalize::{self, NormalizeError};

/// Install the global tracing subscriber. `RUST_LOG` wins over
/// `config::default_log_filter()`. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Process startup: logging, then the process-wide normalizer built from
/// `settings`. A dictionary that fails to load leaves nothing installed.
pub fn init(settings: &GroundingConfig) -> Result<(), NormalizeError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let normalizer = settings.load_normalizer()?;
    if normalize::install(normalizer).is_err() {
        tracing::warn!("Normalizer already installed, keeping the existing tables");
    }
    Ok(())
}
