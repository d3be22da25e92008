//! Command handlers.

pub mod list;
pub mod show;
pub mod watch;

use std::sync::Arc;

use parkwatch_api::FeedClient;
use parkwatch_config::Config;
use parkwatch_core::{EngineConfig, SyncEngine};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the config file and layer CLI flag overrides on top.
pub fn resolve_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut config = Config::load(global.config.as_deref())?;

    if let Some(ref endpoint) = global.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    if let Some(ref key) = global.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(timeout) = global.timeout {
        config.timeout_secs = timeout;
    }
    if global.insecure {
        config.insecure = true;
    }

    Ok(config)
}

/// Build a sync engine from resolved configuration.
pub fn build_engine(config: &Config, engine_config: EngineConfig) -> Result<SyncEngine, CliError> {
    let endpoint = config.endpoint()?;
    let client = FeedClient::new(endpoint.as_str(), &config.transport())?;
    Ok(SyncEngine::new(Arc::new(client), engine_config))
}
