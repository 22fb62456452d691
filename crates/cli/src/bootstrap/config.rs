use listwarden_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(config_path: &str, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(Some(config_path), cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Logged once the subscriber is installed.
pub fn log_config(config_path: &str, config: &Config) {
    info!(
        config_file = config_path,
        data_dir = %config.filtering.data_dir,
        update_interval_hours = config.filtering.update_interval_hours,
        blocklists = config.filtering.filters.len(),
        allowlists = config.filtering.whitelist_filters.len(),
        filtering_enabled = config.filtering.enabled,
        "Configuration loaded"
    );
}
