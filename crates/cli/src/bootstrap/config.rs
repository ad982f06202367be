use dnstap_collector_domain::{CliOverrides, Config};

/// Loads the file (or defaults), applies CLI overrides, then validates the
/// result so a bad override is caught before anything binds.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}
