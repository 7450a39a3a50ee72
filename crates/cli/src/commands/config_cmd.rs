//! `hashnav config`: Print the effective configuration.

use std::path::Path;

use hashnav_config::RouterConfig;

use super::CommandResult;

pub async fn run(config_path: Option<&Path>, default: bool) -> CommandResult {
    if default {
        print!("{}", RouterConfig::default_toml());
        return Ok(());
    }

    let config = RouterConfig::load(config_path)?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
