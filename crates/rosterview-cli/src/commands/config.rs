//! Configuration commands.

use std::path::Path;

use crate::config::RosterConfig;
use crate::error::CliResult;

/// Dump the current configuration to stdout, masking plain-text passwords.
pub fn dump(config: &RosterConfig, path: &Path) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(&config.redacted())?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration and the credentials it points at.
pub fn validate(config: &RosterConfig) -> CliResult<()> {
    config.validate()?;
    config.resolve_credentials()?;
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> CliResult<()> {
    println!("config: {}", path.display());
    Ok(())
}
