//! Config command implementation.

use crate::config::Config;
use crate::error::Result;

/// Execute the config command: print the effective configuration as TOML.
pub fn execute_config(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
