//! Config command implementation

use anyhow::{anyhow, Result};

use crate::config::{default_config_path, save_config, Config};

/// Print the effective configuration, optionally saving it as the default
pub fn show_config(config: &Config, write: bool) -> Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    if write {
        let path = default_config_path().ok_or_else(|| anyhow!("no home directory"))?;
        save_config(config, &path)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
