use anyhow::Context;
use skirmish_core::RegistryConfig;
use std::fs;
use std::path::Path;

/// Reads registry settings from a TOML file, defaults when no file is given.
pub fn load(path: Option<&Path>) -> anyhow::Result<RegistryConfig> {
    let Some(path) = path else {
        return Ok(RegistryConfig::default());
    };

    let text =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    parse(&text).with_context(|| format!("parsing config {}", path.display()))
}

pub fn parse(text: &str) -> anyhow::Result<RegistryConfig> {
    let config: RegistryConfig = toml::from_str(text)?;
    config.game.validate()?;
    Ok(config)
}
