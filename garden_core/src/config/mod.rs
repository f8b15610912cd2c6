//! Configuration loading from TOML files

mod constants;
mod garden;

pub use constants::{
    AiConstants, BattleConstants, DamageConstants, HealingConstants, InitiativeConstants,
    PoisonConstants, TimingConstants, UltimateConstants,
};
pub use garden::GardenConfig;

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load and validate battle constants from a TOML file
pub fn load_battle_constants(path: &Path) -> Result<BattleConstants, ConfigError> {
    let constants: BattleConstants = load_toml(path)?;
    constants.validate()?;
    Ok(constants)
}

/// Parse and validate battle constants from a TOML string
pub fn parse_battle_constants(content: &str) -> Result<BattleConstants, ConfigError> {
    let constants: BattleConstants = parse_toml(content)?;
    constants.validate()?;
    Ok(constants)
}

/// Load and validate the garden layout from a TOML file
pub fn load_garden_config(path: &Path) -> Result<GardenConfig, ConfigError> {
    let config: GardenConfig = load_toml(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate the garden layout from a TOML string
pub fn parse_garden_config(content: &str) -> Result<GardenConfig, ConfigError> {
    let config: GardenConfig = parse_toml(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_uses_defaults() {
        let constants = parse_battle_constants("").unwrap();
        assert_eq!(constants, BattleConstants::default());
    }

    #[test]
    fn test_parse_invalid_constants() {
        let result = parse_battle_constants("[poison]\ndamage_ratio = 2.0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_parse_malformed_toml() {
        let result = parse_garden_config("map_size = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_battle_constants(Path::new("does/not/exist.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
