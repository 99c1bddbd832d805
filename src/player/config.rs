// Configuration management
//
// Handles player configuration and settings persistence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;

/// Default configuration file path
const CONFIG_FILE: &str = "nsf_config.toml";

/// Errors raised while reading or writing the configuration file
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error on the configuration file
    Io(io::Error),

    /// The file exists but is not valid TOML for this configuration
    Parse(toml::de::Error),

    /// The configuration could not be encoded as TOML
    Encode(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "malformed configuration: {}", e),
            ConfigError::Encode(e) => write!(f, "could not encode configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Encode(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Encode(e)
    }
}

/// Player configuration
///
/// Stores all user-configurable settings for the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Output sample rate in Hz (44100 or 48000)
    pub sample_rate: u32,

    /// Audio buffer duration in milliseconds (affects latency)
    pub buffer_duration_ms: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            sample_rate: 48000,
            buffer_duration_ms: 50,
        }
    }
}

impl PlayerConfig {
    /// Load the configuration, falling back to defaults
    ///
    /// A missing file is seeded with the defaults so the user has something
    /// to edit; a malformed file is reported and left untouched.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                let config = PlayerConfig::default();
                if let Err(e) = config.save() {
                    eprintln!("Could not create {}: {}", CONFIG_FILE, e);
                }
                config
            }
            Err(e) => {
                eprintln!("Ignoring {}: {}", CONFIG_FILE, e);
                PlayerConfig::default()
            }
        }
    }

    /// Load the configuration file
    pub fn load() -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(CONFIG_FILE)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save the configuration file
    pub fn save(&self) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(CONFIG_FILE, contents)?;
        Ok(())
    }
}
