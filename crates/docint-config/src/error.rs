//! Configuration errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the config file failed at the filesystem level.
    #[error("Config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not valid TOML.
    #[error("Malformed config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No per-user config directory could be determined on this platform.
    #[error("No configuration directory available")]
    NoConfigDir,

    /// The file parsed, but the values cannot drive the pipeline. Checked
    /// by `Config::validate` before any command uses them.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
