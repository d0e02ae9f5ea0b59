//! Configuration module for the Braid runtime.
//!
//! Provides TOML- and environment-based configuration loading and validation
//! for logging, command registration scoping, and prefix commands.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BraidConfig, LogFormat, LogOutput, LoggingConfig, PrefixConfig, RegistrationConfig,
};
pub use validation::validate_config;
