//! Configuration validation.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{BraidConfig, LogOutput};

/// Validates a loaded configuration.
///
/// Checks cross-field constraints figment cannot express: file logging needs
/// a path, the prefix must be non-empty, and guild scopes must be unique.
pub fn validate_config(config: &BraidConfig) -> ConfigResult<()> {
    if config.logging.output == LogOutput::File && config.logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.output is \"file\" but logging.file_path is not set",
        ));
    }

    if config.prefix.prefix.is_empty() {
        return Err(ConfigError::validation("prefix.prefix must not be empty"));
    }

    let mut seen = HashSet::new();
    for guild in &config.registration.guilds {
        if !seen.insert(guild) {
            return Err(ConfigError::validation(format!(
                "duplicate guild in registration.guilds: {guild}"
            )));
        }
    }

    if !config.registration.global && config.registration.guilds.is_empty() {
        return Err(ConfigError::validation(
            "registration targets no scope: enable registration.global or list guilds",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::Snowflake;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&BraidConfig::default()).is_ok());
    }

    #[test]
    fn file_output_requires_a_path() {
        let mut config = BraidConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("/var/log/braid.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn registration_must_target_at_least_one_scope() {
        let mut config = BraidConfig::default();
        config.registration.global = false;
        assert!(validate_config(&config).is_err());

        config.registration.guilds.push(Snowflake(7));
        assert!(validate_config(&config).is_ok());

        config.registration.guilds.push(Snowflake(7));
        assert!(validate_config(&config).is_err());
    }
}
