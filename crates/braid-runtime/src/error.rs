//! Runtime error types.

use thiserror::Error;

use braid_framework::{BuildError, CollectorError};

use crate::config::ConfigError;
use crate::registrar::RegisterError;

/// Errors that can occur while bootstrapping the runtime.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A declared handler type carries no command metadata.
    #[error("handler `{type_name}` declares no command metadata")]
    MissingCommandMetadata {
        /// Name of the offending handler type.
        type_name: &'static str,
    },

    /// A declared prefix handler type carries no prefix-command metadata.
    #[error("handler `{type_name}` declares no prefix-command metadata")]
    MissingPrefixMetadata {
        /// Name of the offending handler type.
        type_name: &'static str,
    },

    /// Command-tree building failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Collector resolution failed.
    #[error(transparent)]
    Collector(#[from] CollectorError),

    /// Pushing the built commands to the platform failed.
    #[error(transparent)]
    Register(#[from] RegisterError),
}

/// Result type for runtime bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
