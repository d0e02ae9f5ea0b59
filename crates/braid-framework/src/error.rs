//! Error types for the Braid framework.
//!
//! Bootstrap-time failures (tree building, metadata resolution) are real
//! errors and propagate to the registration driver. Dispatch-time
//! incompatibilities are *not* represented here — an event that doesn't fit
//! a collector is expected and shows up as absence in the result sequence.

use thiserror::Error;

/// Errors raised while compiling a command's declarative metadata into a
/// descriptor. Any of these aborts the whole command's registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A type referenced in an `include` list carries no subcommand
    /// metadata.
    #[error("included type `{type_name}` does not carry sub-command metadata")]
    InvalidSubCommand {
        /// Name of the offending type.
        type_name: &'static str,
    },

    /// A referenced subcommand type has no registered handler instance.
    #[error("no handler instance registered for `{type_name}`")]
    UnknownHandler {
        /// Name of the unresolved type.
        type_name: &'static str,
    },
}

/// Result type for command-tree building.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while resolving collector declarations at bootstrap.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectorError {
    /// A declared collector type was never attached collector metadata.
    #[error("collector type `{type_name}` has no collector metadata attached")]
    MissingMetadata {
        /// Name of the offending type.
        type_name: &'static str,
    },
}

/// Result type for collector resolution.
pub type CollectorResult<T> = Result<T, CollectorError>;
