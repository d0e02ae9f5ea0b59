//! Application-command registration.
//!
//! The runtime builds descriptors; pushing them to the platform is behind
//! the [`RegisterCommands`] trait so transports and tests can supply their
//! own implementation.

use async_trait::async_trait;
use thiserror::Error;

use braid_core::{CommandDescriptor, Snowflake};

/// Scope a command set is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationScope {
    /// Platform-wide registration.
    Global,
    /// Registration limited to one guild.
    Guild(Snowflake),
}

impl std::fmt::Display for RegistrationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Guild(guild) => write!(f, "guild {guild}"),
        }
    }
}

/// Errors raised while pushing commands to the platform.
#[derive(Debug, Clone, Error)]
pub enum RegisterError {
    /// The platform rejected a command in the set.
    #[error("platform rejected command `{command}`: {message}")]
    Rejected {
        /// Name of the rejected command.
        command: String,
        /// Platform-supplied reason.
        message: String,
    },

    /// The registration request never reached the platform.
    #[error("transport failure during registration: {0}")]
    Transport(String),
}

/// Pushes built command descriptors to the platform.
#[async_trait]
pub trait RegisterCommands: Send + Sync {
    /// Registers the command set in a scope.
    async fn register(
        &self,
        scope: RegistrationScope,
        commands: &[CommandDescriptor],
    ) -> Result<(), RegisterError>;

    /// Removes every command registered in a scope.
    ///
    /// The default does nothing, for platforms where registration already
    /// replaces the previous set.
    async fn remove_all(&self, scope: RegistrationScope) -> Result<(), RegisterError> {
        let _ = scope;
        Ok(())
    }
}
