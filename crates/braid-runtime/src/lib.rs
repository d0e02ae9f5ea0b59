//! Braid Runtime - Orchestration layer for the Braid command framework.
//!
//! This crate provides:
//! - Runtime orchestration (`BraidRuntime`)
//! - TOML/environment configuration loading (`ConfigLoader`)
//! - Logging configuration (`LoggingBuilder`)
//! - The platform registration seam (`RegisterCommands`)
//!
//! ```ignore
//! use braid_runtime::{BraidRuntime, config::load_config, logging};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let runtime = BraidRuntime::new(config);
//!     // Attach metadata and handlers, then:
//!     runtime.bootstrap().await?;
//!     runtime.register_with(&my_registrar).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod registrar;
pub mod runtime;

// Re-exports
pub use config::{BraidConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig};
pub use error::{BootstrapError, BootstrapResult};
pub use logging::LoggingBuilder;
pub use registrar::{RegisterCommands, RegisterError, RegistrationScope};
pub use runtime::BraidRuntime;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
