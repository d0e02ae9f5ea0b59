//! # Braid
//!
//! A declarative, type-safe chat-bot command framework for Rust.
//!
//! ## Overview
//!
//! Braid turns declarative command metadata into platform-ready application
//! commands and wires short-lived event collectors to handler methods. The
//! application describes *what* its commands look like; Braid compiles that
//! description, registers it, and answers dispatch-time questions.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────────┐     ┌───────────────────────┐
//! │ Declarations │────▶│  CommandTreeBuilder │────▶│ CommandDescriptor set │──▶ platform
//! │ (metadata)   │     │  (bootstrap phase)  │     │ + CommandTree         │
//! └──────────────┘     └─────────────────────┘     └───────────────────────┘
//!        │
//!        │             ┌─────────────────────┐     ┌───────────────────────┐
//!        └────────────▶│  CollectorResolver  │────▶│ live Collectors shaped│
//!                      │  (event time)       │     │ by the incoming event │
//!                      └─────────────────────┘     └───────────────────────┘
//! ```
//!
//! - **braid-core**: descriptors, events, and the collector primitive
//! - **braid-framework**: metadata store, tree builder, collector resolver,
//!   prefix matcher
//! - **braid-runtime**: configuration, logging, and the orchestration that
//!   drives bootstrap and registration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use braid::prelude::*;
//!
//! struct MusicGateway;
//! impl CommandHandler for MusicGateway {}
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = braid::runtime::config::load_config()?;
//!     braid::runtime::logging::init_from_config(&config.logging);
//!
//!     let runtime = BraidRuntime::new(config);
//!     runtime.store().attach_command::<MusicGateway>(
//!         CommandOptions::new("music", "Music controls"),
//!     );
//!     runtime.add_command(MusicGateway, "handle").await;
//!
//!     runtime.bootstrap().await?;
//!     runtime.register_with(&my_registrar).await?;
//!     Ok(())
//! }
//! ```

pub use braid_core as core;
pub use braid_framework as framework;
pub use braid_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use braid::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use braid_runtime::{BraidConfig, BraidRuntime, RegisterCommands, RegistrationScope};

    // Declarative metadata
    pub use braid_framework::{
        CollectorRequest, CommandOptions, Include, MetadataStore, OptionParam, PrefixCommandMeta,
        SubCommandGroupSpec, SubCommandMeta,
    };

    // Handler traits and identity
    pub use braid_framework::{CollectorHandler, CommandHandler, TypeKey};

    // Descriptor and event types
    pub use braid_core::{
        ChannelType, Choice, CollectorEvent, CollectorKind, CollectorOptions, CommandDescriptor,
        CommandKind, GatewayEvent, OptionType, Snowflake,
    };
}
