//! # Braid Core
//!
//! Platform-facing data model for the Braid command framework.
//!
//! This crate defines the vocabulary the higher layers speak:
//!
//! - [`descriptor`] — the application-command registration payload
//!   (commands, subcommand groups, subcommands, flat options)
//! - [`event`] — gateway events as a tagged union with an explicit kind tag
//! - [`collector`] — short-lived collectors, their options, and lifecycle
//!   signals
//!
//! No network I/O happens here; descriptors are produced for an external
//! registration collaborator and collectors are handed to the platform's own
//! lifecycle.

pub mod collector;
pub mod descriptor;
pub mod event;

pub use collector::{
    CollectedItem, Collector, CollectorEvent, CollectorKind, CollectorOptions, CollectorPayload,
    CollectorTarget, FilterFn, ListenerFn,
};
pub use descriptor::{
    ChannelType, Choice, ChoiceValue, CommandDescriptor, CommandKind, CommandOption,
    OptionDescriptor, OptionShape, OptionType, SubCommandDescriptor, SubCommandGroupDescriptor,
};
pub use event::{EventKind, GatewayEvent, Interaction, Message, Reaction, Snowflake};
