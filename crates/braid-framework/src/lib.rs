//! # Braid Framework
//!
//! The declarative layer of Braid: handler metadata, command-tree building,
//! and collector resolution.
//!
//! This layer provides:
//! - Annotation payloads and the [`MetadataStore`] they live in
//! - The [`CommandTreeBuilder`], compiling declarations into
//!   registration-ready descriptors and a path-addressed [`CommandTree`]
//! - The [`CollectorResolver`], turning collector declarations into live,
//!   event-shaped collectors at dispatch time
//! - The [`PrefixMatcher`] for chat-message prefix commands
//!
//! The framework layer is built on top of core types but adds the
//! declarative machinery an application wires its handlers into.

pub mod builder;
pub mod collector;
pub mod dto;
pub mod error;
pub mod handler;
pub mod metadata;
pub mod options;
pub mod prefix;
pub mod registry;
pub mod tree;

pub use builder::CommandTreeBuilder;
pub use collector::{BaseCollectorResolver, CollectorResolver};
pub use dto::{DtoFactory, DtoRef};
pub use error::{BuildError, BuildResult, CollectorError, CollectorResult};
pub use handler::{CollectorHandler, CommandHandler, HandlerId, TypeKey, instance_type_id};
pub use metadata::{
    CollectorRequest, CommandOptions, GroupOptions, Include, MetadataStore, OptionParam,
    PrefixCommandMeta, SubCommandGroupSpec, SubCommandMeta,
};
pub use options::{OptionResolver, ResolvedOption};
pub use prefix::{PrefixMatch, PrefixMatcher};
pub use registry::HandlerRegistry;
pub use tree::{CommandTree, NodeValue, TreeNode};
