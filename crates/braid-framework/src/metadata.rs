//! Declarative metadata: annotation payloads and the store that holds them.
//!
//! All declarative information lives in an explicit [`MetadataStore`],
//! populated through typed `attach_*` calls during a registration step at
//! bootstrap and read through typed getters afterwards. Consumers never
//! mutate the store.
//!
//! Writes are confined to the single-threaded bootstrap phase; dispatch-time
//! access is read-only map lookups, so a plain `RwLock` suffices.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use braid_core::{
    ChannelType, Choice, CollectorEvent, CollectorKind, CollectorOptions, CommandKind, OptionType,
};

use crate::handler::{CollectorHandler, TypeKey};

/// Payload of a command annotation.
#[derive(Clone)]
pub struct CommandOptions {
    /// Command name.
    pub name: String,
    /// Command description.
    pub description: String,
    /// Command kind; only [`CommandKind::ChatInput`] commands resolve their
    /// `include` list.
    pub kind: CommandKind,
    /// Whether the command is enabled by default.
    pub default_permission: Option<bool>,
    /// Nested subcommand and subcommand-group declarations.
    pub include: Vec<Include>,
}

impl CommandOptions {
    /// A chat-input command with no nested declarations.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: CommandKind::ChatInput,
            default_permission: None,
            include: Vec::new(),
        }
    }

    /// Sets the command kind.
    pub fn kind(mut self, kind: CommandKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the default-permission flag.
    pub fn default_permission(mut self, enabled: bool) -> Self {
        self.default_permission = Some(enabled);
        self
    }

    /// Appends an `include` entry.
    pub fn include(mut self, entry: Include) -> Self {
        self.include.push(entry);
        self
    }
}

/// One entry of a command's `include` list: either a thunk yielding a
/// subcommand-group definition, or a plain subcommand type reference.
#[derive(Clone)]
pub enum Include {
    /// Subcommand group, produced lazily so groups can be declared inline.
    Group(fn() -> SubCommandGroupSpec),
    /// Direct subcommand type.
    SubCommand(TypeKey),
}

/// Declarative definition of a subcommand group.
#[derive(Clone)]
pub struct SubCommandGroupSpec {
    /// Group name and description.
    pub options: GroupOptions,
    /// Member subcommand types; must all resolve for the group to build.
    pub sub_commands: Vec<TypeKey>,
}

/// Name and description of a subcommand group.
#[derive(Clone, Debug)]
pub struct GroupOptions {
    pub name: String,
    pub description: String,
}

/// Payload of a subcommand annotation.
#[derive(Clone, Debug)]
pub struct SubCommandMeta {
    /// Subcommand name.
    pub name: String,
    /// Subcommand description.
    pub description: String,
}

/// Payload of a DTO field option annotation.
#[derive(Clone, Debug)]
pub struct OptionParam {
    /// Option name shown to the platform.
    pub name: String,
    /// Option description.
    pub description: String,
    /// Whether the option must be supplied.
    pub required: bool,
    /// Platform option type.
    pub kind: OptionType,
}

/// Payload of a collector annotation: everything needed to construct and
/// wire one collector at event time.
#[derive(Clone)]
pub struct CollectorRequest {
    /// Which collector implementation to construct.
    pub kind: CollectorKind,
    /// Platform collector options, shallow-copied per application.
    pub options: CollectorOptions,
    /// Name of the filter method on the owning instance, if declared.
    pub filter_method: Option<String>,
    /// The collector class instance the methods are invoked on.
    pub owner: Arc<dyn CollectorHandler>,
    /// Lifecycle event to handler-method map, in declaration order.
    pub events: Vec<(CollectorEvent, String)>,
}

impl fmt::Debug for CollectorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorRequest")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("filter_method", &self.filter_method)
            .field("events", &self.events)
            .finish()
    }
}

/// Payload of a prefix-command annotation.
#[derive(Clone, Debug)]
pub struct PrefixCommandMeta {
    /// Command name matched after the prefix.
    pub name: String,
    /// Per-command prefix override; falls back to the global prefix.
    pub prefix: Option<String>,
    /// Strip the command name from the forwarded content.
    pub remove_command_name: bool,
    /// Strip the prefix from the forwarded content.
    pub remove_prefix: bool,
    /// Skip messages authored by bot accounts.
    pub ignore_bot_message: bool,
    /// Delete the triggering message after processing.
    pub remove_message: bool,
}

impl PrefixCommandMeta {
    /// Defaults: strip prefix and name, ignore bots, keep the message.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            remove_command_name: true,
            remove_prefix: true,
            ignore_bot_message: true,
            remove_message: false,
        }
    }

    /// Overrides the global prefix for this command.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

#[derive(Default)]
struct Inner {
    commands: HashMap<TypeId, CommandOptions>,
    sub_commands: HashMap<TypeId, SubCommandMeta>,
    // Field params keep first-seen order; re-attaching a field updates in place.
    option_params: HashMap<TypeId, Vec<(String, OptionParam)>>,
    choices: HashMap<(TypeId, String), Vec<Choice>>,
    channel_types: HashMap<(TypeId, String), Vec<ChannelType>>,
    collectors: HashMap<TypeId, CollectorRequest>,
    use_collectors: HashMap<(TypeId, String), Vec<TypeKey>>,
    prefix_commands: HashMap<TypeId, PrefixCommandMeta>,
}

/// Capability holding all declarative metadata, keyed by type (and method
/// name for method-scoped declarations).
#[derive(Default)]
pub struct MetadataStore {
    inner: RwLock<Inner>,
}

impl MetadataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Registration (bootstrap phase)
    // =========================================================================

    /// Attaches command metadata to the handler type `T`.
    pub fn attach_command<T: 'static>(&self, options: CommandOptions) {
        self.inner.write().commands.insert(TypeId::of::<T>(), options);
    }

    /// Attaches subcommand metadata to the handler type `T`.
    pub fn attach_sub_command<T: 'static>(&self, meta: SubCommandMeta) {
        self.inner.write().sub_commands.insert(TypeId::of::<T>(), meta);
    }

    /// Attaches an option annotation to a field of the DTO type `D`.
    ///
    /// Fields keep first-attach order; attaching the same field again
    /// replaces its payload in place.
    pub fn attach_option<D: 'static>(&self, field: impl Into<String>, param: OptionParam) {
        let field = field.into();
        let mut inner = self.inner.write();
        let params = inner.option_params.entry(TypeId::of::<D>()).or_default();
        match params.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = param,
            None => params.push((field, param)),
        }
    }

    /// Attaches a choice list to a field of the DTO type `D`.
    pub fn attach_choices<D: 'static>(&self, field: impl Into<String>, choices: Vec<Choice>) {
        self.inner
            .write()
            .choices
            .insert((TypeId::of::<D>(), field.into()), choices);
    }

    /// Attaches channel-type restrictions to a field of the DTO type `D`.
    pub fn attach_channel_types<D: 'static>(
        &self,
        field: impl Into<String>,
        kinds: Vec<ChannelType>,
    ) {
        self.inner
            .write()
            .channel_types
            .insert((TypeId::of::<D>(), field.into()), kinds);
    }

    /// Attaches collector metadata to the collector type `T`.
    pub fn attach_collector<T: 'static>(&self, request: CollectorRequest) {
        self.inner.write().collectors.insert(TypeId::of::<T>(), request);
    }

    /// Declares that a method of the handler type `T` uses the given
    /// collector types.
    pub fn attach_use_collectors<T: 'static>(
        &self,
        method: impl Into<String>,
        collectors: Vec<TypeKey>,
    ) {
        self.inner
            .write()
            .use_collectors
            .insert((TypeId::of::<T>(), method.into()), collectors);
    }

    /// Attaches prefix-command metadata to the handler type `T`.
    pub fn attach_prefix_command<T: 'static>(&self, meta: PrefixCommandMeta) {
        self.inner
            .write()
            .prefix_commands
            .insert(TypeId::of::<T>(), meta);
    }

    // =========================================================================
    // Typed getters (read-only)
    // =========================================================================

    /// Command metadata for a handler type, if attached.
    pub fn command_metadata(&self, type_id: TypeId) -> Option<CommandOptions> {
        self.inner.read().commands.get(&type_id).cloned()
    }

    /// Subcommand metadata for a handler type, if attached.
    pub fn sub_command_metadata(&self, type_id: TypeId) -> Option<SubCommandMeta> {
        self.inner.read().sub_commands.get(&type_id).cloned()
    }

    /// Annotated option fields of a DTO type, in first-attach order.
    /// Empty when the type carries no option metadata.
    pub fn option_params(&self, type_id: TypeId) -> Vec<(String, OptionParam)> {
        self.inner
            .read()
            .option_params
            .get(&type_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Choice list attached to a DTO field, if any.
    pub fn choices(&self, type_id: TypeId, field: &str) -> Option<Vec<Choice>> {
        self.inner
            .read()
            .choices
            .get(&(type_id, field.to_string()))
            .cloned()
    }

    /// Channel-type restrictions attached to a DTO field, if any.
    pub fn channel_types(&self, type_id: TypeId, field: &str) -> Option<Vec<ChannelType>> {
        self.inner
            .read()
            .channel_types
            .get(&(type_id, field.to_string()))
            .cloned()
    }

    /// Collector metadata for a collector type, if attached.
    pub fn collector_metadata(&self, key: TypeKey) -> Option<CollectorRequest> {
        self.inner.read().collectors.get(&key.id()).cloned()
    }

    /// Collector types a handler method declared, if any.
    pub fn use_collectors_metadata(&self, type_id: TypeId, method: &str) -> Option<Vec<TypeKey>> {
        self.inner
            .read()
            .use_collectors
            .get(&(type_id, method.to_string()))
            .cloned()
    }

    /// Prefix-command metadata for a handler type, if attached.
    pub fn prefix_command_metadata(&self, type_id: TypeId) -> Option<PrefixCommandMeta> {
        self.inner.read().prefix_commands.get(&type_id).cloned()
    }
}

impl fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("MetadataStore")
            .field("commands", &inner.commands.len())
            .field("sub_commands", &inner.sub_commands.len())
            .field("dto_types", &inner.option_params.len())
            .field("collectors", &inner.collectors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TrackDto;

    fn param(name: &str, required: bool) -> OptionParam {
        OptionParam {
            name: name.into(),
            description: format!("{name} option"),
            required,
            kind: OptionType::String,
        }
    }

    #[test]
    fn option_fields_keep_first_attach_order() {
        let store = MetadataStore::new();
        store.attach_option::<TrackDto>("b", param("b", false));
        store.attach_option::<TrackDto>("a", param("a", true));
        store.attach_option::<TrackDto>("b", param("b", true));

        let fields: Vec<_> = store
            .option_params(TypeId::of::<TrackDto>())
            .into_iter()
            .map(|(field, p)| (field, p.required))
            .collect();
        assert_eq!(fields, vec![("b".to_string(), true), ("a".to_string(), true)]);
    }

    #[test]
    fn missing_metadata_reads_as_absent_not_error() {
        let store = MetadataStore::new();
        assert!(store.sub_command_metadata(TypeId::of::<TrackDto>()).is_none());
        assert!(store.option_params(TypeId::of::<TrackDto>()).is_empty());
        assert!(
            store
                .use_collectors_metadata(TypeId::of::<TrackDto>(), "handle")
                .is_none()
        );
    }

    #[test]
    fn per_field_extras_are_keyed_by_type_and_field() {
        let store = MetadataStore::new();
        store.attach_choices::<TrackDto>("genre", vec![Choice::new("rock", "rock")]);

        let id = TypeId::of::<TrackDto>();
        assert!(store.choices(id, "genre").is_some());
        assert!(store.choices(id, "other").is_none());
        assert!(store.channel_types(id, "genre").is_none());
    }
}
