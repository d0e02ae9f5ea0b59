//! Command-tree builder: compiles declarative command metadata into
//! platform-ready descriptors.
//!
//! One call to [`CommandTreeBuilder::resolve_command_options`] turns a
//! command declaration into a [`CommandDescriptor`], recursing through the
//! `include` list for subcommand groups and subcommands. Members of a group
//! (and entries of the `include` list) resolve concurrently and join before
//! the parent descriptor is assembled; everything else is sequential.
//!
//! Ordering invariants enforced here:
//!
//! - every flat options list is sorted so required options precede optional
//!   ones, stably within each partition, independently at each tree level;
//! - a command's flat DTO options are appended *after* its include-derived
//!   entries, so a declaration can legitimately mix subcommands and flat
//!   options at the same level (observable platform behavior, deliberately
//!   preserved);
//! - a subcommand that resolves zero options omits the `options` field
//!   entirely — the platform schema distinguishes absence from emptiness.

use std::sync::Arc;

use futures::future::try_join_all;
use parking_lot::Mutex;
use tracing::debug;

use braid_core::{
    CommandDescriptor, CommandKind, CommandOption, OptionDescriptor, SubCommandDescriptor,
    SubCommandGroupDescriptor,
};

use crate::dto::DtoFactory;
use crate::error::{BuildError, BuildResult};
use crate::handler::{CommandHandler, TypeKey, instance_type_id};
use crate::metadata::{CommandOptions, Include, MetadataStore, SubCommandGroupSpec};
use crate::options::{OptionResolver, ResolvedOption};
use crate::registry::HandlerRegistry;
use crate::tree::{CommandTree, NodeValue};

/// Method name subcommand handlers expose their DTO on.
const SUB_COMMAND_METHOD: &str = "handler";

/// Orchestrates metadata, registry, DTO, and option lookups to build
/// application-command descriptors, recording tree nodes along the way.
pub struct CommandTreeBuilder {
    store: Arc<MetadataStore>,
    handlers: Arc<HandlerRegistry>,
    dtos: Arc<DtoFactory>,
    options: OptionResolver,
    tree: Arc<Mutex<CommandTree>>,
}

impl CommandTreeBuilder {
    /// Creates a builder over the shared bootstrap state.
    pub fn new(
        store: Arc<MetadataStore>,
        handlers: Arc<HandlerRegistry>,
        dtos: Arc<DtoFactory>,
        tree: Arc<Mutex<CommandTree>>,
    ) -> Self {
        let options = OptionResolver::new(Arc::clone(&store));
        Self {
            store,
            handlers,
            dtos,
            options,
            tree,
        }
    }

    /// Compiles one command declaration into a registration-ready
    /// descriptor.
    ///
    /// Non-chat-input kinds never receive an `options` field, even when an
    /// `include` list was declared. Errors abort the whole command: no
    /// partial descriptor is returned.
    pub async fn resolve_command_options(
        &self,
        instance: Arc<dyn CommandHandler>,
        method: &str,
        options: &CommandOptions,
    ) -> BuildResult<CommandDescriptor> {
        self.tree.lock().append_node(
            &[Some(options.name.as_str())],
            NodeValue::instance(Arc::clone(&instance)),
        );

        let mut descriptor = CommandDescriptor {
            kind: options.kind,
            name: options.name.clone(),
            description: options.description.clone(),
            default_permission: options.default_permission,
            options: None,
        };

        if descriptor.kind == CommandKind::ChatInput {
            descriptor.options = Some(
                self.resolve_sub_command_options(&options.name, &options.include)
                    .await?,
            );
        }

        let dto = self
            .dtos
            .create(instance_type_id(&instance), method)
            .await;
        if let Some(dto) = dto {
            self.tree
                .lock()
                .append_node(&[Some(options.name.as_str())], NodeValue::dto(dto.clone()));

            let mut flat: Vec<OptionDescriptor> = self
                .options
                .resolve(&dto)
                .into_iter()
                .map(|(_, resolved)| flat_option(resolved, true))
                .collect();

            if descriptor.kind == CommandKind::ChatInput {
                sort_required_first(&mut flat);
                if let Some(list) = descriptor.options.as_mut() {
                    list.extend(flat.into_iter().map(CommandOption::Value));
                }
            }
        }

        debug!(command = %options.name, kind = ?options.kind, "built application command descriptor");
        Ok(descriptor)
    }

    /// Resolves every `include` entry concurrently, preserving declaration
    /// order in the result. The first failure aborts the whole list.
    async fn resolve_sub_command_options(
        &self,
        command: &str,
        include: &[Include],
    ) -> BuildResult<Vec<CommandOption>> {
        try_join_all(include.iter().map(|entry| async move {
            match entry {
                Include::Group(spec) => self
                    .group_options(spec(), command)
                    .await
                    .map(CommandOption::Group),
                Include::SubCommand(key) => self
                    .sub_command_options(*key, command, None)
                    .await
                    .map(CommandOption::SubCommand),
            }
        }))
        .await
    }

    /// Resolves a subcommand group: all members must resolve for the group
    /// descriptor to be produced.
    async fn group_options(
        &self,
        spec: SubCommandGroupSpec,
        command: &str,
    ) -> BuildResult<SubCommandGroupDescriptor> {
        let group_name = spec.options.name.as_str();
        self.tree.lock().append_node(
            &[Some(command), Some(group_name)],
            NodeValue::empty(),
        );

        let sub_commands = try_join_all(
            spec.sub_commands
                .iter()
                .map(|key| self.sub_command_options(*key, command, Some(group_name))),
        )
        .await?;

        Ok(SubCommandGroupDescriptor {
            name: spec.options.name.clone(),
            description: spec.options.description.clone(),
            sub_commands,
        })
    }

    /// Resolves one subcommand type into its descriptor, recording its tree
    /// nodes under `command` (and `group`, when nested).
    async fn sub_command_options(
        &self,
        key: TypeKey,
        command: &str,
        group: Option<&str>,
    ) -> BuildResult<SubCommandDescriptor> {
        let instance = self
            .handlers
            .get(key)
            .await
            .ok_or(BuildError::UnknownHandler {
                type_name: key.name(),
            })?;
        let meta = self
            .store
            .sub_command_metadata(instance_type_id(&instance))
            .ok_or(BuildError::InvalidSubCommand {
                type_name: key.name(),
            })?;

        self.tree.lock().append_node(
            &[Some(command), group, Some(meta.name.as_str())],
            NodeValue::instance(Arc::clone(&instance)),
        );

        let dto = self
            .dtos
            .create(instance_type_id(&instance), SUB_COMMAND_METHOD)
            .await;

        let mut options = Vec::new();
        if let Some(dto) = dto {
            self.tree.lock().append_node(
                &[Some(command), group, Some(meta.name.as_str())],
                NodeValue::dto(dto.clone()),
            );
            // Subcommand options never carry channel restrictions on the
            // wire; only top-level flat options do.
            options.extend(
                self.options
                    .resolve(&dto)
                    .into_iter()
                    .map(|(_, resolved)| flat_option(resolved, false)),
            );
        }

        let options = if options.is_empty() {
            None
        } else {
            sort_required_first(&mut options);
            Some(options)
        };

        Ok(SubCommandDescriptor {
            name: meta.name,
            description: meta.description,
            options,
        })
    }
}

/// Converts a resolved DTO field into its wire descriptor.
fn flat_option(resolved: ResolvedOption, with_channel_types: bool) -> OptionDescriptor {
    let ResolvedOption {
        param,
        choices,
        channel_types,
    } = resolved;
    OptionDescriptor {
        kind: param.kind,
        name: param.name,
        description: param.description,
        required: param.required,
        choices,
        channel_types: if with_channel_types { channel_types } else { None },
    }
}

/// Stable partition: required options first, first-seen order within each
/// partition.
fn sort_required_first(options: &mut [OptionDescriptor]) {
    options.sort_by_key(|option| !option.required);
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::{ChannelType, OptionType};
    use crate::metadata::{GroupOptions, OptionParam, SubCommandMeta};

    struct MusicGateway;
    impl CommandHandler for MusicGateway {}

    struct StopSubCommand;
    impl CommandHandler for StopSubCommand {}

    struct VolumeSubCommand;
    impl CommandHandler for VolumeSubCommand {}

    struct NotASubCommand;
    impl CommandHandler for NotASubCommand {}

    #[derive(Default)]
    struct PlayDto;

    #[derive(Default)]
    struct VolumeDto;

    fn param(name: &str, required: bool, kind: OptionType) -> OptionParam {
        OptionParam {
            name: name.into(),
            description: format!("{name} option"),
            required,
            kind,
        }
    }

    struct Fixture {
        builder: CommandTreeBuilder,
        store: Arc<MetadataStore>,
        handlers: Arc<HandlerRegistry>,
        dtos: Arc<DtoFactory>,
        tree: Arc<Mutex<CommandTree>>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MetadataStore::new());
        let handlers = Arc::new(HandlerRegistry::new());
        let dtos = Arc::new(DtoFactory::new());
        let tree = Arc::new(Mutex::new(CommandTree::new()));
        let builder = CommandTreeBuilder::new(
            Arc::clone(&store),
            Arc::clone(&handlers),
            Arc::clone(&dtos),
            Arc::clone(&tree),
        );
        Fixture {
            builder,
            store,
            handlers,
            dtos,
            tree,
        }
    }

    fn required_flags(descriptor: &CommandDescriptor) -> Vec<(String, bool)> {
        descriptor
            .options
            .as_ref()
            .unwrap()
            .iter()
            .filter_map(CommandOption::as_value)
            .map(|o| (o.name.clone(), o.required))
            .collect()
    }

    #[tokio::test]
    async fn required_options_precede_optional_ones_stably() {
        let f = fixture();
        f.store.attach_option::<PlayDto>("a", param("a", true, OptionType::String));
        f.store.attach_option::<PlayDto>("b", param("b", false, OptionType::String));
        f.store.attach_option::<PlayDto>("c", param("c", true, OptionType::String));
        f.dtos.bind::<MusicGateway, PlayDto>("play").await;

        let gateway: Arc<dyn CommandHandler> = Arc::new(MusicGateway);
        let descriptor = f
            .builder
            .resolve_command_options(gateway, "play", &CommandOptions::new("play", "Play music"))
            .await
            .unwrap();

        assert_eq!(
            required_flags(&descriptor),
            vec![
                ("a".to_string(), true),
                ("c".to_string(), true),
                ("b".to_string(), false),
            ]
        );
    }

    #[tokio::test]
    async fn sub_command_with_no_options_omits_the_field() {
        let f = fixture();
        f.handlers.register(StopSubCommand).await;
        f.store.attach_sub_command::<StopSubCommand>(SubCommandMeta {
            name: "stop".into(),
            description: "Stop playback".into(),
        });

        let gateway: Arc<dyn CommandHandler> = Arc::new(MusicGateway);
        let options = CommandOptions::new("music", "Music controls")
            .include(Include::SubCommand(TypeKey::of::<StopSubCommand>()));
        let descriptor = f
            .builder
            .resolve_command_options(gateway, "handle", &options)
            .await
            .unwrap();

        let entries = descriptor.options.as_ref().unwrap();
        let stop = entries[0].as_sub_command().unwrap();
        assert!(stop.options.is_none());

        let wire = serde_json::to_value(stop).unwrap();
        assert!(wire.get("options").is_none());
    }

    #[tokio::test]
    async fn including_a_non_sub_command_type_aborts_the_build() {
        let f = fixture();
        f.handlers.register(NotASubCommand).await;

        let gateway: Arc<dyn CommandHandler> = Arc::new(MusicGateway);
        let options = CommandOptions::new("music", "Music controls")
            .include(Include::SubCommand(TypeKey::of::<NotASubCommand>()));
        let err = f
            .builder
            .resolve_command_options(gateway, "handle", &options)
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::InvalidSubCommand { .. }));
    }

    #[tokio::test]
    async fn unregistered_sub_command_type_is_a_hard_error() {
        let f = fixture();
        let gateway: Arc<dyn CommandHandler> = Arc::new(MusicGateway);
        let options = CommandOptions::new("music", "Music controls")
            .include(Include::SubCommand(TypeKey::of::<StopSubCommand>()));
        let err = f
            .builder
            .resolve_command_options(gateway, "handle", &options)
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::UnknownHandler { .. }));
    }

    #[tokio::test]
    async fn group_resolves_all_members_and_records_tree_paths() {
        let f = fixture();
        f.handlers.register(StopSubCommand).await;
        f.handlers.register(VolumeSubCommand).await;
        f.store.attach_sub_command::<StopSubCommand>(SubCommandMeta {
            name: "stop".into(),
            description: "Stop playback".into(),
        });
        f.store.attach_sub_command::<VolumeSubCommand>(SubCommandMeta {
            name: "volume".into(),
            description: "Set volume".into(),
        });
        f.store.attach_option::<VolumeDto>(
            "level",
            param("level", true, OptionType::Integer),
        );
        f.dtos.bind::<VolumeSubCommand, VolumeDto>(SUB_COMMAND_METHOD).await;

        fn playback_group() -> SubCommandGroupSpec {
            SubCommandGroupSpec {
                options: GroupOptions {
                    name: "playback".into(),
                    description: "Playback controls".into(),
                },
                sub_commands: vec![
                    TypeKey::of::<StopSubCommand>(),
                    TypeKey::of::<VolumeSubCommand>(),
                ],
            }
        }

        let gateway: Arc<dyn CommandHandler> = Arc::new(MusicGateway);
        let options =
            CommandOptions::new("music", "Music controls").include(Include::Group(playback_group));
        let descriptor = f
            .builder
            .resolve_command_options(gateway, "handle", &options)
            .await
            .unwrap();

        let group = descriptor.options.as_ref().unwrap()[0].as_group().unwrap();
        assert_eq!(group.name, "playback");
        assert_eq!(group.sub_commands.len(), 2);
        assert_eq!(group.sub_commands[0].name, "stop");
        assert_eq!(
            group.sub_commands[1].options.as_ref().unwrap()[0].name,
            "level"
        );

        let tree = f.tree.lock();
        assert!(tree.node(&["music", "playback"]).is_some());
        let volume = tree.node(&["music", "playback", "volume"]).unwrap();
        assert!(volume.instance.is_some());
        assert!(volume.dto.is_some());
    }

    #[tokio::test]
    async fn non_chat_input_commands_ignore_includes_and_carry_no_options() {
        let f = fixture();
        f.handlers.register(StopSubCommand).await;
        f.store.attach_sub_command::<StopSubCommand>(SubCommandMeta {
            name: "stop".into(),
            description: "Stop playback".into(),
        });

        let gateway: Arc<dyn CommandHandler> = Arc::new(MusicGateway);
        let options = CommandOptions::new("inspect", "")
            .kind(CommandKind::Message)
            .include(Include::SubCommand(TypeKey::of::<StopSubCommand>()));
        let descriptor = f
            .builder
            .resolve_command_options(gateway, "inspect", &options)
            .await
            .unwrap();

        assert!(descriptor.options.is_none());
        let wire = serde_json::to_value(&descriptor).unwrap();
        assert!(wire.get("options").is_none());
    }

    #[tokio::test]
    async fn flat_dto_options_mix_after_include_entries_at_top_level() {
        let f = fixture();
        f.handlers.register(StopSubCommand).await;
        f.store.attach_sub_command::<StopSubCommand>(SubCommandMeta {
            name: "stop".into(),
            description: "Stop playback".into(),
        });
        f.store.attach_option::<PlayDto>(
            "track",
            param("track", true, OptionType::String),
        );
        f.dtos.bind::<MusicGateway, PlayDto>("play").await;

        let gateway: Arc<dyn CommandHandler> = Arc::new(MusicGateway);
        let options = CommandOptions::new("play", "Play a track")
            .include(Include::SubCommand(TypeKey::of::<StopSubCommand>()));
        let descriptor = f
            .builder
            .resolve_command_options(gateway, "play", &options)
            .await
            .unwrap();

        let entries = descriptor.options.as_ref().unwrap();
        assert_eq!(entries.len(), 2);
        let stop = entries[0].as_sub_command().unwrap();
        assert!(stop.options.is_none());
        let track = entries[1].as_value().unwrap();
        assert_eq!(track.name, "track");
        assert!(track.required);
    }

    #[tokio::test]
    async fn channel_restrictions_survive_only_at_top_level() {
        let f = fixture();
        f.store.attach_option::<PlayDto>(
            "channel",
            param("channel", false, OptionType::Channel),
        );
        f.store
            .attach_channel_types::<PlayDto>("channel", vec![ChannelType::GuildVoice]);
        f.dtos.bind::<MusicGateway, PlayDto>("play").await;

        f.handlers.register(VolumeSubCommand).await;
        f.store.attach_sub_command::<VolumeSubCommand>(SubCommandMeta {
            name: "volume".into(),
            description: "Set volume".into(),
        });
        f.store.attach_option::<VolumeDto>(
            "target",
            param("target", false, OptionType::Channel),
        );
        f.store
            .attach_channel_types::<VolumeDto>("target", vec![ChannelType::GuildVoice]);
        f.dtos.bind::<VolumeSubCommand, VolumeDto>(SUB_COMMAND_METHOD).await;

        let gateway: Arc<dyn CommandHandler> = Arc::new(MusicGateway);
        let options = CommandOptions::new("play", "Play a track")
            .include(Include::SubCommand(TypeKey::of::<VolumeSubCommand>()));
        let descriptor = f
            .builder
            .resolve_command_options(gateway, "play", &options)
            .await
            .unwrap();

        let entries = descriptor.options.as_ref().unwrap();
        let volume = entries[0].as_sub_command().unwrap();
        assert!(volume.options.as_ref().unwrap()[0].channel_types.is_none());
        let top = entries[1].as_value().unwrap();
        assert!(top.channel_types.is_some());
    }
}
