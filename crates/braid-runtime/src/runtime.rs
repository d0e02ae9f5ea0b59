//! Runtime orchestration.
//!
//! [`BraidRuntime`] owns the shared bootstrap state (metadata store, handler
//! registry, DTO factory, command tree) and drives the two phases of a Braid
//! application:
//!
//! 1. **Bootstrap** — compile every declared command into a descriptor,
//!    resolve collector declarations, and wire prefix commands.
//! 2. **Registration** — push the built descriptors to the platform through
//!    a [`RegisterCommands`] implementation, scoped by the configuration.
//!
//! After bootstrap the runtime answers dispatch-time questions: constructing
//! collectors for an incoming event and matching prefix commands against
//! chat messages.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use braid_core::{Collector, CommandDescriptor, GatewayEvent, Message};
use braid_framework::{
    CollectorResolver, CommandHandler, CommandTree, CommandTreeBuilder, DtoFactory,
    HandlerRegistry, MetadataStore, PrefixMatch, PrefixMatcher, TypeKey,
};

use crate::config::BraidConfig;
use crate::error::{BootstrapError, BootstrapResult};
use crate::registrar::{RegisterCommands, RegistrationScope};

struct Declaration {
    instance: Arc<dyn CommandHandler>,
    key: TypeKey,
    method: String,
}

/// The Braid runtime: shared bootstrap state plus the orchestration driving
/// command building, registration, and dispatch-time lookups.
pub struct BraidRuntime {
    config: BraidConfig,
    store: Arc<MetadataStore>,
    handlers: Arc<HandlerRegistry>,
    dtos: Arc<DtoFactory>,
    tree: Arc<Mutex<CommandTree>>,
    builder: CommandTreeBuilder,
    collectors: CollectorResolver,
    prefix: PrefixMatcher,
    commands: Mutex<Vec<Declaration>>,
    prefix_handlers: Mutex<Vec<TypeKey>>,
    collector_methods: Mutex<Vec<(Arc<dyn CommandHandler>, String)>>,
    descriptors: Mutex<Vec<CommandDescriptor>>,
}

impl BraidRuntime {
    /// Creates a runtime from a loaded configuration.
    pub fn new(config: BraidConfig) -> Self {
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
        let collectors = CollectorResolver::new(Arc::clone(&store));
        Self {
            config,
            store,
            handlers,
            dtos,
            tree,
            builder,
            collectors,
            prefix: PrefixMatcher::new(),
            commands: Mutex::new(Vec::new()),
            prefix_handlers: Mutex::new(Vec::new()),
            collector_methods: Mutex::new(Vec::new()),
            descriptors: Mutex::new(Vec::new()),
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &BraidConfig {
        &self.config
    }

    /// The metadata store declarations are attached to.
    pub fn store(&self) -> &Arc<MetadataStore> {
        &self.store
    }

    /// The handler instance registry.
    pub fn handlers(&self) -> &Arc<HandlerRegistry> {
        &self.handlers
    }

    /// The DTO factory.
    pub fn dtos(&self) -> &Arc<DtoFactory> {
        &self.dtos
    }

    /// The command tree populated during bootstrap.
    pub fn tree(&self) -> &Arc<Mutex<CommandTree>> {
        &self.tree
    }

    /// Registers a top-level command handler and queues it for bootstrap.
    ///
    /// `method` is the handler method the command's DTO (if any) is bound
    /// to. Command metadata for `T` must be attached to the store before
    /// [`bootstrap`](Self::bootstrap) runs.
    pub async fn add_command<T: CommandHandler>(
        &self,
        instance: T,
        method: impl Into<String>,
    ) -> Arc<dyn CommandHandler> {
        let handle = self.handlers.register(instance).await;
        self.commands.lock().push(Declaration {
            instance: Arc::clone(&handle),
            key: TypeKey::of::<T>(),
            method: method.into(),
        });
        handle
    }

    /// Registers a subcommand handler so `include` lists can resolve it.
    pub async fn add_sub_command<T: CommandHandler>(
        &self,
        instance: T,
    ) -> Arc<dyn CommandHandler> {
        self.handlers.register(instance).await
    }

    /// Registers a prefix-command handler and queues it for bootstrap.
    ///
    /// Prefix-command metadata for `T` must be attached to the store before
    /// [`bootstrap`](Self::bootstrap) runs.
    pub async fn add_prefix_command<T: CommandHandler>(
        &self,
        instance: T,
    ) -> Arc<dyn CommandHandler> {
        let handle = self.handlers.register(instance).await;
        self.prefix_handlers.lock().push(TypeKey::of::<T>());
        handle
    }

    /// Queues collector resolution for a handler method outside the command
    /// path.
    ///
    /// Command methods resolve their collector declarations automatically;
    /// any other handler method with use-collectors metadata — a
    /// prefix-command handler, a plain gateway-event handler — is declared
    /// here. `instance` is the handle the method will later be dispatched
    /// on; collector registrations follow instance identity.
    pub fn add_collector_method(
        &self,
        instance: &Arc<dyn CommandHandler>,
        method: impl Into<String>,
    ) {
        self.collector_methods
            .lock()
            .push((Arc::clone(instance), method.into()));
    }

    /// Compiles every queued declaration.
    ///
    /// Builds command descriptors in declaration order, resolves collector
    /// declarations for each command method and each method queued via
    /// [`add_collector_method`](Self::add_collector_method), and wires
    /// prefix commands into the matcher. The first failure aborts the whole
    /// bootstrap. Descriptors built by earlier calls are kept; each call
    /// returns only the set it built.
    pub async fn bootstrap(&self) -> BootstrapResult<Vec<CommandDescriptor>> {
        let declarations = std::mem::take(&mut *self.commands.lock());

        let mut built = Vec::with_capacity(declarations.len());
        for declaration in &declarations {
            let meta = self.store.command_metadata(declaration.key.id()).ok_or(
                BootstrapError::MissingCommandMetadata {
                    type_name: declaration.key.name(),
                },
            )?;
            let descriptor = self
                .builder
                .resolve_command_options(
                    Arc::clone(&declaration.instance),
                    &declaration.method,
                    &meta,
                )
                .await?;
            self.collectors
                .resolve(&declaration.instance, &declaration.method)?;
            built.push(descriptor);
        }

        for (instance, method) in std::mem::take(&mut *self.collector_methods.lock()) {
            self.collectors.resolve(&instance, &method)?;
        }

        for key in std::mem::take(&mut *self.prefix_handlers.lock()) {
            let meta = self.store.prefix_command_metadata(key.id()).ok_or(
                BootstrapError::MissingPrefixMetadata {
                    type_name: key.name(),
                },
            )?;
            self.prefix.register(key, meta);
        }

        info!(
            commands = built.len(),
            prefix_commands = self.prefix.len(),
            "bootstrap complete"
        );
        self.descriptors.lock().extend(built.iter().cloned());
        Ok(built)
    }

    /// Descriptors built by [`bootstrap`](Self::bootstrap) calls so far.
    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        self.descriptors.lock().clone()
    }

    /// Pushes the built descriptors to the platform.
    ///
    /// Scopes come from the registration configuration: the global scope
    /// first when enabled, then each listed guild in order. With
    /// `remove_before` set, each scope is cleared right before its
    /// registration.
    pub async fn register_with(&self, registrar: &dyn RegisterCommands) -> BootstrapResult<()> {
        let descriptors = self.descriptors();

        let mut scopes = Vec::new();
        if self.config.registration.global {
            scopes.push(RegistrationScope::Global);
        }
        scopes.extend(
            self.config
                .registration
                .guilds
                .iter()
                .map(|guild| RegistrationScope::Guild(*guild)),
        );

        for scope in scopes {
            if self.config.registration.remove_before {
                registrar.remove_all(scope).await?;
            }
            registrar.register(scope, &descriptors).await?;
            info!(%scope, commands = descriptors.len(), "commands registered");
        }
        Ok(())
    }

    /// Constructs live collectors for a handler method from an incoming
    /// event. See [`CollectorResolver::apply`].
    pub fn apply_collectors(
        &self,
        instance: &Arc<dyn CommandHandler>,
        method: &str,
        event: &GatewayEvent,
    ) -> Option<Vec<Option<Collector>>> {
        self.collectors.apply(instance, method, event)
    }

    /// Matches a chat message against the registered prefix commands, using
    /// the configured global prefix.
    pub fn match_prefix(&self, message: &Message) -> Option<PrefixMatch> {
        self.prefix.match_message(message, &self.config.prefix.prefix)
    }
}
