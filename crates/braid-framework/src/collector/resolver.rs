//! Bootstrap-time resolution and event-time application of collectors.

use std::sync::Arc;

use tracing::{debug, trace};

use braid_core::{Collector, CollectorKind, CollectorTarget, GatewayEvent};

use crate::collector::BaseCollectorResolver;
use crate::error::{CollectorError, CollectorResult};
use crate::handler::{CommandHandler, HandlerId, instance_type_id};
use crate::metadata::{CollectorRequest, MetadataStore};

/// Resolves collector declarations against the metadata store and, at event
/// time, constructs live collectors from the filed recipes.
pub struct CollectorResolver {
    store: Arc<MetadataStore>,
    base: BaseCollectorResolver,
}

impl CollectorResolver {
    /// Creates a resolver over the given metadata store.
    pub fn new(store: Arc<MetadataStore>) -> Self {
        Self {
            store,
            base: BaseCollectorResolver::new(),
        }
    }

    /// Resolves the collector types a handler method declared into recipes
    /// and files them in the registry.
    ///
    /// A method with no collector declaration is fine and files nothing. A
    /// declared type with no collector metadata is a bootstrap error, and
    /// nothing is filed for the method in that case.
    pub fn resolve(
        &self,
        instance: &Arc<dyn CommandHandler>,
        method: &str,
    ) -> CollectorResult<()> {
        let Some(keys) = self
            .store
            .use_collectors_metadata(instance_type_id(instance), method)
        else {
            return Ok(());
        };

        let requests = keys
            .iter()
            .map(|key| {
                self.store
                    .collector_metadata(*key)
                    .ok_or(CollectorError::MissingMetadata {
                        type_name: key.name(),
                    })
            })
            .collect::<CollectorResult<Vec<CollectorRequest>>>()?;

        debug!(method, collectors = requests.len(), "resolved collector declarations");
        self.base.register(HandlerId::of(instance), method, requests);
        Ok(())
    }

    /// Constructs live collectors for a handler method from an incoming
    /// event.
    ///
    /// `None` means the method has no registration at all. A `Some` result
    /// has one slot per filed recipe, in registration order; a slot is `None`
    /// when the event's shape cannot feed that collector kind (a reaction
    /// collector needs a message to attach to, channel-scoped collectors
    /// need an event that carries a channel).
    pub fn apply(
        &self,
        instance: &Arc<dyn CommandHandler>,
        method: &str,
        event: &GatewayEvent,
    ) -> Option<Vec<Option<Collector>>> {
        let requests = self.base.requests_for(HandlerId::of(instance), method)?;
        Some(
            requests
                .iter()
                .map(|request| build_collector(request, event))
                .collect(),
        )
    }

    /// The underlying recipe registry.
    pub fn base(&self) -> &BaseCollectorResolver {
        &self.base
    }
}

/// Builds one live collector from a recipe, shaped by the incoming event.
fn build_collector(request: &CollectorRequest, event: &GatewayEvent) -> Option<Collector> {
    let target = match request.kind {
        CollectorKind::Reaction => {
            let Some(message) = event.as_message() else {
                trace!(kind = %request.kind, event = %event.kind(), "event cannot feed collector");
                return None;
            };
            CollectorTarget::Message(message.id)
        }
        CollectorKind::Message | CollectorKind::Interaction => {
            let Some(channel_id) = event.channel_id() else {
                trace!(kind = %request.kind, event = %event.kind(), "event cannot feed collector");
                return None;
            };
            CollectorTarget::Channel(channel_id)
        }
    };

    let mut options = request.options.clone();
    if let Some(filter_method) = &request.filter_method {
        let owner = Arc::clone(&request.owner);
        let filter_method = filter_method.clone();
        options.filter = Some(Arc::new(move |item| owner.filter(&filter_method, item)));
    }

    let mut collector = Collector::new(request.kind, target, options);
    for (lifecycle, handler_method) in &request.events {
        let owner = Arc::clone(&request.owner);
        let handler_method = handler_method.clone();
        collector.on(
            *lifecycle,
            Arc::new(move |payload| owner.invoke(&handler_method, payload)),
        );
    }
    Some(collector)
}
