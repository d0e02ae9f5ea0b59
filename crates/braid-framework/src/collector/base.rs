//! Registry of resolved collector declarations.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::handler::HandlerId;
use crate::metadata::CollectorRequest;

/// Maps a handler method to the collector recipes resolved for it.
///
/// Keyed by *instance* identity, not type: two instances of the same handler
/// type keep separate registrations. Registering the same `(instance,
/// method)` pair again appends rather than replaces, and application walks
/// every recipe filed under the key, so repeated registrations all take
/// effect.
#[derive(Default)]
pub struct BaseCollectorResolver {
    entries: RwLock<HashMap<(HandlerId, String), Vec<CollectorRequest>>>,
}

impl BaseCollectorResolver {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files collector recipes under a handler method.
    pub fn register(&self, handler: HandlerId, method: &str, requests: Vec<CollectorRequest>) {
        self.entries
            .write()
            .entry((handler, method.to_string()))
            .or_default()
            .extend(requests);
    }

    /// All recipes filed under a handler method, in registration order.
    /// `None` when the method was never registered.
    pub fn requests_for(&self, handler: HandlerId, method: &str) -> Option<Vec<CollectorRequest>> {
        self.entries
            .read()
            .get(&(handler, method.to_string()))
            .cloned()
    }

    /// Number of registered handler methods.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no method has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use braid_core::{CollectedItem, CollectorKind, CollectorOptions, CollectorPayload};

    use crate::handler::{CollectorHandler, CommandHandler};

    struct Gateway;
    impl CommandHandler for Gateway {}

    struct NoopOwner;
    impl CollectorHandler for NoopOwner {
        fn invoke(&self, _method: &str, _payload: &CollectorPayload) {}
        fn filter(&self, _method: &str, _item: &CollectedItem) -> bool {
            true
        }
    }

    fn request(kind: CollectorKind) -> CollectorRequest {
        CollectorRequest {
            kind,
            options: CollectorOptions::default(),
            filter_method: None,
            owner: Arc::new(NoopOwner),
            events: Vec::new(),
        }
    }

    #[test]
    fn repeated_registration_appends_instead_of_replacing() {
        let registry = BaseCollectorResolver::new();
        let instance: Arc<dyn CommandHandler> = Arc::new(Gateway);
        let id = HandlerId::of(&instance);

        registry.register(id, "play", vec![request(CollectorKind::Reaction)]);
        registry.register(id, "play", vec![request(CollectorKind::Message)]);

        let requests = registry.requests_for(id, "play").unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].kind, CollectorKind::Reaction);
        assert_eq!(requests[1].kind, CollectorKind::Message);
    }

    #[test]
    fn instances_of_the_same_type_keep_separate_entries() {
        let registry = BaseCollectorResolver::new();
        let first: Arc<dyn CommandHandler> = Arc::new(Gateway);
        let second: Arc<dyn CommandHandler> = Arc::new(Gateway);

        registry.register(
            HandlerId::of(&first),
            "play",
            vec![request(CollectorKind::Reaction)],
        );

        assert!(registry.requests_for(HandlerId::of(&first), "play").is_some());
        assert!(registry.requests_for(HandlerId::of(&second), "play").is_none());
        assert!(registry.requests_for(HandlerId::of(&first), "stop").is_none());
    }
}
