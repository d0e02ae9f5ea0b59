//! Type-keyed registry of live handler instances.
//!
//! The builder resolves a subcommand's declared type to its constructed
//! instance here. Lookups are non-strict: a missing type is `None`, and the
//! caller decides whether that is fatal.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::handler::{CommandHandler, TypeKey};

/// Registry mapping handler types to their single live instance.
#[derive(Default)]
pub struct HandlerRegistry {
    inner: RwLock<HashMap<TypeId, Arc<dyn CommandHandler>>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instance under its concrete type, returning the shared
    /// handle. Re-registering a type replaces the previous instance.
    pub async fn register<T: CommandHandler>(&self, instance: T) -> Arc<dyn CommandHandler> {
        let handle: Arc<dyn CommandHandler> = Arc::new(instance);
        self.inner
            .write()
            .await
            .insert(TypeId::of::<T>(), Arc::clone(&handle));
        debug!(handler = std::any::type_name::<T>(), "registered handler instance");
        handle
    }

    /// Looks up the instance registered for a type key.
    pub async fn get(&self, key: TypeKey) -> Option<Arc<dyn CommandHandler>> {
        self.inner.read().await.get(&key.id()).cloned()
    }

    /// Number of registered instances.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the registry is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StopSubCommand;
    impl CommandHandler for StopSubCommand {}

    struct Unregistered;
    impl CommandHandler for Unregistered {}

    #[tokio::test]
    async fn lookup_finds_registered_instance_by_type() {
        let registry = HandlerRegistry::new();
        let handle = registry.register(StopSubCommand).await;

        let found = registry.get(TypeKey::of::<StopSubCommand>()).await.unwrap();
        assert!(Arc::ptr_eq(&handle, &found));
        assert!(registry.get(TypeKey::of::<Unregistered>()).await.is_none());
    }
}
