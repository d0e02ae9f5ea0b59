//! Data-transfer-object instances and their factory.
//!
//! A DTO is a plain struct whose fields were annotated with option metadata
//! (see [`MetadataStore`](crate::metadata::MetadataStore)). Handler methods
//! that take a DTO register a constructor in the [`DtoFactory`], and the
//! builder asks for a fresh instance while compiling the command tree.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::handler::TypeKey;

/// Type-erased DTO instance plus the type identity its option schema is
/// keyed by.
#[derive(Clone)]
pub struct DtoRef {
    inner: Arc<dyn Any + Send + Sync>,
    key: TypeKey,
}

impl DtoRef {
    /// Wraps a concrete DTO instance.
    pub fn new<D: Any + Send + Sync>(dto: D) -> Self {
        Self {
            inner: Arc::new(dto),
            key: TypeKey::of::<D>(),
        }
    }

    /// The DTO's type key.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Downcasts to the concrete DTO type.
    pub fn downcast_ref<D: Any>(&self) -> Option<&D> {
        self.inner.downcast_ref()
    }
}

impl fmt::Debug for DtoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DtoRef").field(&self.key.name()).finish()
    }
}

type Factory = Arc<dyn Fn() -> DtoRef + Send + Sync>;

/// Constructs DTO instances for handler methods.
///
/// Keyed by `(handler type, method name)`. Methods without a registered DTO
/// yield `None`, which the builder treats as "this command has no flat
/// options", never as an error.
#[derive(Default)]
pub struct DtoFactory {
    factories: RwLock<HashMap<(TypeId, String), Factory>>,
}

impl DtoFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the DTO type `D` for a method of the handler type `H`,
    /// constructed via `Default`.
    pub async fn bind<H, D>(&self, method: impl Into<String>)
    where
        H: 'static,
        D: Any + Send + Sync + Default,
    {
        self.bind_with::<H>(method, || DtoRef::new(D::default())).await;
    }

    /// Registers a custom constructor for a method of the handler type `H`.
    pub async fn bind_with<H: 'static>(
        &self,
        method: impl Into<String>,
        factory: impl Fn() -> DtoRef + Send + Sync + 'static,
    ) {
        self.factories
            .write()
            .await
            .insert((TypeId::of::<H>(), method.into()), Arc::new(factory));
    }

    /// Builds a fresh DTO for the given handler method, if one is registered.
    pub async fn create(&self, handler_type: TypeId, method: &str) -> Option<DtoRef> {
        let factory = {
            let factories = self.factories.read().await;
            factories.get(&(handler_type, method.to_string())).cloned()
        };
        factory.map(|f| f())
    }
}

impl fmt::Debug for DtoFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DtoFactory").finish_non_exhaustive()
    }
}
