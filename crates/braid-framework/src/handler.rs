//! Handler traits and identity keys.
//!
//! The declarative layer talks about handler *instances* and their *methods*
//! by name. Two small traits bridge that world to concrete types:
//!
//! - [`CommandHandler`] marks a type whose annotated methods own commands,
//!   subcommands, or collector registrations;
//! - [`CollectorHandler`] is the dynamic dispatch surface collectors use to
//!   invoke filter and lifecycle methods by their registered names.
//!
//! Registry lookups match on *instance identity* ([`HandlerId`], pointer
//! equality) and metadata lookups match on *type identity* ([`TypeKey`]).

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use braid_core::{CollectedItem, CollectorPayload};

/// Marker trait for types that own annotated command or collector methods.
///
/// The `Any` supertrait gives the metadata layer access to the concrete type
/// identity of a registered instance.
pub trait CommandHandler: Any + Send + Sync {}

/// Dynamic dispatch surface for collector lifecycle and filter methods.
///
/// The metadata layer stores method *names*; at event time the resolver calls
/// back through this trait, forwarding the payload unchanged.
pub trait CollectorHandler: Send + Sync {
    /// Invokes the named lifecycle handler method.
    fn invoke(&self, method: &str, payload: &CollectorPayload);

    /// Evaluates the named filter method against a candidate item.
    ///
    /// The default admits everything, matching a collector declared without
    /// a filter method.
    fn filter(&self, method: &str, item: &CollectedItem) -> bool {
        let _ = (method, item);
        true
    }
}

/// Identity of a registered handler instance.
///
/// Two clones of the same `Arc` share an id; two separate instances of the
/// same type do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

impl HandlerId {
    /// Derives the identity of a handler instance.
    pub fn of(instance: &Arc<dyn CommandHandler>) -> Self {
        Self(Arc::as_ptr(instance) as *const () as usize)
    }
}

/// Stable key identifying a registered type, with its name kept for
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type's name, for error messages and logs.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Concrete type id of a handler instance behind the trait object.
pub fn instance_type_id(instance: &Arc<dyn CommandHandler>) -> TypeId {
    let any: &dyn Any = instance.as_ref();
    any.type_id()
}
