//! Collector declaration resolution and event-time application.
//!
//! Bootstrap resolves each handler method's declared collector types into
//! construction recipes and files them in the [`BaseCollectorResolver`]
//! registry; at event time the [`CollectorResolver`] turns those recipes into
//! live, fully wired [`Collector`](braid_core::Collector) instances shaped by
//! the incoming event.

mod base;
mod resolver;

pub use base::BaseCollectorResolver;
pub use resolver::CollectorResolver;
