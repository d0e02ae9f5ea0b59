//! Short-lived event collectors.
//!
//! A [`Collector`] is a transient listener attached to a specific message or
//! channel that captures matching follow-up items (reactions, messages, or
//! component interactions) until it ends. This crate owns construction and
//! event wiring only; expiry and feeding live items is the platform
//! lifecycle's job. The [`CancellationToken`] exposed by
//! [`Collector::cancellation_token`] lets that lifecycle observe the end
//! signal without polling.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::event::{Interaction, Message, Reaction, Snowflake};

/// Closed set of collector kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectorKind {
    /// Collects reactions on a single message.
    Reaction,
    /// Collects messages in a channel.
    Message,
    /// Collects component interactions in a channel.
    Interaction,
}

impl CollectorKind {
    /// Human-readable kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reaction => "reaction",
            Self::Message => "message",
            Self::Interaction => "interaction",
        }
    }
}

impl fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle events a collector emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectorEvent {
    /// An item passed the filter and was captured.
    Collect,
    /// A previously captured item was removed.
    Dispose,
    /// The collector stopped; no further events follow.
    End,
}

impl CollectorEvent {
    /// Wire-style event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collect => "collect",
            Self::Dispose => "dispose",
            Self::End => "end",
        }
    }
}

impl fmt::Display for CollectorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item captured by a live collector.
#[derive(Debug, Clone)]
pub enum CollectedItem {
    /// A reaction, captured by reaction collectors.
    Reaction(Reaction),
    /// A message, captured by message collectors.
    Message(Message),
    /// A component interaction, captured by interaction collectors.
    Interaction(Interaction),
}

/// Payload forwarded to lifecycle listeners, unchanged from the firing site.
#[derive(Debug, Clone)]
pub enum CollectorPayload {
    /// The captured (or disposed) item.
    Item(CollectedItem),
    /// Terminal signal with the end reason and final capture count.
    End {
        /// Why the collector stopped ("limit", "time", caller-supplied, ...).
        reason: String,
        /// Number of items captured over the collector's lifetime.
        collected: usize,
    },
}

/// Predicate deciding whether a candidate item is captured.
pub type FilterFn = Arc<dyn Fn(&CollectedItem) -> bool + Send + Sync>;

/// Listener invoked for a subscribed lifecycle event.
pub type ListenerFn = Arc<dyn Fn(&CollectorPayload) + Send + Sync>;

/// Platform collector options.
///
/// The declarative layer stores these without a filter; the filter slot is
/// bound at apply time from the owning handler's filter method.
#[derive(Clone, Default)]
pub struct CollectorOptions {
    /// Hard lifetime cap, enforced by the owning platform lifecycle.
    pub time: Option<Duration>,
    /// Idle timeout, enforced by the owning platform lifecycle.
    pub idle: Option<Duration>,
    /// Maximum captures before the collector ends itself.
    pub max: Option<usize>,
    /// Whether dispose events are delivered.
    pub dispose: bool,
    /// Capture predicate; absent means capture everything.
    pub filter: Option<FilterFn>,
}

impl fmt::Debug for CollectorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorOptions")
            .field("time", &self.time)
            .field("idle", &self.idle)
            .field("max", &self.max)
            .field("dispose", &self.dispose)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Construction target for a collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorTarget {
    /// Attached to a single message (reaction collectors).
    Message(Snowflake),
    /// Attached to a channel (message and interaction collectors).
    Channel(Snowflake),
}

/// A live collector: capture state plus wired lifecycle listeners.
pub struct Collector {
    kind: CollectorKind,
    target: CollectorTarget,
    options: CollectorOptions,
    listeners: Vec<(CollectorEvent, ListenerFn)>,
    collected: usize,
    ended: bool,
    cancel: CancellationToken,
}

impl Collector {
    /// Creates a collector with no listeners attached yet.
    pub fn new(kind: CollectorKind, target: CollectorTarget, options: CollectorOptions) -> Self {
        Self {
            kind,
            target,
            options,
            listeners: Vec::new(),
            collected: 0,
            ended: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Collector kind.
    pub fn kind(&self) -> CollectorKind {
        self.kind
    }

    /// The message or channel this collector is attached to.
    pub fn target(&self) -> CollectorTarget {
        self.target
    }

    /// The options the collector was constructed with.
    pub fn options(&self) -> &CollectorOptions {
        &self.options
    }

    /// Whether a capture filter is bound.
    pub fn has_filter(&self) -> bool {
        self.options.filter.is_some()
    }

    /// Number of listeners subscribed for `event`.
    pub fn listener_count(&self, event: CollectorEvent) -> usize {
        self.listeners.iter().filter(|(e, _)| *e == event).count()
    }

    /// Subscribes a listener for a lifecycle event.
    pub fn on(&mut self, event: CollectorEvent, listener: ListenerFn) {
        self.listeners.push((event, listener));
    }

    /// Number of items captured so far.
    pub fn collected(&self) -> usize {
        self.collected
    }

    /// Whether the collector has ended.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Token tripped when the collector ends.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Offers an item to the collector.
    ///
    /// Returns `true` when the item was captured. Filter rejections and
    /// offers after the end are ignored, not errors. Reaching the `max`
    /// capture count ends the collector with reason `"limit"`.
    pub fn collect(&mut self, item: CollectedItem) -> bool {
        if self.ended {
            return false;
        }
        if let Some(filter) = &self.options.filter {
            if !filter(&item) {
                trace!(kind = %self.kind, "item rejected by collector filter");
                return false;
            }
        }

        self.collected += 1;
        self.emit(CollectorEvent::Collect, &CollectorPayload::Item(item));

        if self.options.max.is_some_and(|max| self.collected >= max) {
            self.end("limit");
        }
        true
    }

    /// Signals removal of a previously captured item.
    ///
    /// Delivered only when the collector was constructed with
    /// `dispose: true`.
    pub fn dispose(&mut self, item: CollectedItem) {
        if self.ended || !self.options.dispose {
            return;
        }
        self.emit(CollectorEvent::Dispose, &CollectorPayload::Item(item));
    }

    /// Stops the collector, firing end listeners and tripping the
    /// cancellation token. Ending twice is a no-op.
    pub fn end(&mut self, reason: impl Into<String>) {
        if self.ended {
            return;
        }
        self.ended = true;
        let payload = CollectorPayload::End {
            reason: reason.into(),
            collected: self.collected,
        };
        self.emit(CollectorEvent::End, &payload);
        self.cancel.cancel();
    }

    fn emit(&self, event: CollectorEvent, payload: &CollectorPayload) {
        for (subscribed, listener) in &self.listeners {
            if *subscribed == event {
                listener(payload);
            }
        }
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("collected", &self.collected)
            .field("ended", &self.ended)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn reaction(emoji: &str) -> CollectedItem {
        CollectedItem::Reaction(Reaction {
            message_id: Snowflake(1),
            user_id: Snowflake(2),
            emoji: emoji.into(),
        })
    }

    fn counting_listener(counter: &Arc<AtomicUsize>) -> ListenerFn {
        let counter = Arc::clone(counter);
        Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn filter_gates_collection() {
        let options = CollectorOptions {
            filter: Some(Arc::new(|item| {
                matches!(item, CollectedItem::Reaction(r) if r.emoji == "👍")
            })),
            ..Default::default()
        };
        let mut collector = Collector::new(
            CollectorKind::Reaction,
            CollectorTarget::Message(Snowflake(1)),
            options,
        );

        assert!(!collector.collect(reaction("👎")));
        assert!(collector.collect(reaction("👍")));
        assert_eq!(collector.collected(), 1);
    }

    #[test]
    fn max_captures_end_the_collector_with_limit_reason() {
        let mut collector = Collector::new(
            CollectorKind::Reaction,
            CollectorTarget::Message(Snowflake(1)),
            CollectorOptions {
                max: Some(2),
                ..Default::default()
            },
        );
        let reasons: Arc<Mutex<Vec<String>>> = Default::default();
        let sink = Arc::clone(&reasons);
        collector.on(
            CollectorEvent::End,
            Arc::new(move |payload| {
                if let CollectorPayload::End { reason, collected } = payload {
                    sink.lock().unwrap().push(format!("{reason}:{collected}"));
                }
            }),
        );

        collector.collect(reaction("a"));
        assert!(!collector.is_ended());
        collector.collect(reaction("b"));
        assert!(collector.is_ended());
        assert!(!collector.collect(reaction("c")));
        assert_eq!(reasons.lock().unwrap().as_slice(), ["limit:2"]);
    }

    #[test]
    fn end_trips_cancellation_token_once() {
        let mut collector = Collector::new(
            CollectorKind::Message,
            CollectorTarget::Channel(Snowflake(9)),
            CollectorOptions::default(),
        );
        let ends = Arc::new(AtomicUsize::new(0));
        collector.on(CollectorEvent::End, counting_listener(&ends));

        let token = collector.cancellation_token();
        assert!(!token.is_cancelled());
        collector.end("time");
        collector.end("time");
        assert!(token.is_cancelled());
        assert_eq!(ends.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dispose_requires_opt_in() {
        let fired = Arc::new(AtomicUsize::new(0));

        let mut silent = Collector::new(
            CollectorKind::Reaction,
            CollectorTarget::Message(Snowflake(1)),
            CollectorOptions::default(),
        );
        silent.on(CollectorEvent::Dispose, counting_listener(&fired));
        silent.dispose(reaction("x"));
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        let mut disposing = Collector::new(
            CollectorKind::Reaction,
            CollectorTarget::Message(Snowflake(1)),
            CollectorOptions {
                dispose: true,
                ..Default::default()
            },
        );
        disposing.on(CollectorEvent::Dispose, counting_listener(&fired));
        disposing.dispose(reaction("x"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
