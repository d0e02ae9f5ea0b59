//! Gateway event model.
//!
//! Incoming platform events are modelled as a tagged union ([`GatewayEvent`])
//! with an explicit kind tag ([`EventKind`]). Dispatch code checks the tag
//! once at the boundary instead of probing payload shapes, so structurally
//! similar events (a message and a component interaction both carry a
//! channel) stay semantically distinct.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique platform identifier (snowflake).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Snowflake(pub u64);

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Snowflake {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// A chat message delivered by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier.
    pub id: Snowflake,
    /// Channel the message was posted in.
    pub channel_id: Snowflake,
    /// Author identifier.
    pub author_id: Snowflake,
    /// Whether the author is a bot account.
    #[serde(default)]
    pub author_is_bot: bool,
    /// Raw text content.
    pub content: String,
}

/// A command or component interaction delivered by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Interaction identifier.
    pub id: Snowflake,
    /// Channel the interaction originated from.
    pub channel_id: Snowflake,
    /// User who triggered the interaction.
    pub user_id: Snowflake,
    /// Custom identifier of the component that fired, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
}

/// A reaction added to (or removed from) a message.
///
/// Reactions never fire as top-level gateway events in this crate; they only
/// flow through live reaction collectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    /// Message the reaction belongs to.
    pub message_id: Snowflake,
    /// User who reacted.
    pub user_id: Snowflake,
    /// Emoji name or unicode literal.
    pub emoji: String,
}

/// High-level classification of gateway events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A message was created.
    MessageCreate,
    /// An interaction was created.
    InteractionCreate,
    /// The gateway handshake completed.
    Ready,
}

impl EventKind {
    /// Wire-style name of the event kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MessageCreate => "messageCreate",
            Self::InteractionCreate => "interactionCreate",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged union of the gateway events this framework consumes.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// A message was created; carries the full message.
    MessageCreate(Message),
    /// An interaction was created; carries the full interaction.
    InteractionCreate(Interaction),
    /// Connection handshake completed; carries no payload this crate uses.
    Ready,
}

impl GatewayEvent {
    /// Returns the kind tag for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MessageCreate(_) => EventKind::MessageCreate,
            Self::InteractionCreate(_) => EventKind::InteractionCreate,
            Self::Ready => EventKind::Ready,
        }
    }

    /// Returns the message payload when this is a message-created event.
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::MessageCreate(message) => Some(message),
            _ => None,
        }
    }

    /// Returns the interaction payload when this is an interaction-created event.
    pub fn as_interaction(&self) -> Option<&Interaction> {
        match self {
            Self::InteractionCreate(interaction) => Some(interaction),
            _ => None,
        }
    }

    /// Channel the event occurred in, when one exists.
    pub fn channel_id(&self) -> Option<Snowflake> {
        match self {
            Self::MessageCreate(message) => Some(message.channel_id),
            Self::InteractionCreate(interaction) => Some(interaction.channel_id),
            Self::Ready => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> Message {
        Message {
            id: Snowflake(10),
            channel_id: Snowflake(20),
            author_id: Snowflake(30),
            author_is_bot: false,
            content: "hello".into(),
        }
    }

    #[test]
    fn kind_tags_match_variants() {
        assert_eq!(
            GatewayEvent::MessageCreate(message()).kind(),
            EventKind::MessageCreate
        );
        assert_eq!(GatewayEvent::Ready.kind(), EventKind::Ready);
    }

    #[test]
    fn channel_id_present_only_for_channel_scoped_events() {
        assert_eq!(
            GatewayEvent::MessageCreate(message()).channel_id(),
            Some(Snowflake(20))
        );
        assert_eq!(GatewayEvent::Ready.channel_id(), None);
    }

    #[test]
    fn payload_accessors_reject_other_variants() {
        let event = GatewayEvent::MessageCreate(message());
        assert!(event.as_message().is_some());
        assert!(event.as_interaction().is_none());
    }
}
