//! Application-command descriptors.
//!
//! These types form the registration payload handed to the platform: a
//! [`CommandDescriptor`] tree of `{type, name, description, defaultPermission,
//! options}` with nested subcommand-group and subcommand option kinds.
//!
//! Two wire details matter and are enforced here rather than left to
//! callers:
//!
//! - enum tags serialize as the platform's numeric codes, not strings;
//! - an absent `options` field is distinct from an empty list, so options are
//!   carried as `Option<Vec<_>>` and skipped entirely when `None`.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Top-level application command kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandKind {
    /// Slash command invoked from the chat input box. The only kind that
    /// carries an option schema.
    #[default]
    ChatInput = 1,
    /// Context-menu command on a user.
    User = 2,
    /// Context-menu command on a message.
    Message = 3,
}

impl Serialize for CommandKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Platform option type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    SubCommand = 1,
    SubCommandGroup = 2,
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
    Mentionable = 9,
    Number = 10,
    Attachment = 11,
}

impl Serialize for OptionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Platform channel type codes, used to restrict channel options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    GuildText = 0,
    Dm = 1,
    GuildVoice = 2,
    GroupDm = 3,
    GuildCategory = 4,
    GuildAnnouncement = 5,
    AnnouncementThread = 10,
    PublicThread = 11,
    PrivateThread = 12,
    GuildStageVoice = 13,
}

impl Serialize for ChannelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// A predefined value a choice-bearing option accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Display name shown to the user.
    pub name: String,
    /// Value delivered to the handler.
    pub value: ChoiceValue,
}

impl Choice {
    /// Creates a choice from a name and any supported value.
    pub fn new(name: impl Into<String>, value: impl Into<ChoiceValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Value carried by a [`Choice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    String(String),
    Integer(i64),
    Number(f64),
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ChoiceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// The shape of an [`OptionDescriptor`]; exactly one applies per descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionShape {
    /// Plain value option with no extra constraints.
    Plain,
    /// Option restricted to a fixed choice list.
    Choices,
    /// Channel option restricted to specific channel types.
    ChannelRestricted,
}

/// A flat (non-nesting) command option.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDescriptor {
    /// Platform option type.
    #[serde(rename = "type")]
    pub kind: OptionType,
    /// Option name.
    pub name: String,
    /// Option description.
    pub description: String,
    /// Whether the invoker must supply this option.
    pub required: bool,
    /// Fixed choice list, for choice-bearing options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    /// Allowed channel types, for channel-restricted options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_types: Option<Vec<ChannelType>>,
}

impl OptionDescriptor {
    /// Which of the three wire shapes this descriptor takes.
    pub fn shape(&self) -> OptionShape {
        if self.choices.is_some() {
            OptionShape::Choices
        } else if self.channel_types.is_some() {
            OptionShape::ChannelRestricted
        } else {
            OptionShape::Plain
        }
    }
}

/// A subcommand nested under a command or subcommand group.
///
/// `options` is omitted from the wire form entirely when `None`; the platform
/// schema distinguishes a missing field from an empty list.
#[derive(Debug, Clone)]
pub struct SubCommandDescriptor {
    /// Subcommand name.
    pub name: String,
    /// Subcommand description.
    pub description: String,
    /// Flat options, absent when the subcommand resolved none.
    pub options: Option<Vec<OptionDescriptor>>,
}

impl Serialize for SubCommandDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = 3 + usize::from(self.options.is_some());
        let mut state = serializer.serialize_struct("SubCommandDescriptor", fields)?;
        state.serialize_field("type", &OptionType::SubCommand)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("description", &self.description)?;
        if let Some(options) = &self.options {
            state.serialize_field("options", options)?;
        }
        state.end()
    }
}

/// A subcommand group nested directly under a top-level command.
///
/// A group always carries at least one subcommand; the builder rejects a
/// group before producing an empty one.
#[derive(Debug, Clone)]
pub struct SubCommandGroupDescriptor {
    /// Group name.
    pub name: String,
    /// Group description.
    pub description: String,
    /// The group's subcommands, in declaration order.
    pub sub_commands: Vec<SubCommandDescriptor>,
}

impl Serialize for SubCommandGroupDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SubCommandGroupDescriptor", 4)?;
        state.serialize_field("type", &OptionType::SubCommandGroup)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("options", &self.sub_commands)?;
        state.end()
    }
}

/// One entry of a command's top-level option list.
///
/// The platform allows groups, subcommands, and flat options to sit side by
/// side at this level, and declarative sources can legitimately produce that
/// mix, so the list is heterogeneous by design.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandOption {
    /// A subcommand group.
    Group(SubCommandGroupDescriptor),
    /// A direct subcommand.
    SubCommand(SubCommandDescriptor),
    /// A flat value option.
    Value(OptionDescriptor),
}

impl CommandOption {
    /// Returns the flat option, if this entry is one.
    pub fn as_value(&self) -> Option<&OptionDescriptor> {
        match self {
            Self::Value(option) => Some(option),
            _ => None,
        }
    }

    /// Returns the subcommand, if this entry is one.
    pub fn as_sub_command(&self) -> Option<&SubCommandDescriptor> {
        match self {
            Self::SubCommand(sub) => Some(sub),
            _ => None,
        }
    }

    /// Returns the group, if this entry is one.
    pub fn as_group(&self) -> Option<&SubCommandGroupDescriptor> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }
}

/// A fully resolved application command, ready for platform registration.
///
/// Chat-input commands always carry an `options` list (possibly empty);
/// other kinds never do, even when the declaration supplied nested entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDescriptor {
    /// Command kind.
    #[serde(rename = "type")]
    pub kind: CommandKind,
    /// Command name.
    pub name: String,
    /// Command description.
    pub description: String,
    /// Whether the command is enabled by default, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_permission: Option<bool>,
    /// Top-level options; `None` for non-chat-input kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<CommandOption>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_kind_serializes_as_numeric_code() {
        assert_eq!(serde_json::to_value(CommandKind::ChatInput).unwrap(), json!(1));
        assert_eq!(serde_json::to_value(CommandKind::Message).unwrap(), json!(3));
    }

    #[test]
    fn sub_command_without_options_omits_the_field() {
        let sub = SubCommandDescriptor {
            name: "stop".into(),
            description: "Stop playback".into(),
            options: None,
        };
        let value = serde_json::to_value(&sub).unwrap();
        assert_eq!(
            value,
            json!({"type": 1, "name": "stop", "description": "Stop playback"})
        );
        assert!(value.get("options").is_none());
    }

    #[test]
    fn group_carries_numeric_tag_and_nested_sub_commands() {
        let group = SubCommandGroupDescriptor {
            name: "queue".into(),
            description: "Queue management".into(),
            sub_commands: vec![SubCommandDescriptor {
                name: "clear".into(),
                description: "Clear the queue".into(),
                options: None,
            }],
        };
        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["type"], json!(2));
        assert_eq!(value["options"][0]["type"], json!(1));
    }

    #[test]
    fn option_shape_is_discriminated_by_payload() {
        let plain = OptionDescriptor {
            kind: OptionType::String,
            name: "track".into(),
            description: "Track name".into(),
            required: true,
            choices: None,
            channel_types: None,
        };
        assert_eq!(plain.shape(), OptionShape::Plain);

        let restricted = OptionDescriptor {
            kind: OptionType::Channel,
            name: "target".into(),
            description: "Target channel".into(),
            required: false,
            choices: None,
            channel_types: Some(vec![ChannelType::GuildVoice]),
        };
        assert_eq!(restricted.shape(), OptionShape::ChannelRestricted);
    }

    #[test]
    fn descriptor_wire_form_uses_camel_case_and_skips_absent_fields() {
        let descriptor = CommandDescriptor {
            kind: CommandKind::ChatInput,
            name: "play".into(),
            description: "Play a track".into(),
            default_permission: Some(true),
            options: Some(vec![CommandOption::Value(OptionDescriptor {
                kind: OptionType::String,
                name: "track".into(),
                description: "Track name".into(),
                required: true,
                choices: Some(vec![Choice::new("lo-fi", "lofi")]),
                channel_types: None,
            })]),
        };
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["defaultPermission"], json!(true));
        assert_eq!(value["options"][0]["choices"][0]["value"], json!("lofi"));
        assert!(value["options"][0].get("channelTypes").is_none());
    }

    #[test]
    fn non_chat_input_descriptor_has_no_options_key() {
        let descriptor = CommandDescriptor {
            kind: CommandKind::User,
            name: "profile".into(),
            description: "".into(),
            default_permission: None,
            options: None,
        };
        let value = serde_json::to_value(&descriptor).unwrap();
        assert!(value.get("options").is_none());
        assert!(value.get("defaultPermission").is_none());
    }
}
