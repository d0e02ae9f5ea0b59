//! Prefix-command matching.
//!
//! Prefix commands are plain chat messages starting with a configurable
//! sigil (`!play lofi`). The matcher holds the registered prefix-command
//! declarations and, given an incoming message, finds the first declaration
//! it satisfies and prepares the content the handler should see.

use parking_lot::RwLock;
use tracing::trace;

use braid_core::Message;

use crate::handler::TypeKey;
use crate::metadata::PrefixCommandMeta;

/// Outcome of a successful prefix match.
#[derive(Debug, Clone)]
pub struct PrefixMatch {
    /// Handler type that owns the matched command.
    pub handler: TypeKey,
    /// Matched command name.
    pub command: String,
    /// Message content after the declaration's strip flags were applied.
    pub content: String,
    /// Whether the declaration asks for the triggering message's removal.
    pub remove_message: bool,
}

/// Registry and matcher for prefix-command declarations.
///
/// Declarations match in registration order; the first hit wins.
#[derive(Default)]
pub struct PrefixMatcher {
    entries: RwLock<Vec<(TypeKey, PrefixCommandMeta)>>,
}

impl PrefixMatcher {
    /// Creates an empty matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a prefix-command declaration for a handler type.
    pub fn register(&self, handler: TypeKey, meta: PrefixCommandMeta) {
        self.entries.write().push((handler, meta));
    }

    /// Number of registered declarations.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no declaration is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Matches a message against the registered declarations.
    ///
    /// `global_prefix` applies to declarations without a per-command prefix
    /// override. Command names compare case-insensitively and must end at a
    /// word boundary, so `!play` does not match `!playlist`.
    pub fn match_message(&self, message: &Message, global_prefix: &str) -> Option<PrefixMatch> {
        for (handler, meta) in self.entries.read().iter() {
            if meta.ignore_bot_message && message.author_is_bot {
                continue;
            }

            let prefix = meta.prefix.as_deref().unwrap_or(global_prefix);
            let Some(after_prefix) = message.content.strip_prefix(prefix) else {
                continue;
            };
            let first_word = after_prefix
                .split_whitespace()
                .next()
                .unwrap_or(after_prefix);
            if !first_word.eq_ignore_ascii_case(&meta.name) {
                continue;
            }

            trace!(command = %meta.name, "prefix command matched");
            return Some(PrefixMatch {
                handler: *handler,
                command: meta.name.clone(),
                content: forwarded_content(&message.content, prefix, first_word, meta),
                remove_message: meta.remove_message,
            });
        }
        None
    }
}

/// Applies the declaration's strip flags to the raw message content.
fn forwarded_content(
    raw: &str,
    prefix: &str,
    matched_name: &str,
    meta: &PrefixCommandMeta,
) -> String {
    // The name sits right after the prefix, so it can be stripped there
    // whether or not the prefix itself is kept.
    let mut rest = raw.strip_prefix(prefix).unwrap_or(raw);
    if meta.remove_command_name {
        rest = rest.strip_prefix(matched_name).unwrap_or(rest).trim_start();
    }
    if meta.remove_prefix {
        rest.to_string()
    } else {
        format!("{prefix}{rest}")
    }
}
