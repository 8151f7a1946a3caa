//! Slash-command registration surface.
//!
//! Bots advertise a static list of commands to the protocol at setup time.
//! [`CommandSet`] holds that list, validating names so the advertisement
//! matches what the decoder will produce: lowercased, no leading slash.
//!
//! Argument parsing for incoming command text lives in `skiff-core`
//! ([`skiff_core::parse_command_line`]); this module is only about what
//! the bot declares it supports.

use skiff_core::normalize_command_name;
use thiserror::Error;

/// One advertised slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    name: String,
    description: String,
}

impl CommandSpec {
    /// Returns the command name (lowercased, without the leading slash).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Errors from building the advertised command list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The name is empty or contains characters the protocol rejects.
    #[error("invalid command name `{name}`: {reason}")]
    InvalidName {
        /// The offending name.
        name: String,
        /// Reason for rejection.
        reason: String,
    },

    /// The name was already registered.
    #[error("command `{0}` is already registered")]
    Duplicate(String),
}

/// The static list of commands a bot advertises.
///
/// Append-only and ordered; duplicates are rejected so that one incoming
/// invocation maps to one advertised command.
#[derive(Debug, Clone, Default)]
pub struct CommandSet {
    commands: Vec<CommandSpec>,
}

impl CommandSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command.
    ///
    /// The name is normalized (leading slash stripped, lowercased) before
    /// validation, so `/Ping` and `ping` are the same command.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), CommandError> {
        let raw = name.into();
        let name = normalize_command_name(&raw);

        if name.is_empty() {
            return Err(CommandError::InvalidName {
                name: raw,
                reason: "name is empty".to_owned(),
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(CommandError::InvalidName {
                name: raw,
                reason: "only lowercase letters, digits, `_` and `-` are allowed".to_owned(),
            });
        }
        if self.contains(&name) {
            return Err(CommandError::Duplicate(name));
        }

        self.commands.push(CommandSpec {
            name,
            description: description.into(),
        });
        Ok(())
    }

    /// Returns `true` if `name` (normalized) is registered.
    pub fn contains(&self, name: &str) -> bool {
        let name = normalize_command_name(name);
        self.commands.iter().any(|c| c.name == name)
    }

    /// Returns the advertised commands in registration order.
    pub fn advertised(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
