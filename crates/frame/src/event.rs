//! Transport-independent views of the events the dispatcher consumes

use crate::prelude::*;

/// How a command invocation was recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerMode {
    /// The message content began with the guild's command prefix
    Prefix,
    /// The message mentioned the bot, and the command follows the mention
    Mention,
    /// A platform-native application command interaction
    Slash,
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Prefix => "prefix",
            Self::Mention => "mention",
            Self::Slash => "slash",
        })
    }
}

/// A plain text message sent in a guild channel or a DM
#[derive(Debug, Clone)]
pub struct TextMessage {
    /// The author of the message
    pub author: UserId,
    /// Whether the author is a bot account
    pub author_is_bot: bool,
    /// The guild the message was sent in, or `None` for DMs
    pub guild_id: Option<GuildId>,
    /// Raw message content
    pub content: String,
    /// Users mentioned by the message
    pub mentions: Vec<UserId>,
    /// Guild permissions of the author, if known
    pub member_permissions: Option<Permissions>,
    /// Guild permissions of the bot itself, if known
    pub bot_permissions: Option<Permissions>,
}

impl TextMessage {
    /// Construct a message with no mentions and no permission data
    #[must_use]
    pub fn new(author: UserId, guild_id: Option<GuildId>, content: impl Into<String>) -> Self {
        Self {
            author,
            author_is_bot: false,
            guild_id,
            content: content.into(),
            mentions: vec![],
            member_permissions: None,
            bot_permissions: None,
        }
    }

    /// Returns true if this message mentions the given user
    #[inline]
    #[must_use]
    pub fn mentions_user(&self, user: UserId) -> bool { self.mentions.contains(&user) }
}

/// The type of an inbound interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// An application (slash, user or message) command
    Command,
    /// An autocomplete request for a command option
    Autocomplete,
    /// A message component (button, select menu) interaction
    Component,
    /// A modal submission
    ModalSubmit,
    /// A ping, or an interaction type not known to this crate
    Other,
}

/// An interaction received from the platform
#[derive(Debug, Clone)]
pub struct Interaction {
    /// What kind of interaction this is
    pub kind: InteractionKind,
    /// The invoked command's name
    pub command_name: String,
    /// The structured options supplied with the command
    pub options: Vec<CommandOption>,
    /// The invoking user
    pub user: UserId,
    /// The guild the interaction occurred in, or `None` for DMs
    pub guild_id: Option<GuildId>,
    /// Permissions of the invoking member, if in a guild
    pub member_permissions: Option<Permissions>,
    /// Permissions of the bot in the interaction's channel, if known
    pub app_permissions: Option<Permissions>,
}

impl Interaction {
    /// Construct a command interaction with no options and no permission data
    #[must_use]
    pub fn command(user: UserId, guild_id: Option<GuildId>, name: impl Into<String>) -> Self {
        Self {
            kind: InteractionKind::Command,
            command_name: name.into(),
            options: vec![],
            user,
            guild_id,
            member_permissions: None,
            app_permissions: None,
        }
    }

    /// Look up a top-level option by name
    #[inline]
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&OptionValue> { find_option(&self.options, name) }
}

/// A single named option of a command interaction
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    /// The option name
    pub name: String,
    /// The value supplied for the option
    pub value: OptionValue,
}

/// Look up an option by name in an option list
#[must_use]
pub fn find_option<'a>(opts: &'a [CommandOption], name: &str) -> Option<&'a OptionValue> {
    opts.iter().find(|o| o.name == name).map(|o| &o.value)
}

/// The value of a command option
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// A string value
    String(String),
    /// An integer value
    Integer(i64),
    /// A boolean value
    Boolean(bool),
    /// A real (decimal) numeric value
    Number(f64),
    /// A user reference
    User(UserId),
    /// A channel reference, by raw ID
    Channel(u64),
    /// A role reference, by raw ID
    Role(u64),
    /// A subcommand and its options
    SubCommand(Vec<CommandOption>),
    /// A subcommand group and its subcommands
    SubCommandGroup(Vec<CommandOption>),
    /// A value of a type not known to this crate
    Unknown,
}

impl OptionValue {
    /// Returns the contained string, if this is a string value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained user, if this is a user value
    #[must_use]
    pub fn as_user(&self) -> Option<UserId> {
        match *self {
            Self::User(u) => Some(u),
            _ => None,
        }
    }
}
