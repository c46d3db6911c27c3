//! The command handler contract

use serenity::builder::CreateCommand;

use crate::{
    event::{CommandOption, Interaction, TextMessage},
    prelude::*,
};

/// Static metadata describing a command and its gates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    /// The command name, normalized to lowercase
    pub name: String,
    /// A short human-readable description
    pub description: String,
    /// Alternate names the command may be invoked by in text mode
    pub aliases: Vec<String>,
    /// Permissions the bot must hold for the command to run
    pub client_permissions: Permissions,
    /// Permissions the invoking member must hold
    pub user_permissions: Permissions,
    /// Whether only bot owners may invoke the command
    pub owner_only: bool,
}

impl CommandInfo {
    /// Describe a command with no gates
    #[must_use]
    pub fn new(name: impl AsRef<str>, description: impl Into<String>) -> Self {
        Self {
            name: name.as_ref().to_lowercase(),
            description: description.into(),
            aliases: vec![],
            client_permissions: Permissions::empty(),
            user_permissions: Permissions::empty(),
            owner_only: false,
        }
    }

    /// Add an alternate name
    #[must_use]
    pub fn alias(mut self, alias: impl AsRef<str>) -> Self {
        self.aliases.push(alias.as_ref().to_lowercase());
        self
    }

    /// Require the bot to hold the given permissions
    #[must_use]
    pub fn client_permissions(mut self, perms: Permissions) -> Self {
        self.client_permissions |= perms;
        self
    }

    /// Require the invoking member to hold the given permissions
    #[must_use]
    pub fn user_permissions(mut self, perms: Permissions) -> Self {
        self.user_permissions |= perms;
        self
    }

    /// Restrict the command to bot owners
    #[must_use]
    pub fn owner_only(mut self, owner_only: bool) -> Self {
        self.owner_only = owner_only;
        self
    }
}

/// A runnable command
///
/// `C` is the host context handed through to every handler and `R` is the
/// value a successful handler produces.  Exactly one of [`run`](Self::run) or
/// [`run_slash`](Self::run_slash) is called per dispatch, selected by how the
/// command was triggered.
#[async_trait]
pub trait Command<C, R>: fmt::Debug + Send + Sync {
    /// Describe this command
    fn info(&self) -> CommandInfo;

    /// Customize the application command pushed to the platform for this
    /// command.  The builder arrives with the name and description set.
    fn register(&self, cmd: CreateCommand) -> CreateCommand { cmd }

    /// Run the command from a prefixed or mentioning text message
    async fn run(&self, ctx: &C, msg: &TextMessage, args: Vec<String>) -> Result<R>;

    /// Run the command from a slash command interaction
    async fn run_slash(&self, ctx: &C, int: &Interaction, args: &[CommandOption]) -> Result<R>;
}
