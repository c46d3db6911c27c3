//! The dispatch pipeline: trigger detection, lookup, authorization and
//! invocation

use crate::{
    auth::{AuthContext, Unauthorized},
    event::{Interaction, TextMessage, TriggerMode},
    prelude::*,
    provider::{self, Provider},
    registry::Registry,
};

mod gate;
mod invoke;

/// Identity and configuration of the bot account doing the dispatching
#[derive(Debug, Clone)]
pub struct ClientInfo {
    /// The bot's own user ID, used to detect mention triggers
    pub user_id: UserId,
    /// The prefix used when no guild or global override is set
    pub default_prefix: String,
    /// Users allowed to run owner-only commands
    pub owners: HashSet<UserId>,
}

impl ClientInfo {
    /// Returns true if the given user is a configured bot owner
    #[inline]
    #[must_use]
    pub fn is_owner(&self, user: UserId) -> bool { self.owners.contains(&user) }
}

/// The result of a single dispatch attempt
#[derive(Debug)]
pub enum Outcome<R> {
    /// A command handler ran and produced this value
    Invoked(R),
    /// The author is blacklisted and the event was dropped
    Filtered,
    /// The event did not invoke a command
    NotTriggered,
    /// The event named a command that does not exist
    NotFound(String),
    /// The command exists but the invocation failed one of its gates
    Unauthorized(Unauthorized),
}

impl<R> Outcome<R> {
    /// A short name for this outcome, for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Invoked(_) => "invoked",
            Self::Filtered => "filtered",
            Self::NotTriggered => "not_triggered",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
        }
    }
}

/// A failure that prevented a dispatch from reaching an [`Outcome`]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The settings store could not be read
    #[error("Error reading setting {key:?} in scope {scope:?}")]
    Settings {
        /// The scope being read
        scope: String,
        /// The key being read
        key: &'static str,
        /// The underlying error
        #[source]
        source: anyhow::Error,
    },
    /// The invoked command handler failed
    #[error("Error running command {name:?} ({mode})")]
    Handler {
        /// The resolved command name
        name: String,
        /// How the command was triggered
        mode: TriggerMode,
        /// The error returned by the handler
        #[source]
        source: anyhow::Error,
    },
}

/// A recognized command invocation, ready to be resolved
#[derive(Debug, Clone, Copy)]
pub enum Invocation<'a> {
    /// A text message beginning with `prefix`
    Prefix {
        /// The triggering message
        msg: &'a TextMessage,
        /// The prefix the message content starts with
        prefix: &'a str,
    },
    /// A text message mentioning the bot
    Mention(&'a TextMessage),
    /// An application command interaction
    Slash(&'a Interaction),
}

impl Invocation<'_> {
    /// The trigger mode this invocation was recognized by
    #[must_use]
    pub fn mode(&self) -> TriggerMode {
        match self {
            Self::Prefix { .. } => TriggerMode::Prefix,
            Self::Mention(_) => TriggerMode::Mention,
            Self::Slash(_) => TriggerMode::Slash,
        }
    }

    /// Derive the authorization facts for this invocation
    #[must_use]
    pub fn auth_context(&self, client: &ClientInfo) -> AuthContext {
        let (user, member, bot) = match *self {
            Self::Prefix { msg, .. } | Self::Mention(msg) => {
                (msg.author, msg.member_permissions, msg.bot_permissions)
            },
            Self::Slash(int) => (int.user, int.member_permissions, int.app_permissions),
        };

        AuthContext {
            member: member.unwrap_or_else(Permissions::empty),
            bot: bot.unwrap_or_else(Permissions::empty),
            is_owner: client.is_owner(user),
        }
    }
}

/// Routes inbound events to registered commands
///
/// `C` is the host context passed through to command handlers, and `R` is the
/// value handlers produce.
pub struct Dispatcher<C, R> {
    provider: Arc<dyn Provider>,
    registry: Registry<C, R>,
    client: ClientInfo,
}

impl<C, R> fmt::Debug for Dispatcher<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("provider", &self.provider)
            .field("registry", &self.registry)
            .field("client", &self.client)
            .finish()
    }
}

impl<C, R> Dispatcher<C, R> {
    /// Construct a dispatcher from its collaborators
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>, registry: Registry<C, R>, client: ClientInfo) -> Self {
        Self {
            provider,
            registry,
            client,
        }
    }

    /// The settings store consulted for blacklists and prefixes
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &Arc<dyn Provider> { &self.provider }

    /// The commands this dispatcher can invoke
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry<C, R> { &self.registry }

    /// The identity of the dispatching bot
    #[inline]
    #[must_use]
    pub fn client(&self) -> &ClientInfo { &self.client }

    async fn setting<T: serde::de::DeserializeOwned>(
        &self,
        scope: &str,
        key: &'static str,
        default: T,
    ) -> Result<T, Error> {
        provider::get_or(&*self.provider, scope, key, default)
            .await
            .map_err(|source| Error::Settings {
                scope: scope.to_owned(),
                key,
                source,
            })
    }
}
