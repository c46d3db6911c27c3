mod blacklist;
mod echo;
mod help;
mod ping;
mod prefix;

use prelude::Arc;

pub(self) mod prelude {
    pub use frame::{
        find_option, provider, Command as Handler, CommandInfo, CommandOption, Interaction,
        Provider as _, TextMessage,
    };
    pub use serenity::{
        builder::{CreateCommand, CreateCommandOption},
        model::{application::CommandOptionType, permissions::Permissions},
    };

    pub use super::{Env, Reply};
    pub use crate::prelude::*;
}

/// Host state shared with every command handler
#[derive(Debug)]
pub struct Env {
    pub settings: Arc<dyn frame::Provider>,
    pub catalog: Vec<frame::CommandInfo>,
    pub default_prefix: String,
}

/// The response a command wants sent back to its invoker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub ephemeral: bool,
}

impl Reply {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

pub fn list() -> Vec<prelude::Arc<dyn prelude::Handler<Env, Reply>>> {
    vec![
        Arc::new(blacklist::BlacklistCommand::default()),
        Arc::new(echo::EchoCommand),
        Arc::new(help::HelpCommand),
        Arc::new(ping::PingCommand),
        Arc::new(prefix::PrefixCommand),
    ]
}
