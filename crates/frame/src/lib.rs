//! Command resolution and authorization for Serenity bots.
//!
//! A [`Dispatcher`] takes inbound text messages and interactions, decides
//! whether they invoke a command (by prefix, by mentioning the bot, or as a
//! slash command), checks the command's permission and ownership gates, and
//! runs the matching handler.

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod command;
pub mod dispatch;
pub mod event;
pub mod provider;
pub mod registry;

pub use auth::{AuthContext, Unauthorized};
pub use command::{Command, CommandInfo};
pub use dispatch::{ClientInfo, Dispatcher, Error, Invocation, Outcome};
pub use event::{
    find_option, CommandOption, Interaction, InteractionKind, OptionValue, TextMessage,
    TriggerMode,
};
pub use provider::{MemoryProvider, Provider};
pub use registry::{Registry, RegistryError};

mod prelude {
    pub use std::{fmt, sync::Arc};

    pub use anyhow::Context as _;
    pub use async_trait::async_trait;
    pub use hashbrown::{HashMap, HashSet};
    pub use serenity::model::{
        id::{GuildId, UserId},
        permissions::Permissions,
    };
    pub use tracing::{debug, instrument, trace};

    pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
}
