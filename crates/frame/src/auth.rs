//! Permission and ownership gating for command invocations

use crate::{command::CommandInfo, prelude::*};

/// The facts needed to authorize a single invocation
///
/// This is derived fresh from each event and never cached, since permissions
/// and the owner list may change between invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// Permissions held by the invoking member
    pub member: Permissions,
    /// Permissions held by the bot itself
    pub bot: Permissions,
    /// Whether the invoking user is a configured bot owner
    pub is_owner: bool,
}

/// The reason an invocation was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Unauthorized {
    /// The bot lacks permissions the command needs to run
    #[error("Bot is missing permissions: {0}")]
    ClientPermissions(Permissions),
    /// The invoking member lacks permissions the command requires
    #[error("User is missing permissions: {0}")]
    UserPermissions(Permissions),
    /// The command is restricted to bot owners
    #[error("Command is restricted to bot owners")]
    OwnerOnly,
}

impl Unauthorized {
    /// A short machine-readable name for this rejection reason
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ClientPermissions(_) => "client_permissions",
            Self::UserPermissions(_) => "user_permissions",
            Self::OwnerOnly => "owner_only",
        }
    }
}

/// Returns the subset of `required` not contained in `held`, or `None` if every
/// required permission is held
#[inline]
fn missing(required: Permissions, held: Permissions) -> Option<Permissions> {
    let missing = required.difference(held);
    (!missing.is_empty()).then_some(missing)
}

impl AuthContext {
    /// Check a command's gates against this context
    ///
    /// Checks run in a fixed order (bot permissions, then user permissions,
    /// then ownership) and stop at the first failure.
    ///
    /// # Errors
    /// Returns the first gate the invocation fails.
    pub fn authorize(&self, info: &CommandInfo) -> Result<(), Unauthorized> {
        if let Some(perms) = missing(info.client_permissions, self.bot) {
            return Err(Unauthorized::ClientPermissions(perms));
        }

        if let Some(perms) = missing(info.user_permissions, self.member) {
            return Err(Unauthorized::UserPermissions(perms));
        }

        if info.owner_only && !self.is_owner {
            return Err(Unauthorized::OwnerOnly);
        }

        Ok(())
    }
}
