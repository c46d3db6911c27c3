use std::num::NonZeroU64;

use frame::provider::{BLACKLIST_KEY, GLOBAL_SCOPE};
use serenity::{
    model::{id::UserId, mention::Mentionable},
    utils::parse_user_mention,
};

use super::prelude::*;

#[derive(Debug, Default)]
pub struct BlacklistCommand {
    /// Serializes read-modify-write cycles on the stored list
    lock: tokio::sync::Mutex<()>,
}

/// Parse a user mention or a raw user ID
fn parse_user(s: &str) -> Option<UserId> {
    parse_user_mention(s).or_else(|| s.parse::<NonZeroU64>().ok().map(UserId::from))
}

impl BlacklistCommand {
    async fn toggle(&self, env: &Env, user: UserId) -> Result<Reply> {
        let _guard = self.lock.lock().await;
        let mut list: Vec<UserId> =
            provider::get_or(&*env.settings, GLOBAL_SCOPE, BLACKLIST_KEY, vec![]).await?;

        let added = if let Some(idx) = list.iter().position(|&u| u == user) {
            list.remove(idx);
            false
        } else {
            list.push(user);
            true
        };

        provider::set(&*env.settings, GLOBAL_SCOPE, BLACKLIST_KEY, &list).await?;
        info!(%user, added, "Updated user blacklist");

        Ok(Reply::ephemeral(if added {
            format!("{} is now blacklisted.", user.mention())
        } else {
            format!("{} is no longer blacklisted.", user.mention())
        }))
    }
}

#[async_trait]
impl Handler<Env, Reply> for BlacklistCommand {
    fn info(&self) -> CommandInfo {
        CommandInfo::new("blacklist", "Toggle whether the bot ignores a user").owner_only(true)
    }

    fn register(&self, cmd: CreateCommand) -> CreateCommand {
        cmd.add_option(
            CreateCommandOption::new(CommandOptionType::User, "user", "The user to toggle")
                .required(true),
        )
    }

    async fn run(&self, env: &Env, _: &TextMessage, args: Vec<String>) -> Result<Reply> {
        match args.first().map(|a| parse_user(a)) {
            Some(Some(user)) => self.toggle(env, user).await,
            Some(None) => Ok(Reply::ephemeral("That doesn't look like a user.")),
            None => Ok(Reply::ephemeral("Who should be blacklisted?")),
        }
    }

    async fn run_slash(&self, env: &Env, _: &Interaction, args: &[CommandOption]) -> Result<Reply> {
        let user = find_option(args, "user")
            .and_then(frame::OptionValue::as_user)
            .context("Missing required option \"user\"")?;

        self.toggle(env, user).await
    }
}
