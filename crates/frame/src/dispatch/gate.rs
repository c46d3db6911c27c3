use super::{Dispatcher, Error, Invocation, Outcome};
use crate::{
    event::{Interaction, InteractionKind, TextMessage},
    prelude::*,
    provider::{BLACKLIST_KEY, GLOBAL_SCOPE, PREFIX_KEY},
};

impl<C: Sync, R: Send> Dispatcher<C, R> {
    /// Decide whether a text message invokes a command, and invoke it if so
    ///
    /// Blacklisted authors are filtered before anything else is considered.
    /// Otherwise, a message beginning with the effective prefix for its guild
    /// is a prefix invocation, and a message mentioning the bot is a mention
    /// invocation.
    ///
    /// # Errors
    /// Fails if the settings store cannot be read or the invoked handler
    /// fails.
    #[instrument(
        level = "debug",
        skip_all,
        fields(author = %msg.author, guild = ?msg.guild_id),
    )]
    pub async fn handle_message(&self, ctx: &C, msg: &TextMessage) -> Result<Outcome<R>, Error> {
        let blacklist: Vec<UserId> = self.setting(GLOBAL_SCOPE, BLACKLIST_KEY, vec![]).await?;

        if blacklist.contains(&msg.author) {
            trace!("Dropping message from blacklisted user");
            return Ok(Outcome::Filtered);
        }

        if msg.author_is_bot {
            return Ok(Outcome::NotTriggered);
        }

        let scope = msg
            .guild_id
            .map_or_else(|| GLOBAL_SCOPE.to_owned(), |g| g.to_string());
        let prefix: String = self
            .setting(&scope, PREFIX_KEY, self.client.default_prefix.clone())
            .await?;

        if !prefix.is_empty() && msg.content.starts_with(&prefix) {
            return self
                .invoke(ctx, Invocation::Prefix {
                    msg,
                    prefix: &prefix,
                })
                .await;
        }

        if msg.mentions_user(self.client.user_id) {
            return self.invoke(ctx, Invocation::Mention(msg)).await;
        }

        Ok(Outcome::NotTriggered)
    }

    /// Invoke the command named by an application command interaction
    ///
    /// Interactions other than commands are not dispatched.
    ///
    /// # Errors
    /// Fails if the invoked handler fails.
    #[instrument(level = "debug", skip_all, fields(user = %int.user, guild = ?int.guild_id))]
    pub async fn handle_interaction(
        &self,
        ctx: &C,
        int: &Interaction,
    ) -> Result<Outcome<R>, Error> {
        if int.kind != InteractionKind::Command {
            return Ok(Outcome::NotTriggered);
        }

        self.invoke(ctx, Invocation::Slash(int)).await
    }
}
