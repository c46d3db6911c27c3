use frame::provider::PREFIX_KEY;
use serenity::model::id::GuildId;

use super::prelude::*;

const MAX_LEN: usize = 16;

#[derive(Debug)]
pub struct PrefixCommand;

/// Where and by whom the prefix is being read or changed
#[derive(Debug, Clone, Copy)]
struct Scope {
    guild: Option<GuildId>,
    member: Option<Permissions>,
}

impl Scope {
    fn can_change(self) -> bool {
        self.member
            .is_some_and(|p| p.contains(Permissions::MANAGE_GUILD))
    }
}

impl PrefixCommand {
    async fn apply(env: &Env, scope: Scope, new: Option<&str>) -> Result<Reply> {
        let Some(guild) = scope.guild else {
            return Ok(Reply::ephemeral("Prefixes can only be changed in a server."));
        };
        let key_scope = guild.to_string();

        if new.is_some() && !scope.can_change() {
            return Ok(Reply::ephemeral(
                "You need the Manage Server permission to change the prefix.",
            ));
        }

        match new {
            None => {
                let curr = provider::get_or(
                    &*env.settings,
                    &key_scope,
                    PREFIX_KEY,
                    env.default_prefix.clone(),
                )
                .await?;
                Ok(Reply::plain(format!("The command prefix here is `{curr}`")))
            },
            Some("reset") => {
                env.settings.remove(&key_scope, PREFIX_KEY).await?;
                Ok(Reply::plain(format!(
                    "Command prefix reset to `{}`",
                    env.default_prefix
                )))
            },
            Some(p) if p.is_empty() || p.len() > MAX_LEN || p.contains(char::is_whitespace) => {
                Ok(Reply::ephemeral(format!(
                    "Prefixes must be 1 to {MAX_LEN} characters with no spaces."
                )))
            },
            Some(p) => {
                provider::set(&*env.settings, &key_scope, PREFIX_KEY, p).await?;
                info!(%guild, prefix = p, "Changed command prefix");
                Ok(Reply::plain(format!("Command prefix set to `{p}`")))
            },
        }
    }
}

#[async_trait]
impl Handler<Env, Reply> for PrefixCommand {
    fn info(&self) -> CommandInfo {
        CommandInfo::new("prefix", "Show or change the command prefix for this server")
    }

    fn register(&self, cmd: CreateCommand) -> CreateCommand {
        cmd.add_option(CreateCommandOption::new(
            CommandOptionType::String,
            "prefix",
            "The new prefix, or \"reset\" to restore the default",
        ))
    }

    async fn run(&self, env: &Env, msg: &TextMessage, args: Vec<String>) -> Result<Reply> {
        let scope = Scope {
            guild: msg.guild_id,
            member: msg.member_permissions,
        };

        Self::apply(env, scope, args.first().map(String::as_str)).await
    }

    async fn run_slash(&self, env: &Env, int: &Interaction, args: &[CommandOption]) -> Result<Reply> {
        let scope = Scope {
            guild: int.guild_id,
            member: int.member_permissions,
        };

        Self::apply(env, scope, find_option(args, "prefix").and_then(|v| v.as_str())).await
    }
}

#[cfg(test)]
mod tests {
    use frame::{provider, Command, Provider as _, TextMessage};
    use serenity::model::permissions::Permissions;

    use super::PrefixCommand;
    use crate::client::commands::test_util::{args, env, msg, GUILD, USER};

    fn manager(content: &str) -> TextMessage {
        let mut msg = msg(content);
        msg.member_permissions = Some(Permissions::MANAGE_GUILD);
        msg
    }

    async fn stored(env: &super::Env) -> Option<String> {
        provider::get_or(&*env.settings, &GUILD.to_string(), "prefix", None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_show_set_reset() {
        let env = env(vec![]);

        let reply = PrefixCommand.run(&env, &msg("!prefix"), vec![]).await.unwrap();
        assert_eq!(reply.content, "The command prefix here is `!`");

        let reply = PrefixCommand
            .run(&env, &manager("!prefix q!"), args(&["q!"]))
            .await
            .unwrap();
        assert_eq!(reply.content, "Command prefix set to `q!`");
        assert_eq!(stored(&env).await.as_deref(), Some("q!"));

        let reply = PrefixCommand.run(&env, &msg("q!prefix"), vec![]).await.unwrap();
        assert_eq!(reply.content, "The command prefix here is `q!`");

        PrefixCommand
            .run(&env, &manager("q!prefix reset"), args(&["reset"]))
            .await
            .unwrap();
        assert_eq!(stored(&env).await, None);
    }

    #[tokio::test]
    async fn test_rejects_bad_prefix() {
        let env = env(vec![]);

        let reply = PrefixCommand
            .run(&env, &manager("!prefix"), args(&["waytoolongforaprefix"]))
            .await
            .unwrap();
        assert!(reply.ephemeral);
        assert_eq!(stored(&env).await, None);
    }

    #[tokio::test]
    async fn test_dm() {
        let env = env(vec![]);
        let dm = TextMessage::new(USER, None, "!prefix ?");

        let reply = PrefixCommand.run(&env, &dm, args(&["?"])).await.unwrap();
        assert!(reply.ephemeral);
        assert!(env.settings.get("global", "prefix").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_requires_manage_guild() {
        let env = env(vec![]);
        let mut m = msg("!prefix q!");
        m.member_permissions = Some(Permissions::SEND_MESSAGES);

        let reply = PrefixCommand.run(&env, &m, args(&["q!"])).await.unwrap();
        assert!(reply.ephemeral);
        assert_eq!(stored(&env).await, None);

        let reply = PrefixCommand.run(&env, &m, vec![]).await.unwrap();
        assert_eq!(reply.content, "The command prefix here is `!`");
    }
}
