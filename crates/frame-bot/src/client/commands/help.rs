use std::fmt::Write;

use frame::provider::{GLOBAL_SCOPE, PREFIX_KEY};

use super::prelude::*;

#[derive(Debug)]
pub struct HelpCommand;

fn render(env: &Env, prefix: &str) -> String {
    let mut s = String::from("**Commands**\n");

    for info in &env.catalog {
        write!(s, "`{prefix}{}` - {}", info.name, info.description).unwrap();

        if !info.aliases.is_empty() {
            write!(s, " (also: {})", info.aliases.join(", ")).unwrap();
        }

        if info.owner_only {
            s.push_str(" *(owner only)*");
        }

        s.push('\n');
    }

    s
}

#[async_trait]
impl Handler<Env, Reply> for HelpCommand {
    fn info(&self) -> CommandInfo { CommandInfo::new("help", "List available commands") }

    async fn run(&self, env: &Env, msg: &TextMessage, _: Vec<String>) -> Result<Reply> {
        let scope = msg
            .guild_id
            .map_or_else(|| GLOBAL_SCOPE.to_owned(), |g| g.to_string());
        let prefix =
            provider::get_or(&*env.settings, &scope, PREFIX_KEY, env.default_prefix.clone())
                .await?;

        Ok(Reply::plain(render(env, &prefix)))
    }

    async fn run_slash(&self, env: &Env, _: &Interaction, _: &[CommandOption]) -> Result<Reply> {
        Ok(Reply::ephemeral(render(env, "/")))
    }
}

#[cfg(test)]
mod tests {
    use frame::{provider, Command, CommandInfo, Interaction};

    use super::HelpCommand;
    use crate::client::commands::test_util::{env, msg, GUILD, USER};

    fn catalog() -> Vec<CommandInfo> {
        vec![
            CommandInfo::new("blacklist", "Toggle a user").owner_only(true),
            CommandInfo::new("echo", "Say something!").alias("say"),
        ]
    }

    #[tokio::test]
    async fn test_help_text() {
        let env = env(catalog());
        provider::set(&*env.settings, &GUILD.to_string(), "prefix", "q!")
            .await
            .unwrap();

        let reply = HelpCommand.run(&env, &msg("q!help"), vec![]).await.unwrap();
        assert_eq!(
            reply.content,
            "**Commands**\n`q!blacklist` - Toggle a user *(owner only)*\n`q!echo` - Say \
             something! (also: say)\n"
        );
    }

    #[tokio::test]
    async fn test_help_slash() {
        let env = env(catalog());
        let int = Interaction::command(USER, None, "help");

        let reply = HelpCommand.run_slash(&env, &int, &[]).await.unwrap();
        assert!(reply.ephemeral);
        assert!(reply.content.contains("`/echo` - Say something!"));
    }
}
