use super::prelude::*;

#[derive(Debug)]
pub struct EchoCommand;

fn echo(text: &str) -> Reply {
    if text.trim().is_empty() {
        Reply::ephemeral("Nothing to say!")
    } else {
        Reply::plain(text)
    }
}

#[async_trait]
impl Handler<Env, Reply> for EchoCommand {
    fn info(&self) -> CommandInfo { CommandInfo::new("echo", "Say something!").alias("say") }

    fn register(&self, cmd: CreateCommand) -> CreateCommand {
        cmd.add_option(
            CreateCommandOption::new(CommandOptionType::String, "text", "The text to repeat")
                .required(true),
        )
    }

    async fn run(&self, _: &Env, _: &TextMessage, args: Vec<String>) -> Result<Reply> {
        Ok(echo(&args.join(" ")))
    }

    async fn run_slash(&self, _: &Env, _: &Interaction, args: &[CommandOption]) -> Result<Reply> {
        let text = find_option(args, "text")
            .and_then(|v| v.as_str())
            .context("Missing required option \"text\"")?;

        Ok(echo(text))
    }
}
