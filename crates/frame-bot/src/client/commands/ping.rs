use super::prelude::*;

#[derive(Debug)]
pub struct PingCommand;

#[async_trait]
impl Handler<Env, Reply> for PingCommand {
    fn info(&self) -> CommandInfo {
        CommandInfo::new("ping", "Check that the bot is listening")
    }

    async fn run(&self, _: &Env, _: &TextMessage, _: Vec<String>) -> Result<Reply> {
        Ok(Reply::plain("Pong!"))
    }

    async fn run_slash(&self, _: &Env, _: &Interaction, _: &[CommandOption]) -> Result<Reply> {
        Ok(Reply::ephemeral("Pong!"))
    }
}
