use frame::{Dispatcher, Error as DispatchError, Outcome, Unauthorized};
use serenity::{
    builder::{CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage},
    model::{
        application::{Command as AppCommand, Interaction},
        channel::Message,
        gateway::Ready,
    },
    prelude::*,
};

use super::{
    commands::{Env, Reply},
    convert,
};
use crate::prelude::*;

#[derive(Debug)]
pub struct Handler {
    dispatch: Dispatcher<Env, Reply>,
    env: Env,
}

impl Handler {
    pub fn new_rc(dispatch: Dispatcher<Env, Reply>, env: Env) -> Arc<Self> {
        Arc::new(Self { dispatch, env })
    }

    fn app_commands(&self) -> Vec<CreateCommand> {
        self.dispatch
            .registry()
            .iter()
            .map(|entry| {
                let info = entry.info();
                let mut cmd = CreateCommand::new(&info.name).description(&info.description);

                if !info.user_permissions.is_empty() {
                    cmd = cmd.default_member_permissions(info.user_permissions);
                }

                entry.handler().register(cmd)
            })
            .collect()
    }
}

#[instrument(skip(f))]
async fn handler(method: &'static str, f: impl Future<Output = Result<()>>) {
    match f.await {
        Ok(()) => (),
        Err(e) => error!("Error in {method}: {e:?}"),
    }
}

fn describe_unauthorized(why: Unauthorized) -> String {
    match why {
        Unauthorized::ClientPermissions(p) => {
            format!("I need the following permissions to do that: {p}")
        },
        Unauthorized::UserPermissions(p) => {
            format!("You need the following permissions to do that: {p}")
        },
        Unauthorized::OwnerOnly => "Only bot owners can use that command.".into(),
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        handler("message", async move {
            let event = convert::text_message(&ctx, &msg, self.dispatch.client().user_id);

            let reply = match self.dispatch.handle_message(&self.env, &event).await {
                Ok(Outcome::Invoked(reply)) => reply.content,
                Ok(Outcome::Filtered | Outcome::NotTriggered) => return Ok(()),
                Ok(Outcome::NotFound(name)) => {
                    debug!(%name, "Ignoring unknown text command");
                    return Ok(());
                },
                Ok(Outcome::Unauthorized(why)) => describe_unauthorized(why),
                Err(err @ DispatchError::Handler { .. }) => {
                    error!(?err, "Unexpected error handling command");
                    "Unexpected error running that command.".into()
                },
                Err(err) => return Err(err.into()),
            };

            msg.reply(&ctx, reply)
                .await
                .context("Error sending reply")?;

            Ok(())
        })
        .await;
    }

    async fn interaction_create(&self, ctx: Context, int: Interaction) {
        handler("interaction_create", async move {
            let Some(event) = convert::interaction(&int) else {
                if cfg!(debug_assertions) {
                    warn!("Unknown interaction {int:?}");
                }
                return Ok(());
            };

            let reply = match self.dispatch.handle_interaction(&self.env, &event).await {
                Ok(Outcome::Invoked(reply)) => reply,
                Ok(Outcome::Filtered | Outcome::NotTriggered) => return Ok(()),
                Ok(Outcome::NotFound(name)) => {
                    warn!(%name, "Rejecting unknown command");
                    Reply::ephemeral("Unknown command - this may be a bug.")
                },
                Ok(Outcome::Unauthorized(why)) => Reply::ephemeral(describe_unauthorized(why)),
                Err(err @ DispatchError::Handler { .. }) => {
                    error!(?err, "Unexpected error handling command");
                    Reply::ephemeral("Unexpected error running that command.")
                },
                Err(err) => return Err(err.into()),
            };

            let Some(cmd) = int.as_command() else {
                bail!("Invoked a command for a non-command interaction");
            };

            cmd.create_response(
                &ctx,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(reply.content)
                        .ephemeral(reply.ephemeral),
                ),
            )
            .await
            .context("Error sending interaction response")
        })
        .await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        handler("ready", async move {
            info!(user = %ready.user.name, "Connected");

            let cmds = AppCommand::set_global_commands(&ctx.http, self.app_commands())
                .await
                .context("Error registering application commands")?;

            debug!(count = cmds.len(), "Registered application commands");
            Ok(())
        })
        .await;
    }
}
