use super::{Dispatcher, Error, Invocation, Outcome};
use crate::{
    event::{CommandOption, Interaction, TextMessage},
    prelude::*,
};

/// Split prefixed content into a command name and arguments
///
/// The name is the first whitespace-delimited token with the prefix removed
/// from its start.
fn split_prefixed<'a>(content: &'a str, prefix: &str) -> Option<(&'a str, Vec<String>)> {
    let mut toks = content.split_whitespace();
    let name = toks.next()?.strip_prefix(prefix)?;

    (!name.is_empty()).then(|| (name, toks.map(Into::into).collect()))
}

/// Split mentioning content into a command name and arguments
///
/// The name is the token directly following the leading mention.
fn split_mention(content: &str) -> Option<(&str, Vec<String>)> {
    let mut toks = content.split_whitespace().skip(1);
    let name = toks.next()?;

    Some((name, toks.map(Into::into).collect()))
}

/// The event and arguments a handler will be called with
enum Call<'a> {
    Text(&'a TextMessage, Vec<String>),
    Slash(&'a Interaction, &'a [CommandOption]),
}

impl<C: Sync, R: Send> Dispatcher<C, R> {
    /// Resolve, authorize and run the command named by an invocation
    ///
    /// Lookup misses and failed gates are reported as outcomes.  Errors from
    /// the command handler itself are passed through to the caller.
    ///
    /// # Errors
    /// Fails if the invoked handler fails.
    #[instrument(level = "debug", skip_all, fields(mode = %inv.mode(), name = tracing::field::Empty))]
    pub async fn invoke(&self, ctx: &C, inv: Invocation<'_>) -> Result<Outcome<R>, Error> {
        let split = match inv {
            Invocation::Prefix { msg, prefix } => {
                split_prefixed(&msg.content, prefix).map(|(n, a)| (n, Call::Text(msg, a)))
            },
            Invocation::Mention(msg) => {
                split_mention(&msg.content).map(|(n, a)| (n, Call::Text(msg, a)))
            },
            Invocation::Slash(int) => Some((
                int.command_name.as_str(),
                Call::Slash(int, &int.options),
            )),
        };

        let Some((name, call)) = split else {
            trace!("No command name given");
            return Ok(Outcome::NotTriggered);
        };

        let name = name.to_lowercase();
        tracing::Span::current().record("name", name.as_str());

        let Some(entry) = self.registry.lookup(&name) else {
            debug!("Unknown command");
            return Ok(Outcome::NotFound(name));
        };

        if let Err(err) = inv.auth_context(&self.client).authorize(entry.info()) {
            debug!(reason = err.reason(), "Rejecting unauthorized invocation");
            return Ok(Outcome::Unauthorized(err));
        }

        let handler = entry.handler();
        let res = match call {
            Call::Text(msg, args) => handler.run(ctx, msg, args).await,
            Call::Slash(int, args) => handler.run_slash(ctx, int, args).await,
        };

        match res {
            Ok(val) => {
                debug!("Command completed");
                Ok(Outcome::Invoked(val))
            },
            Err(source) => Err(Error::Handler {
                name,
                mode: inv.mode(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{split_mention, split_prefixed};

    #[test]
    fn test_split_prefixed() {
        assert_eq!(
            split_prefixed("!Ping extra", "!"),
            Some(("Ping", vec!["extra".to_owned()]))
        );
        assert_eq!(
            split_prefixed("q!say  hello   world ", "q!"),
            Some(("say", vec!["hello".to_owned(), "world".to_owned()]))
        );
        assert_eq!(split_prefixed("!ping", "!"), Some(("ping", vec![])));
        assert_eq!(split_prefixed("!", "!"), None);
        assert_eq!(split_prefixed("! ping", "!"), None);
        assert_eq!(split_prefixed("", "!"), None);
    }

    #[test]
    fn test_split_mention() {
        assert_eq!(
            split_mention("<@1000> echo hi there"),
            Some(("echo", vec!["hi".to_owned(), "there".to_owned()]))
        );
        assert_eq!(split_mention("<@1000>\nping"), Some(("ping", vec![])));
        assert_eq!(split_mention("<@1000>"), None);
    }
}
