use std::num::NonZeroU64;

use frame::{ClientInfo, Dispatcher, Registry};
use serenity::{
    http::Http,
    model::{gateway::GatewayIntents, id::UserId},
    Client,
};

use crate::{prelude::*, settings::JsonSettings, util::DebugShim};

mod commands;
mod convert;
mod handler;

#[derive(Debug, clap::Args)]
pub struct ClientOpts {
    /// The Discord API token to use
    #[arg(long, env)]
    discord_token: DebugShim<String>,

    /// Command prefix used when a guild has not set its own
    #[arg(long, env, default_value = "!")]
    command_prefix: String,

    /// User IDs allowed to run owner-only commands.  Defaults to the
    /// application's owner or team members
    #[arg(long = "owner", env = "OWNERS", value_delimiter = ',')]
    owners: Vec<NonZeroU64>,

    /// JSON file to load and persist settings in
    #[arg(long, env)]
    settings: Option<PathBuf>,
}

impl ClientOpts {
    /// Reject option values that would only fail once the bot is running
    ///
    /// # Errors
    /// Fails on an empty or whitespace-containing prefix, or a settings path
    /// whose directory does not exist.
    pub fn check(&self) -> Result {
        if self.command_prefix.is_empty() || self.command_prefix.contains(char::is_whitespace) {
            bail!(
                "Invalid command prefix {:?}: must be non-empty with no whitespace",
                self.command_prefix
            );
        }

        if let Some(ref path) = self.settings {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            if dir.is_some_and(|d| !d.is_dir()) {
                bail!("Settings directory for {path:?} does not exist");
            }
        }

        Ok(())
    }

    pub fn owner_ids(&self) -> Vec<UserId> { self.owners.iter().copied().map(UserId::from).collect() }
}

async fn app_owners(http: &Http) -> Result<Vec<UserId>> {
    let info = http
        .get_current_application_info()
        .await
        .context("Error fetching application info")?;

    let mut owners: Vec<_> = info.owner.iter().map(|u| u.id).collect();
    if let Some(team) = info.team {
        owners.extend(team.members.iter().map(|m| m.user.id));
    }

    Ok(owners)
}

pub async fn build(opts: ClientOpts) -> Result<Client> {
    let owners = opts.owner_ids();
    let ClientOpts {
        discord_token,
        command_prefix,
        owners: _,
        settings,
    } = opts;

    let http = Http::new(&discord_token.0);
    let me = http
        .get_current_user()
        .await
        .context("Error fetching bot user")?;

    let owners = if owners.is_empty() {
        app_owners(&http).await?
    } else {
        owners
    };

    if owners.is_empty() {
        warn!("No bot owners configured, owner-only commands will be unusable");
    }

    info!(user = %me.id, ?owners, prefix = %command_prefix, "Configuring dispatcher");

    let registry = Registry::new()
        .with_commands(commands::list())
        .context("Error registering commands")?;
    let settings: Arc<dyn frame::Provider> = Arc::new(JsonSettings::open(settings).await?);

    let mut catalog: Vec<_> = registry.iter().map(|e| e.info().clone()).collect();
    catalog.sort_by(|a, b| a.name.cmp(&b.name));

    let env = commands::Env {
        settings: Arc::clone(&settings),
        catalog,
        default_prefix: command_prefix.clone(),
    };

    let dispatcher = Dispatcher::new(settings, registry, ClientInfo {
        user_id: me.id,
        default_prefix: command_prefix,
        owners: owners.into_iter().collect(),
    });

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let handler = handler::Handler::new_rc(dispatcher, env);

    Client::builder(discord_token.0, intents)
        .event_handler_arc(handler)
        .await
        .context("Error constructing Serenity client")
}

#[cfg(test)]
mod tests {
    use super::ClientOpts;
    use crate::util::DebugShim;

    fn opts(prefix: &str) -> ClientOpts {
        ClientOpts {
            discord_token: DebugShim("tok".into()),
            command_prefix: prefix.into(),
            owners: vec![],
            settings: None,
        }
    }

    #[test]
    fn test_check_prefix() {
        assert!(opts("!").check().is_ok());
        assert!(opts("").check().is_err());
        assert!(opts("q !").check().is_err());
    }

    #[test]
    fn test_check_settings_dir() {
        let dir = tempfile::tempdir().unwrap();

        let mut o = opts("!");
        o.settings = Some(dir.path().join("settings.json"));
        assert!(o.check().is_ok());

        o.settings = Some(dir.path().join("missing").join("settings.json"));
        assert!(o.check().is_err());

        o.settings = Some("settings.json".into());
        assert!(o.check().is_ok());
    }
}
