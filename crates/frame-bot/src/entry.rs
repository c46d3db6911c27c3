//! Process setup: environment, logging, runtime, and the client lifetime

use tracing_subscriber::EnvFilter;

use crate::{client::ClientOpts, prelude::*};

#[derive(Debug, clap::Parser)]
#[command(version, author, about)]
struct Opts {
    /// Log filter, using env_logger-like syntax
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_filter: String,

    /// Number of async worker threads
    #[arg(short = 'j', long, env)]
    threads: Option<usize>,

    #[command(flatten)]
    client: ClientOpts,
}

/// `.env` files to read, most specific first.  Variables already set are
/// never overwritten, so earlier files win.
fn env_files() -> [&'static str; 3] {
    let profile = if cfg!(debug_assertions) {
        ".env.dev"
    } else {
        ".env.prod"
    };

    [".env.local", profile, ".env"]
}

fn load_env() -> Result {
    for file in env_files() {
        match dotenvy::from_filename(file) {
            Ok(path) => trace!(?path, "Loaded environment file"),
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => (),
            Err(e) => return Err(e).with_context(|| format!("Error loading {file:?}")),
        }
    }

    Ok(())
}

fn init_subscriber(filter: &str) -> Result {
    let filter = EnvFilter::try_new(filter)
        .with_context(|| format!("Invalid log filter {filter:?}"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Error initializing logger")
}

fn runtime(threads: Option<usize>) -> Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();

    if let Some(n) = threads {
        builder.worker_threads(n);
    }

    builder
        .enable_all()
        .build()
        .context("Error building async runtime")
}

/// Parse options and bring up logging, returning the runtime to run the bot
/// on
fn boot() -> Result<(Opts, tokio::runtime::Runtime)> {
    let logger = tracing::subscriber::set_default(tracing_subscriber::fmt().finish());
    let span = error_span!("boot").entered();

    load_env()?;
    let opts: Opts = clap::Parser::parse();
    opts.client.check()?;

    drop((span, logger));
    init_subscriber(&opts.log_filter)?;

    let rt = runtime(opts.threads)?;
    Ok((opts, rt))
}

#[inline]
pub fn main() {
    let (opts, rt) = match boot() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Startup failed: {e:?}");
            std::process::exit(1);
        },
    };

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |inf| {
        error!(location = ?inf.location(), "Thread panicked");
        hook(inf);
    }));

    std::process::exit(match rt.block_on(run(opts.client)) {
        Ok(()) => 0,
        Err(e) => {
            error!("{e:?}");
            1
        },
    });
}

/// Resolves when the process is asked to stop
async fn stop_signal() -> Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = signal(SignalKind::terminate()).context("Error hooking SIGTERM")?;

        tokio::select! {
            r = tokio::signal::ctrl_c() => r.map(|()| "SIGINT").context("Error awaiting SIGINT"),
            _ = term.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .map(|()| "^C")
            .context("Error awaiting ^C")
    }
}

#[instrument(level = "error", skip(opts))]
async fn run(opts: ClientOpts) -> Result {
    let mut client = crate::client::build(opts).await?;

    let ret = tokio::select! {
        s = stop_signal() => s.map(|s| warn!("{s} received, shutting down")),
        r = client.start() => match r {
            Ok(()) => Err(anyhow!("Client hung up unexpectedly")),
            Err(e) => return Err(e).context("Fatal client error"),
        },
    };

    client.shard_manager.shutdown_all().await;
    ret
}
