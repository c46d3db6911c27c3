//! Entry point for the frame bot

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod entry;
mod settings;
mod util;

mod prelude {
    pub use std::{fmt, future::Future, path::PathBuf, sync::Arc};

    pub use anyhow::{anyhow, bail, Context as _, Error};
    pub use async_trait::async_trait;
    pub use tracing::{debug, error, error_span, info, instrument, trace, warn};
    pub use tracing_subscriber::prelude::*;

    pub type Result<T = (), E = Error> = std::result::Result<T, E>;
}

fn main() { entry::main(); }
