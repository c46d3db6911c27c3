//! Name-indexed command storage

use crate::{
    command::{Command, CommandInfo},
    prelude::*,
};

/// An error raised while registering a command
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The name or alias is already taken by another command
    #[error("Command name {0:?} is already registered")]
    Duplicate(String),
    /// The command has an empty or whitespace-containing name
    #[error("Invalid command name {0:?}")]
    InvalidName(String),
}

/// A registered command and its cached metadata
pub struct Entry<C, R> {
    info: CommandInfo,
    handler: Arc<dyn Command<C, R>>,
}

impl<C, R> fmt::Debug for Entry<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("info", &self.info)
            .field("handler", &self.handler)
            .finish()
    }
}

impl<C, R> Entry<C, R> {
    /// The command's metadata, as reported at registration time
    #[inline]
    #[must_use]
    pub fn info(&self) -> &CommandInfo { &self.info }

    /// The command's handler
    #[inline]
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Command<C, R>> { &self.handler }
}

/// Maps lowercase command names and aliases to commands
pub struct Registry<C, R> {
    commands: HashMap<String, Entry<C, R>>,
    aliases: HashMap<String, String>,
}

impl<C, R> fmt::Debug for Registry<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl<C, R> Default for Registry<C, R> {
    fn default() -> Self {
        Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
        }
    }
}

fn check_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(RegistryError::InvalidName(name.to_owned()));
    }

    Ok(())
}

impl<C, R> Registry<C, R> {
    /// Construct an empty registry
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Add a command under its name and all of its aliases
    ///
    /// # Errors
    /// Fails without modifying the registry if any name is invalid or taken.
    pub fn register(&mut self, handler: Arc<dyn Command<C, R>>) -> Result<(), RegistryError> {
        let info = handler.info();

        check_name(&info.name)?;
        if self.lookup(&info.name).is_some() {
            return Err(RegistryError::Duplicate(info.name));
        }

        {
            let mut seen = HashSet::new();
            for alias in &info.aliases {
                check_name(alias)?;
                if alias == &info.name || self.lookup(alias).is_some() || !seen.insert(alias) {
                    return Err(RegistryError::Duplicate(alias.clone()));
                }
            }
        }

        for alias in &info.aliases {
            self.aliases.insert(alias.clone(), info.name.clone());
        }

        trace!(name = %info.name, aliases = ?info.aliases, "Registered command");
        self.commands.insert(info.name.clone(), Entry { info, handler });

        Ok(())
    }

    /// Register every command in a list
    ///
    /// # Errors
    /// Stops at the first command that fails to register.
    pub fn with_commands(
        mut self,
        handlers: impl IntoIterator<Item = Arc<dyn Command<C, R>>>,
    ) -> Result<Self, RegistryError> {
        handlers
            .into_iter()
            .try_for_each(|h| self.register(h))?;
        Ok(self)
    }

    /// Find a command by its exact (lowercase) name or alias
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Entry<C, R>> {
        self.commands.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|n| self.commands.get(n.as_str()))
        })
    }

    /// Iterate over all registered commands, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Entry<C, R>> { self.commands.values() }

    /// The number of registered commands, not counting aliases
    #[must_use]
    pub fn len(&self) -> usize { self.commands.len() }

    /// Returns true if no commands are registered
    #[must_use]
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }
}
