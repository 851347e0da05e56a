use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::application::errors::{BotError, ConfigError};
use crate::domain::entities::Invocation;

/// Deferred handler result, awaited by the event loop
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<String, BotError>> + Send>>;

/// Command handler function type
pub type CommandHandler = Arc<dyn Fn(Invocation) -> HandlerFuture + Send + Sync>;

/// Represents one slash command: a name, a description shown in the client
/// UI, and the handler invoked for each interaction.
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    handler: CommandHandler,
}

impl CommandSpec {
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, BotError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Arc::new(move |invocation| Box::pin(handler(invocation))),
        }
    }

    /// Run the handler for one invocation. Each invocation is consumed
    /// exactly once and must yield exactly one response.
    pub fn invoke(&self, invocation: Invocation) -> HandlerFuture {
        (self.handler)(invocation)
    }
}

/// Process-wide command table, built at startup and read-only afterwards
#[derive(Default)]
pub struct CommandTable {
    commands: HashMap<String, CommandSpec>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Duplicate names are a configuration error,
    /// surfaced at startup before any connection is attempted.
    pub fn register(&mut self, command: CommandSpec) -> Result<(), ConfigError> {
        if self.commands.contains_key(&command.name) {
            return Err(ConfigError::DuplicateCommand(command.name.clone()));
        }
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_command(name: &str) -> CommandSpec {
        CommandSpec::new(name, "echoes the command name", |invocation| async move {
            Ok(invocation.command)
        })
    }

    #[test]
    fn register_stores_command() {
        let mut table = CommandTable::new();
        table.register(echo_command("hello")).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.get("hello").is_some());
        assert!(table.get("goodbye").is_none());
    }

    #[test]
    fn duplicate_registration_is_a_config_error() {
        let mut table = CommandTable::new();
        table.register(echo_command("hello")).unwrap();

        let err = table.register(echo_command("hello")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCommand(name) if name == "hello"));
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn invoke_awaits_the_handler() {
        let command = echo_command("ping");
        let reply = command.invoke(Invocation::new("ping", "Ada")).await.unwrap();
        assert_eq!(reply, "ping");
    }
}
