use crate::application::errors::{BotError, ConfigError};
use crate::domain::entities::{CommandSpec, CommandTable, Invocation};

/// Service owning the slash-command table: registration at startup,
/// dispatch of inbound invocations afterwards.
pub struct Registrar {
    table: CommandTable,
}

impl Registrar {
    pub fn new() -> Self {
        Self {
            table: CommandTable::new(),
        }
    }

    pub fn register(&mut self, command: CommandSpec) -> Result<(), ConfigError> {
        self.table.register(command)
    }

    pub fn register_defaults(&mut self) -> Result<(), ConfigError> {
        // Hello command
        self.register(CommandSpec::new(
            "hello",
            "Says hello back to you!",
            |invocation| async move { Ok(format!("Hello {}!", invocation.user_display_name)) },
        ))
    }

    /// Look up the handler by command name and await it. An unknown name
    /// means the synced command set and the table disagree; the caller logs
    /// it and sends no response.
    pub async fn dispatch(&self, invocation: Invocation) -> Result<String, BotError> {
        let Some(command) = self.table.get(&invocation.command) else {
            return Err(BotError::Dispatch(invocation.command));
        };

        command.invoke(invocation).await
    }

    pub fn entries(&self) -> impl Iterator<Item = &CommandSpec> {
        self.table.all()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for Registrar {
    fn default() -> Self {
        Self::new()
    }
}
