//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Permission error: {0}")]
    Permission(String),

    #[error("No handler registered for command: {0}")]
    Dispatch(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Duplicate command registration: {0}")]
    DuplicateCommand(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
