//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod guild;
pub mod interaction;

pub use command::{CommandSpec, CommandTable};
pub use guild::GuildProfile;
pub use interaction::Invocation;
