//! Domain layer - Core business logic with no platform dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (CommandSpec, Invocation, GuildProfile)
//! - Traits: Abstractions for infrastructure (EventHooks)

pub mod entities;
pub mod traits;
