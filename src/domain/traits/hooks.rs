use async_trait::async_trait;

use crate::domain::entities::GuildProfile;

/// Closed set of gateway lifecycle callbacks, registered on the session.
///
/// One method per event. Implementations must not assume exclusive access
/// to shared state across an await point.
#[async_trait]
pub trait EventHooks: Send + Sync {
    /// Called once when the session reaches the ready state
    async fn on_ready(&self, identity: &str);

    /// Called when the bot is added to a guild
    async fn on_guild_join(&self, guild: &GuildProfile);

    /// Called when the bot leaves or is removed from a guild
    async fn on_guild_leave(&self, guild: &GuildProfile);
}

/// Default hook set: observability only, no state changes
pub struct LogHooks;

#[async_trait]
impl EventHooks for LogHooks {
    async fn on_ready(&self, identity: &str) {
        tracing::info!("Logged on as {}", identity);
    }

    async fn on_guild_join(&self, guild: &GuildProfile) {
        tracing::info!("Joined guild: {}", guild);
    }

    async fn on_guild_leave(&self, guild: &GuildProfile) {
        tracing::info!("Left guild: {}", guild);
    }
}
