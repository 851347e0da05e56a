use chrono::{DateTime, Utc};

/// One inbound slash-command invocation by a user
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: String,
    pub user_display_name: String,
    pub guild_id: Option<u64>,
    pub received_at: DateTime<Utc>,
}

impl Invocation {
    pub fn new(command: impl Into<String>, user_display_name: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            user_display_name: user_display_name.into(),
            guild_id: None,
            received_at: Utc::now(),
        }
    }

    pub fn with_guild(mut self, guild_id: u64) -> Self {
        self.guild_id = Some(guild_id);
        self
    }
}
