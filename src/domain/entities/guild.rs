use std::fmt;

/// Minimal view of a guild, carried by membership hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildProfile {
    pub id: u64,
    pub name: String,
}

impl GuildProfile {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for GuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}
