//! Configuration management

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub adapters: AdaptersConfig,
    pub capabilities: CapabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    pub token: Option<String>,
    pub test_scope_id: Option<u64>,
    pub sync_policy: Option<SyncPolicy>,
}

/// Which event categories the gateway connection requests.
///
/// `guild-members` and `message-content` are privileged and must be enabled
/// in the Discord developer portal, or the handshake fails at connect.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CapabilityConfig {
    pub guilds: bool,
    pub guild_members: bool,
    pub message_content: bool,
}

/// Command synchronization policy, selectable in the config file.
///
/// When unset, commands are synced to the test scope if one is configured
/// and skipped otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncPolicy {
    TestScope,
    Global,
    Both,
}

/// One command-sync target. Test-scope sync is near-immediate; global sync
/// can take up to an hour to propagate on the platform side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncScope {
    TestScope(u64),
    Global,
}

impl fmt::Display for SyncScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncScope::TestScope(id) => write!(f, "test scope {}", id),
            SyncScope::Global => write!(f, "global scope"),
        }
    }
}

/// Credentials loaded once at startup, immutable for the process lifetime
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    pub test_scope_id: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "salut-bot".to_string(),
            },
            adapters: AdaptersConfig {
                discord: DiscordConfig {
                    token: None,
                    test_scope_id: None,
                    sync_policy: None,
                },
            },
            capabilities: CapabilityConfig {
                guilds: true,
                guild_members: true,
                message_content: true,
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Apply environment overrides: `BOT_TOKEN` and `TEST_SCOPE_ID` take
    /// precedence over the config file.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            self.adapters.discord.token = Some(token);
        }

        if let Ok(raw) = std::env::var("TEST_SCOPE_ID") {
            self.adapters.discord.test_scope_id = Some(parse_test_scope(&raw)?);
        }

        Ok(())
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.adapters.discord.token = Some(token.into());
    }

    /// Fail fast if the token is absent
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let token = self
            .adapters
            .discord
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField("bot token (set BOT_TOKEN)".to_string()))?;

        Ok(Credentials {
            token,
            test_scope_id: self.adapters.discord.test_scope_id,
        })
    }

    pub fn sync_scopes(&self, credentials: &Credentials) -> Result<Vec<SyncScope>, ConfigError> {
        resolve_scopes(self.adapters.discord.sync_policy, credentials.test_scope_id)
    }
}

fn parse_test_scope(raw: &str) -> Result<u64, ConfigError> {
    let id = raw.trim().parse::<u64>().map_err(|_| {
        ConfigError::InvalidValue(format!("TEST_SCOPE_ID must be an integer, got {:?}", raw))
    })?;
    if id == 0 {
        return Err(ConfigError::InvalidValue(
            "TEST_SCOPE_ID must be a nonzero guild id".to_string(),
        ));
    }
    Ok(id)
}

/// Resolve the configured policy into the list of scopes to sync during the
/// setup phase. A policy that needs a test scope without one configured is a
/// startup error, not a runtime surprise.
pub fn resolve_scopes(
    policy: Option<SyncPolicy>,
    test_scope: Option<u64>,
) -> Result<Vec<SyncScope>, ConfigError> {
    // Zero is not a valid guild id; reject it here so a bad id from any
    // source (file or environment) is a startup error, never a sync-time one
    if test_scope == Some(0) {
        return Err(ConfigError::InvalidValue(
            "test-scope-id must be a nonzero guild id".to_string(),
        ));
    }

    match (policy, test_scope) {
        (None, Some(id)) => Ok(vec![SyncScope::TestScope(id)]),
        (None, None) => Ok(Vec::new()),
        (Some(SyncPolicy::TestScope), Some(id)) => Ok(vec![SyncScope::TestScope(id)]),
        (Some(SyncPolicy::Global), _) => Ok(vec![SyncScope::Global]),
        (Some(SyncPolicy::Both), Some(id)) => {
            Ok(vec![SyncScope::TestScope(id), SyncScope::Global])
        }
        (Some(SyncPolicy::TestScope), None) | (Some(SyncPolicy::Both), None) => {
            Err(ConfigError::MissingField(
                "test-scope-id is required by the configured sync policy".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_fails_fast() {
        let config = Config::default();
        let err = config.credentials().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn empty_token_fails_fast() {
        let mut config = Config::default();
        config.set_token("");
        assert!(config.credentials().is_err());
    }

    #[test]
    fn token_and_test_scope_are_carried_into_credentials() {
        let mut config = Config::default();
        config.set_token("abc123");
        config.adapters.discord.test_scope_id = Some(42);

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.token, "abc123");
        assert_eq!(credentials.test_scope_id, Some(42));
    }

    #[test]
    fn test_scope_id_must_be_an_integer() {
        assert_eq!(parse_test_scope("12345").unwrap(), 12345);
        assert_eq!(parse_test_scope(" 12345 ").unwrap(), 12345);
        assert!(matches!(
            parse_test_scope("not-a-number").unwrap_err(),
            ConfigError::InvalidValue(_)
        ));
        assert!(matches!(
            parse_test_scope("0").unwrap_err(),
            ConfigError::InvalidValue(_)
        ));
    }

    #[test]
    fn default_policy_uses_test_scope_when_configured() {
        let scopes = resolve_scopes(None, Some(42)).unwrap();
        assert_eq!(scopes, vec![SyncScope::TestScope(42)]);
    }

    #[test]
    fn default_policy_skips_sync_without_test_scope() {
        let scopes = resolve_scopes(None, None).unwrap();
        assert!(scopes.is_empty());
    }

    #[test]
    fn global_policy_ignores_test_scope() {
        let scopes = resolve_scopes(Some(SyncPolicy::Global), Some(42)).unwrap();
        assert_eq!(scopes, vec![SyncScope::Global]);
    }

    #[test]
    fn both_policy_syncs_test_scope_then_global() {
        let scopes = resolve_scopes(Some(SyncPolicy::Both), Some(42)).unwrap();
        assert_eq!(scopes, vec![SyncScope::TestScope(42), SyncScope::Global]);
    }

    #[test]
    fn scoped_policies_require_a_test_scope_id() {
        assert!(resolve_scopes(Some(SyncPolicy::TestScope), None).is_err());
        assert!(resolve_scopes(Some(SyncPolicy::Both), None).is_err());
    }

    #[test]
    fn zero_test_scope_is_rejected_regardless_of_source() {
        // Any policy path must refuse a zero guild id at startup
        assert!(matches!(
            resolve_scopes(None, Some(0)).unwrap_err(),
            ConfigError::InvalidValue(_)
        ));
        assert!(resolve_scopes(Some(SyncPolicy::TestScope), Some(0)).is_err());
        assert!(resolve_scopes(Some(SyncPolicy::Both), Some(0)).is_err());
    }

    #[test]
    fn zero_test_scope_from_file_is_a_startup_error() {
        let yaml = r#"
bot:
  name: salut-bot
adapters:
  discord:
    token: abc123
    test-scope-id: 0
capabilities:
  guilds: true
  guild-members: true
  message-content: true
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let credentials = config.credentials().unwrap();

        let err = config.sync_scopes(&credentials).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config.set_token("from-file");
        config.adapters.discord.test_scope_id = Some(1);

        std::env::set_var("BOT_TOKEN", "from-env");
        std::env::set_var("TEST_SCOPE_ID", "99");
        let result = config.apply_env();
        std::env::remove_var("BOT_TOKEN");
        std::env::remove_var("TEST_SCOPE_ID");

        result.unwrap();
        assert_eq!(config.adapters.discord.token.as_deref(), Some("from-env"));
        assert_eq!(config.adapters.discord.test_scope_id, Some(99));

        // A non-integer id surfaces as a startup error through apply_env
        std::env::set_var("TEST_SCOPE_ID", "not-a-number");
        let err = config.apply_env().unwrap_err();
        std::env::remove_var("TEST_SCOPE_ID");
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.bot.name, "salut-bot");
        assert!(parsed.capabilities.message_content);
    }
}
