//! Configuration integration tests
//! Run with: cargo test --test config_test

use std::path::PathBuf;

use salut_bot::infrastructure::config::{Config, SyncScope};

fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, contents).expect("Should write temp config");
    path
}

/// Full startup path: config file -> credentials -> sync scopes
#[test]
fn file_to_credentials_to_scopes() {
    let path = write_temp_config(
        "salut-bot-e2e.yaml",
        r#"
bot:
  name: salut-bot
adapters:
  discord:
    token: abc123
    test-scope-id: 42
    sync-policy: both
capabilities:
  guilds: true
  guild-members: true
  message-content: true
"#,
    );

    let config = Config::load(&path).expect("Should parse config");
    std::fs::remove_file(&path).ok();

    assert_eq!(config.bot.name, "salut-bot");
    assert!(config.capabilities.guild_members);

    let credentials = config.credentials().expect("Token is configured");
    assert_eq!(credentials.token, "abc123");
    assert_eq!(credentials.test_scope_id, Some(42));

    let scopes = config.sync_scopes(&credentials).expect("Policy is valid");
    assert_eq!(scopes, vec![SyncScope::TestScope(42), SyncScope::Global]);
}

/// A file without a token fails before any connection is attempted
#[test]
fn file_without_token_fails_fast() {
    let path = write_temp_config(
        "salut-bot-no-token.yaml",
        r#"
bot:
  name: salut-bot
adapters:
  discord:
    test-scope-id: 42
capabilities:
  guilds: true
  guild-members: true
  message-content: true
"#,
    );

    let config = Config::load(&path).expect("Should parse config");
    std::fs::remove_file(&path).ok();

    assert!(config.credentials().is_err());
}

/// Malformed YAML is a parse error, not a panic
#[test]
fn malformed_file_is_a_parse_error() {
    let path = write_temp_config("salut-bot-malformed.yaml", "bot: [not, a, mapping");

    let result = Config::load(&path);
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
}
