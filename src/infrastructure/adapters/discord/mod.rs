//! Discord gateway adapter
//!
//! Owns the authenticated gateway connection: connect, the one-shot setup
//! phase (acquire the pooled HTTP client, sync slash commands), the ready
//! loop, and graceful shutdown. The gateway wire protocol itself is
//! serenity's job.
//!
//! # Gateway Intents
//!
//! `GUILD_MEMBERS` and `MESSAGE_CONTENT` are privileged intents and must be
//! explicitly enabled in the Discord Developer Portal for the bot
//! application, or the handshake fails at connect.

use std::sync::{Arc, Mutex};

use serenity::all::{
    Client, Command as GlobalCommand, CommandInteraction, Context, CreateCommand,
    CreateInteractionResponse, CreateInteractionResponseMessage, EventHandler, GatewayError,
    GatewayIntents, Guild, GuildId, Interaction, Ready, UnavailableGuild,
};
use serenity::async_trait;
use serenity::http::HttpError;

use crate::application::errors::BotError;
use crate::application::services::Registrar;
use crate::domain::entities::{GuildProfile, Invocation};
use crate::domain::traits::EventHooks;
use crate::infrastructure::config::{CapabilityConfig, SyncScope};

/// Capability set requested from the gateway, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub guilds: bool,
    pub guild_members: bool,
    pub message_content: bool,
}

impl Capabilities {
    pub fn to_intents(self) -> GatewayIntents {
        let mut intents = GatewayIntents::empty();
        if self.guilds {
            intents |= GatewayIntents::GUILDS;
        }
        if self.guild_members {
            intents |= GatewayIntents::GUILD_MEMBERS;
        }
        if self.message_content {
            intents |= GatewayIntents::MESSAGE_CONTENT;
        }
        intents
    }
}

impl From<&CapabilityConfig> for Capabilities {
    fn from(config: &CapabilityConfig) -> Self {
        Self {
            guilds: config.guilds,
            guild_members: config.guild_members,
            message_content: config.message_content,
        }
    }
}

/// Session lifecycle states. `Closed` is terminal and re-entrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconnected,
    SettingUp,
    Ready,
    Closed,
}

/// The single live connection to Discord.
///
/// Holds the capability set, the command-sync scopes, the shared command
/// table, the hook set, and the pooled auxiliary HTTP client. There is
/// exactly one session per process; it is passed by `Arc` into the gateway
/// event handler rather than living in ambient global state.
pub struct Session {
    capabilities: Capabilities,
    scopes: Vec<SyncScope>,
    registrar: Arc<Registrar>,
    hooks: Arc<dyn EventHooks>,
    // Locks guard single transitions and are never held across an await
    state: Mutex<SessionState>,
    web_client: Mutex<Option<reqwest::Client>>,
}

impl Session {
    /// Construct a session in the `Unconnected` state. No I/O.
    pub fn new(
        capabilities: Capabilities,
        scopes: Vec<SyncScope>,
        registrar: Arc<Registrar>,
        hooks: Arc<dyn EventHooks>,
    ) -> Self {
        Self {
            capabilities,
            scopes,
            registrar,
            hooks,
            state: Mutex::new(SessionState::Unconnected),
            web_client: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap()
    }

    /// Clone of the pooled HTTP client, if the setup phase has opened it
    pub fn web_client(&self) -> Option<reqwest::Client> {
        self.web_client.lock().unwrap().clone()
    }

    /// Connect to the gateway and run the ready loop until shutdown.
    ///
    /// Authentication and intent-permission failures are fatal; the caller
    /// logs the diagnostic and exits. Every exit path passes through
    /// `shutdown`.
    pub async fn connect(self: Arc<Self>, token: &str) -> Result<(), BotError> {
        self.begin_setup()?;

        let client = Client::builder(token, self.capabilities.to_intents())
            .event_handler(Gateway {
                session: Arc::clone(&self),
            })
            .await;

        let mut client = match client {
            Ok(client) => client,
            Err(e) => {
                self.shutdown().await;
                return Err(classify_gateway(e));
            }
        };

        // Ctrl-C closes the HTTP client first, then the gateway connection
        let shard_manager = client.shard_manager.clone();
        let session = Arc::clone(&self);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            tracing::info!("Shutdown signal received");
            session.shutdown().await;
            shard_manager.shutdown_all().await;
        });

        let result = client.start().await.map_err(classify_gateway);
        self.shutdown().await;
        result
    }

    /// `Unconnected -> SettingUp`; there is exactly one session per process
    /// and it connects at most once.
    fn begin_setup(&self) -> Result<(), BotError> {
        let mut state = self.state.lock().unwrap();
        if *state != SessionState::Unconnected {
            return Err(BotError::Transport(format!(
                "session already started (state: {:?})",
                *state
            )));
        }
        *state = SessionState::SettingUp;
        Ok(())
    }

    /// `SettingUp -> Ready`. Returns false if the session was closed in the
    /// meantime or readiness was already reached (gateway reconnects replay
    /// the ready event).
    fn enter_ready(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if *state != SessionState::SettingUp {
            return false;
        }
        *state = SessionState::Ready;
        true
    }

    /// Acquire the pooled HTTP client, idempotently
    fn open_web_client(&self) -> reqwest::Client {
        let mut slot = self.web_client.lock().unwrap();
        slot.get_or_insert_with(reqwest::Client::new).clone()
    }

    /// One-shot setup phase, run when the gateway reports ready: open the
    /// HTTP client, then sync the command table to each configured scope.
    /// Sync failures are logged and never abort startup.
    async fn complete_setup(&self, ctx: &Context, identity: &str) {
        if self.state() != SessionState::SettingUp {
            return;
        }

        self.open_web_client();

        let payload: Vec<CreateCommand> = self
            .registrar
            .entries()
            .map(|c| CreateCommand::new(c.name.clone()).description(c.description.clone()))
            .collect();

        for scope in &self.scopes {
            match sync_scope(ctx, *scope, payload.clone()).await {
                Ok(count) => tracing::info!("Synced {} commands to {}", count, scope),
                Err(e) => tracing::warn!("Command sync failed for {}: {}", scope, e),
            }
        }

        if self.enter_ready() {
            self.hooks.on_ready(identity).await;
        }
    }

    /// Dispatch one command interaction and send exactly one response.
    /// Dispatch faults and handler failures are logged, never fatal.
    async fn dispatch(&self, ctx: &Context, command: CommandInteraction) {
        let name = command.data.name.clone();
        let display_name = command
            .member
            .as_ref()
            .and_then(|m| m.nick.clone())
            .or_else(|| command.user.global_name.clone())
            .unwrap_or_else(|| command.user.name.clone());

        let mut invocation = Invocation::new(&name, display_name);
        if let Some(guild_id) = command.guild_id {
            invocation = invocation.with_guild(guild_id.get());
        }
        tracing::debug!(
            "Dispatching /{} invoked by {} at {}",
            invocation.command,
            invocation.user_display_name,
            invocation.received_at
        );

        match self.registrar.dispatch(invocation).await {
            Ok(reply) => {
                let response = CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new().content(reply),
                );
                if let Err(e) = command.create_response(&ctx.http, response).await {
                    tracing::error!("Failed to respond to /{}: {}", name, e);
                }
            }
            Err(BotError::Dispatch(name)) => {
                // Unreachable when the synced set reflects the table
                tracing::error!("No handler registered for /{}", name);
            }
            Err(e) => tracing::error!("Handler for /{} failed: {}", name, e),
        }
    }

    /// Close the session: HTTP client first, then the caller tears down the
    /// gateway connection. Repeated calls are no-ops.
    pub async fn shutdown(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if *state == SessionState::Closed {
                return;
            }
            *state = SessionState::Closed;
        }

        if self.web_client.lock().unwrap().take().is_some() {
            tracing::info!("HTTP client closed");
        }
        tracing::info!("Session closed");
    }
}

/// Gateway event handler, delegating each event to the session
struct Gateway {
    session: Arc<Session>,
}

#[async_trait]
impl EventHandler for Gateway {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let identity = format!("{} (ID: {})", ready.user.name, ready.user.id);
        self.session.complete_setup(&ctx, &identity).await;
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, is_new: Option<bool>) {
        // Fires for every known guild on startup; only actual joins are new
        if is_new == Some(true) {
            let profile = GuildProfile::new(guild.id.get(), guild.name.clone());
            self.session.hooks.on_guild_join(&profile).await;
        }
    }

    async fn guild_delete(&self, _ctx: Context, incomplete: UnavailableGuild, full: Option<Guild>) {
        // An unavailable guild is an outage, not a removal
        if incomplete.unavailable {
            return;
        }
        let name = full.map(|g| g.name).unwrap_or_default();
        let profile = GuildProfile::new(incomplete.id.get(), name);
        self.session.hooks.on_guild_leave(&profile).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.session.dispatch(&ctx, command).await;
        }
    }
}

/// Push the full command set to one scope
async fn sync_scope(
    ctx: &Context,
    scope: SyncScope,
    commands: Vec<CreateCommand>,
) -> Result<usize, BotError> {
    let synced = match scope {
        SyncScope::TestScope(id) => GuildId::new(id).set_commands(&ctx.http, commands).await,
        SyncScope::Global => GlobalCommand::set_global_commands(&ctx.http, commands).await,
    }
    .map_err(classify_sync)?;

    Ok(synced.len())
}

/// Map serenity connect errors onto the bot taxonomy: rejected credentials
/// and disallowed intents are fatal, everything else is transport.
fn classify_gateway(err: serenity::Error) -> BotError {
    match err {
        serenity::Error::Gateway(GatewayError::InvalidAuthentication) => {
            BotError::Auth("Discord rejected the bot token".to_string())
        }
        serenity::Error::Gateway(GatewayError::DisallowedGatewayIntents) => BotError::Permission(
            "requested gateway intents are not enabled in the Discord Developer Portal"
                .to_string(),
        ),
        other => BotError::Transport(other.to_string()),
    }
}

/// Sync failures are permission errors when the bot lacks the
/// applications.commands scope in the target, transport otherwise
fn classify_sync(err: serenity::Error) -> BotError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(ref response)) = err {
        if response.status_code.as_u16() == 403 {
            return BotError::Permission(
                "bot lacks the applications.commands scope in the target".to_string(),
            );
        }
    }
    BotError::Transport(err.to_string())
}
