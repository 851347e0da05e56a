use std::sync::Arc;

use clap::{Parser, Subcommand};

use salut_bot::application::errors::BotError;
use salut_bot::application::services::Registrar;
use salut_bot::domain::traits::LogHooks;
use salut_bot::infrastructure::adapters::discord::{Capabilities, Session};
use salut_bot::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "salut-bot")]
#[command(about = "A minimal Discord greeting bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and environment)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            if let Err(e) = run_bot(cli.config, cli.token) {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("salut-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String, token_override: Option<String>) -> Result<(), BotError> {
    // Load config
    let mut config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        Config::default()
    };

    config.apply_env()?;
    if let Some(token) = token_override {
        config.set_token(token);
    }

    tracing::info!("Starting salut-bot: {}", config.bot.name);

    // Startup-phase errors terminate the process before any connection
    let credentials = config.credentials()?;
    let scopes = config.sync_scopes(&credentials)?;
    let capabilities = Capabilities::from(&config.capabilities);

    let mut registrar = Registrar::new();
    registrar.register_defaults()?;
    tracing::info!("Command table built with {} commands", registrar.len());

    let session = Arc::new(Session::new(
        capabilities,
        scopes,
        Arc::new(registrar),
        Arc::new(LogHooks),
    ));

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Transport(e.to_string()))?;
    rt.block_on(session.connect(&credentials.token))
}

fn init_config() {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => match std::fs::write("config.yaml", yaml) {
            Ok(()) => println!("Wrote default config to config.yaml"),
            Err(e) => eprintln!("Failed to write config.yaml: {}", e),
        },
        Err(e) => eprintln!("Failed to serialize config: {}", e),
    }
}
