//! Palaver - terminal client for a conversational assistant
//!
#![doc = "Main entry point for the Palaver client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use palaver::cli::{Cli, Commands};
use palaver::commands;
use palaver::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Login {
            email,
            password,
            no_chat,
        } => {
            tracing::info!("Starting login");
            commands::auth::login(&config, email, password, no_chat).await
        }
        Commands::Signup {
            name,
            email,
            password,
            no_chat,
        } => {
            tracing::info!("Starting signup");
            commands::auth::signup(&config, name, email, password, no_chat).await
        }
        Commands::Chat => commands::chat::run(&config).await,
        Commands::History { json } => commands::history::handle_history(&config, json).await,
        Commands::Logout => commands::auth::logout(&config),
        Commands::Whoami => commands::auth::whoami(&config),
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with chat output.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "palaver=debug" } else { "palaver=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
