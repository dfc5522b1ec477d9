//! Command-line interface definition for Palaver
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for authentication and chatting with the assistant.

use clap::{Parser, Subcommand};

/// Palaver - terminal client for a conversational assistant
///
/// Log in or sign up against the assistant backend, then chat with it.
#[derive(Parser, Debug, Clone)]
#[command(name = "palaver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the backend base URL (e.g. http://localhost:8000/api/)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Palaver
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in with email and password
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(short, long, env = "PALAVER_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Do not enter chat after logging in
        #[arg(long)]
        no_chat: bool,
    },

    /// Create an account and log in
    Signup {
        /// Display name (prompted when omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Account password (prompted when omitted)
        #[arg(short, long, env = "PALAVER_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Do not enter chat after signing up
        #[arg(long)]
        no_chat: bool,
    },

    /// Start interactive chat with the assistant
    Chat,

    /// Print the stored conversation
    History {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Forget the stored session token
    Logout,

    /// Show who the stored session belongs to
    Whoami,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            base_url: None,
            verbose: false,
            command: Commands::Chat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(cli.base_url.is_none());
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Chat));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["palaver", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat));
    }

    #[test]
    fn test_cli_parse_login_with_credentials() {
        let cli = Cli::try_parse_from([
            "palaver",
            "login",
            "--email",
            "ada@example.com",
            "--password",
            "hunter2",
        ])
        .unwrap();
        if let Commands::Login {
            email,
            password,
            no_chat,
        } = cli.command
        {
            assert_eq!(email, Some("ada@example.com".to_string()));
            assert_eq!(password, Some("hunter2".to_string()));
            assert!(!no_chat);
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_cli_parse_signup_no_chat() {
        let cli = Cli::try_parse_from([
            "palaver", "signup", "-n", "Ada", "-e", "ada@example.com", "--no-chat",
        ])
        .unwrap();
        if let Commands::Signup {
            name,
            email,
            no_chat,
            ..
        } = cli.command
        {
            assert_eq!(name, Some("Ada".to_string()));
            assert_eq!(email, Some("ada@example.com".to_string()));
            assert!(no_chat);
        } else {
            panic!("Expected Signup command");
        }
    }

    #[test]
    fn test_cli_parse_history_json() {
        let cli = Cli::try_parse_from(["palaver", "history", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::History { json: true }));
    }

    #[test]
    fn test_cli_parse_global_base_url() {
        let cli =
            Cli::try_parse_from(["palaver", "--base-url", "http://api.local/", "logout"]).unwrap();
        assert_eq!(cli.base_url, Some("http://api.local/".to_string()));
        assert!(matches!(cli.command, Commands::Logout));
    }

    #[test]
    fn test_cli_parse_whoami_verbose() {
        let cli = Cli::try_parse_from(["palaver", "-v", "whoami"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Whoami));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["palaver"]).is_err());
    }
}
