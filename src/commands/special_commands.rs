//! Special commands parser for interactive chat
//!
//! Lines starting with `/` are handled locally instead of being sent to
//! the assistant. Commands are case-insensitive; bare `exit` and `quit`
//! are accepted too.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show available commands
    Help,
    /// Pull the conversation from the backend again
    Refresh,
    /// Reprint the local conversation
    History,
    /// Log out and leave chat
    Logout,
    /// Leave chat
    Exit,
    /// Not a special command; send it to the assistant
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns [`CommandError::UnknownCommand`] if input starts with `/` but is
/// not a known command.
///
/// # Examples
///
/// ```
/// use palaver::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/refresh").unwrap(), SpecialCommand::Refresh);
/// assert_eq!(parse_special_command("QUIT").unwrap(), SpecialCommand::Exit);
/// assert_eq!(parse_special_command("hello there").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/frobnicate").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/refresh" | "/sync" => Ok(SpecialCommand::Refresh),
        "/history" => Ok(SpecialCommand::History),
        "/logout" => Ok(SpecialCommand::Logout),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for the chat prompt
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

  /help, /?         - Show this help
  /refresh, /sync   - Reload the conversation from the server
  /history          - Reprint the conversation
  /logout           - Forget the stored session and leave chat
  /exit, /quit      - Leave chat (also: exit, quit, Ctrl-D)

Anything else is sent to the assistant. Empty lines are ignored.
"#
    );
}
