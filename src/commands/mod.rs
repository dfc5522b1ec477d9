//! CLI command handlers
//!
//! Each submodule turns one `palaver` subcommand into calls on the library:
//!
//! - [`auth`] -- `login`, `signup`, `logout`, `whoami`
//! - [`chat`] -- interactive conversation
//! - [`history`] -- one-shot conversation dump

use colored::Colorize;
use rustyline::DefaultEditor;

use crate::api::ApiClient;
use crate::chat::{Direction, Message};
use crate::config::Config;
use crate::error::{PalaverError, Result};
use crate::session::Session;

pub mod history;
pub mod prompt;
pub mod special_commands;

/// Opens the configured session and builds a client over it.
pub fn connect(config: &Config) -> Result<(Session, ApiClient)> {
    let session = Session::from_config(&config.session)?;
    let client = ApiClient::new(&config.api, session.clone())?;
    Ok((session, client))
}

/// Renders one message for the terminal.
pub fn format_message(message: &Message) -> String {
    match message.direction() {
        Direction::User => format!("{} {}", "you ›".blue().bold(), message.text()),
        Direction::Assistant => format!("{} {}", "assistant ›".green().bold(), message.text()),
    }
}

/// Authentication command handlers
pub mod auth {
    //! `login`, `signup`, `logout` and `whoami`.
    //!
    //! Missing credentials are prompted for on the terminal. A failed
    //! login/signup is returned as an error so the process exits non-zero
    //! with a short message; the stored session is left untouched.

    use super::prompt::{credential_editor, prompt_field, prompt_secret};
    use super::*;
    use crate::auth::{AuthFlow, AuthOutcome, View};
    use crate::session::Identity;

    /// Handle `palaver login`
    pub async fn login(
        config: &Config,
        email: Option<String>,
        password: Option<String>,
        no_chat: bool,
    ) -> Result<()> {
        let (session, client) = connect(config)?;
        let mut rl = credential_editor()?;

        let email = match email {
            Some(email) => email,
            None => prompt_field(&mut rl, "Email: ")?,
        };
        let password = match password {
            Some(password) => password,
            None => prompt_secret(&mut rl, "Password: ")?,
        };

        let mut flow = AuthFlow::new(session.clone(), View::Login);
        let outcome = flow.login(&client, &email, &password).await?;
        print_welcome(&outcome);

        enter_chat_if_requested(&flow, session, client, no_chat).await
    }

    /// Handle `palaver signup`
    pub async fn signup(
        config: &Config,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
        no_chat: bool,
    ) -> Result<()> {
        let (session, client) = connect(config)?;
        let mut rl = credential_editor()?;

        let name = match name {
            Some(name) => name,
            None => prompt_field(&mut rl, "Name: ")?,
        };
        let email = match email {
            Some(email) => email,
            None => prompt_field(&mut rl, "Email: ")?,
        };
        let password = match password {
            Some(password) => password,
            None => prompt_secret(&mut rl, "Password: ")?,
        };

        let mut flow = AuthFlow::new(session.clone(), View::Signup);
        let outcome = flow.signup(&client, &name, &email, &password).await?;
        print_welcome(&outcome);

        enter_chat_if_requested(&flow, session, client, no_chat).await
    }

    /// Handle `palaver logout`
    pub fn logout(config: &Config) -> Result<()> {
        let session = Session::from_config(&config.session)?;
        let mut flow = AuthFlow::new(session, View::Chat);
        flow.logout()?;
        println!("{}", "Logged out.".green());
        Ok(())
    }

    /// Handle `palaver whoami`
    pub fn whoami(config: &Config) -> Result<()> {
        let session = Session::from_config(&config.session)?;
        match session.identity() {
            Identity::Authenticated(user_id) => {
                println!("Logged in as user {}", user_id.to_string().cyan());
                if let Some(expires_at) = session.claims().and_then(|c| c.expires_at) {
                    println!(
                        "Token expires {}",
                        expires_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                }
            }
            Identity::Unauthenticated => {
                println!("{}", "Not logged in.".yellow());
            }
        }
        Ok(())
    }

    fn print_welcome(outcome: &AuthOutcome) {
        let text = outcome.message.as_deref().unwrap_or("Logged in");
        match outcome.user.as_ref().and_then(|u| u.username.as_deref()) {
            Some(username) => println!("{} ({})", text.green(), username.cyan()),
            None => println!("{}", text.green()),
        }
    }

    async fn enter_chat_if_requested(
        flow: &AuthFlow,
        session: Session,
        client: ApiClient,
        no_chat: bool,
    ) -> Result<()> {
        if flow.view() != View::Chat || no_chat {
            return Ok(());
        }
        super::chat::run_chat(&client, &session).await
    }
}

/// Interactive chat handler
pub mod chat {
    //! Readline loop over the conversation.
    //!
    //! On entry the conversation is synced from the backend and printed.
    //! Every non-command line then goes through the optimistic send flow.
    //! Sync and send failures are shown as non-blocking notices; the loop
    //! keeps running.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::chat::{Conversation, ConversationSync, MessageSender, SendOutcome, SyncState};
    use rustyline::error::ReadlineError;

    /// Handle `palaver chat`
    pub async fn run(config: &Config) -> Result<()> {
        let (session, client) = connect(config)?;
        run_chat(&client, &session).await
    }

    /// Runs the chat loop against `client` until the user exits.
    pub async fn run_chat(client: &ApiClient, session: &Session) -> Result<()> {
        tracing::info!("Starting interactive chat");

        let mut conversation = Conversation::new();
        let mut sync = ConversationSync::new();
        let mut sender = MessageSender::new();

        print_banner();
        sync.activate(client, session, &mut conversation).await;
        report_sync(&sync);
        print_conversation(&conversation);

        let mut rl = DefaultEditor::new()?;
        let prompt = format!("{} ", "›".bold());

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Refresh) => {
                            sync.refresh(client, session, &mut conversation).await;
                            report_sync(&sync);
                            print_conversation(&conversation);
                            continue;
                        }
                        Ok(SpecialCommand::History) => {
                            print_conversation(&conversation);
                            continue;
                        }
                        Ok(SpecialCommand::Logout) => {
                            session.end()?;
                            println!("{}", "Logged out.".green());
                            break;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;
                    println!("{}", "…".dimmed());

                    match sender.send(client, &mut conversation, trimmed).await {
                        SendOutcome::Replied(reply) => println!("{}\n", format_message(&reply)),
                        SendOutcome::Failed(e) => {
                            println!("{}\n", format!("(message not delivered: {})", e).yellow())
                        }
                        SendOutcome::Skipped => {}
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted. Type /exit to leave.");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(PalaverError::Readline(e).into()),
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_banner() {
        println!("{}", "Chat with AI".bold());
        println!("{}", "Type /help for commands, /exit to leave.".dimmed());
        println!();
    }

    fn report_sync(sync: &ConversationSync) {
        if sync.state() == SyncState::Failed {
            let reason = sync.last_error().unwrap_or("unknown error");
            println!(
                "{}",
                format!("(could not load previous conversation: {})", reason).yellow()
            );
        }
    }

    /// Prints the whole conversation, or a placeholder when empty.
    pub fn print_conversation(conversation: &Conversation) {
        if conversation.is_empty() {
            println!("{}", "Start a conversation…".dimmed());
        } else {
            for message in conversation {
                println!("{}", format_message(message));
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenStoreKind;

    #[test]
    fn test_format_message_contains_text() {
        assert!(format_message(&Message::user("Hello")).contains("Hello"));
        assert!(format_message(&Message::assistant("Hi there")).contains("Hi there"));
    }

    #[test]
    fn test_format_message_labels_sides() {
        assert!(format_message(&Message::user("x")).contains("you"));
        assert!(format_message(&Message::assistant("x")).contains("assistant"));
    }

    #[test]
    fn test_connect_with_memory_store() {
        let mut config = Config::default();
        config.session.store = TokenStoreKind::Memory;
        let (session, client) = connect(&config).unwrap();
        assert_eq!(session.token(), None);
        assert!(client.authenticated().is_authenticated());
    }
}
