use crate::chat::{Conversation, ConversationSync, Direction, SyncState};
use crate::commands::connect;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle `palaver history`
///
/// Runs one conversation sync and prints the result. A failed sync is
/// reported on stderr and the command still succeeds with an empty listing.
pub async fn handle_history(config: &Config, json: bool) -> Result<()> {
    let (session, client) = connect(config)?;

    let mut conversation = Conversation::new();
    let mut sync = ConversationSync::new();
    sync.activate(&client, &session, &mut conversation).await;

    if sync.state() == SyncState::Failed {
        eprintln!(
            "{}",
            format!(
                "Could not load conversation: {}",
                sync.last_error().unwrap_or("unknown error")
            )
            .yellow()
        );
    }

    if json {
        println!("{}", render_json(&conversation)?);
        return Ok(());
    }

    if conversation.is_empty() {
        println!("{}", "No conversation history found.".yellow());
        return Ok(());
    }

    println!("\nConversation History:");
    render_table(&conversation).printstd();
    println!();

    Ok(())
}

fn render_json(conversation: &Conversation) -> Result<String> {
    Ok(serde_json::to_string_pretty(conversation.messages())?)
}

fn render_table(conversation: &Conversation) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row!["#".bold(), "From".bold(), "Message".bold()]);

    for (index, message) in conversation.iter().enumerate() {
        let from = match message.direction() {
            Direction::User => "user".blue(),
            Direction::Assistant => "assistant".green(),
        };
        table.add_row(prettytable::row![index + 1, from, message.text()]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Message;

    fn sample() -> Conversation {
        let mut conversation = Conversation::new();
        conversation.push(Message::user("Hello"));
        conversation.push(Message::assistant("Hi there"));
        conversation
    }

    #[test]
    fn test_render_json_preserves_order_and_wire_direction() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"text": "Hello", "direction": "user"},
                {"text": "Hi there", "direction": "llm"}
            ])
        );
    }

    #[test]
    fn test_render_json_empty() {
        assert_eq!(render_json(&Conversation::new()).unwrap(), "[]");
    }

    #[test]
    fn test_render_table_has_header_plus_rows() {
        let table = render_table(&sample());
        assert_eq!(table.len(), 3);
    }
}
