//! Insertion-ordered message history
//!
//! A [`Conversation`] only grows by appending; display order is append
//! order. The whole sequence may be replaced when history is rehydrated
//! from the backend or cleared when that fails. Individual messages are
//! never edited or removed.

use crate::chat::message::{Direction, Message};

/// Transient, in-memory conversation of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// An empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` at the end.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the entire history, e.g. after a sync.
    pub fn replace(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages = messages.into_iter().collect();
    }

    /// Drops every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterator in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// `true` when there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Count of messages from one side.
    pub fn count(&self, direction: Direction) -> usize {
        self.messages
            .iter()
            .filter(|m| m.direction() == direction)
            .count()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_insertion_order() {
        let mut conversation = Conversation::new();
        conversation.push(Message::user("one"));
        conversation.push(Message::assistant("two"));
        conversation.push(Message::user("three"));

        let texts: Vec<&str> = conversation.iter().map(Message::text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(conversation.last(), Some(&Message::user("three")));
    }

    #[test]
    fn test_replace_discards_previous_messages() {
        let mut conversation = Conversation::new();
        conversation.push(Message::user("stale"));
        conversation.replace(vec![Message::user("a"), Message::assistant("b")]);
        assert_eq!(
            conversation.messages(),
            &[Message::user("a"), Message::assistant("b")]
        );
    }

    #[test]
    fn test_clear_and_empty() {
        let mut conversation = Conversation::new();
        assert!(conversation.is_empty());
        conversation.push(Message::user("x"));
        assert_eq!(conversation.len(), 1);
        conversation.clear();
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_count_by_direction() {
        let mut conversation = Conversation::new();
        conversation.push(Message::user("q1"));
        conversation.push(Message::assistant("a1"));
        conversation.push(Message::user("q2"));
        assert_eq!(conversation.count(Direction::User), 2);
        assert_eq!(conversation.count(Direction::Assistant), 1);
    }
}
