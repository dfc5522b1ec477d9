//! Chat state: messages, the local conversation, history sync and the
//! optimistic send flow.

pub mod conversation;
pub mod message;
pub mod send;
pub mod sync;

pub use conversation::Conversation;
pub use message::{Direction, Message};
pub use send::{MessageSender, PendingSend, SendOutcome, SendState};
pub use sync::{ConversationSync, SyncState};
