//! Rendering of prior turns into a prompt prefix.
//!
//! ```rust
//! use gchat::render_context;
//!
//! assert_eq!(render_context(&[]), "");
//! ```

use crate::ChatMessage;

pub const CONTEXT_HEADER: &str = "Conversation history:";
pub const CONTEXT_INSTRUCTION: &str = "Continue the conversation based on the history above:";

/// Renders `messages` as a prompt prefix; the new user input is appended after it.
///
/// Empty input renders as an empty string. Nothing is truncated, so the prefix
/// grows with the session.
pub fn render_context(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return String::new();
    }

    let mut context = String::from(CONTEXT_HEADER);
    context.push('\n');

    for message in messages {
        context.push_str(message.role.label());
        context.push_str(": ");
        context.push_str(&message.content);
        context.push('\n');
    }

    context.push('\n');
    context.push_str(CONTEXT_INSTRUCTION);
    context.push('\n');
    context
}
