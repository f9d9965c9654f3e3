//! Transcript data types
//!
//! These types don't depend on the terminal UI, so the one-shot mode in
//! `main.rs` can print the same messages the widget renders.

use serde::{Deserialize, Serialize};

/// Display name shown on bubbles the user submitted ("You").
pub const USER_AUTHOR: &str = "Tu";

/// Display name shown on bubbles that came back from the server.
pub const AGENT_AUTHOR: &str = "Tarara";

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// A single transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub author: String,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role,
            author: author.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_new_takes_owned_or_borrowed_text() {
        let msg = Message::new(Role::User, USER_AUTHOR, String::from("hola"));
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.author, "Tu");
        assert_eq!(msg.text, "hola");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = Message::new(Role::Agent, AGENT_AUTHOR, "buenas");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "agent");
        assert_eq!(json["author"], "Tarara");
    }
}
