use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Teacher,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Teacher => "teacher",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "teacher" => Ok(Role::Teacher),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

/// Where an entry is in its progressive-disclosure lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Pending,
    Revealing,
    Complete,
}

/// One bubble in the visible conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub role: Role,
    pub content: String,
    pub reveal_state: RevealState,
    /// Follow-on blocks appended as new entries, one per completion, FIFO.
    pub remaining_blocks: VecDeque<String>,
    /// Set on entries produced by chaining; the renderer drops the avatar and
    /// role label for them.
    pub is_sub_message: bool,
    /// Placeholder shown while a reply is still being produced.
    pub is_loading: bool,
}

impl MessageEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            reveal_state: RevealState::Pending,
            remaining_blocks: VecDeque::new(),
            is_sub_message: false,
            is_loading: false,
        }
    }

    /// A user entry; user text is never animated.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content).completed()
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::new(Role::Assistant, String::new())
        }
    }

    pub fn with_blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remaining_blocks = blocks.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the entry fully formed, as for historical messages.
    pub fn completed(mut self) -> Self {
        self.reveal_state = RevealState::Complete;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.reveal_state == RevealState::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::User, Role::Assistant, Role::Teacher] {
            assert_eq!(Role::try_from(role.as_str()), Ok(role));
        }
        assert!(Role::try_from("system").is_err());
    }

    #[test]
    fn user_entries_start_complete() {
        let entry = MessageEntry::user("hi");
        assert!(entry.is_complete());
        assert!(entry.role.is_user());
    }

    #[test]
    fn assistant_entries_start_pending_with_blocks() {
        let entry = MessageEntry::assistant("A").with_blocks(["B", "C"]);
        assert_eq!(entry.reveal_state, RevealState::Pending);
        assert_eq!(entry.remaining_blocks, VecDeque::from(["B".to_string(), "C".to_string()]));
        assert!(!entry.is_sub_message);
    }

    #[test]
    fn loading_entry_is_empty_assistant() {
        let entry = MessageEntry::loading();
        assert!(entry.is_loading);
        assert_eq!(entry.role, Role::Assistant);
        assert!(entry.content.is_empty());
    }
}
