use serde::{ Serialize, Deserialize };

/// Sender label reserved for messages the relay generates itself.
pub const BOT_SENDER: &str = "bot";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn from_sender(sender: &str) -> Self {
        if sender == BOT_SENDER { Role::Assistant } else { Role::User }
    }
}

/// One entry of the shared conversation.
///
/// `role` is fixed at construction from the sender label and is what every
/// dispatch decision looks at; it never travels over the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: String,
    pub timestamp: Option<i64>,
    pub role: Role,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: impl Into<String>, timestamp: Option<i64>) -> Self {
        let sender = sender.into();
        Self {
            text: text.into(),
            role: Role::from_sender(&sender),
            sender,
            timestamp,
        }
    }

    /// Builds the assistant message answering `trigger`, stamped one tick later.
    pub fn assistant_reply(text: impl Into<String>, trigger: &ChatMessage) -> Self {
        Self {
            text: text.into(),
            sender: BOT_SENDER.to_string(),
            timestamp: trigger.timestamp.map(|ts| ts.saturating_add(1)),
            role: Role::Assistant,
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.role == Role::User
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl From<Role> for PromptRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => PromptRole::User,
            Role::Assistant => PromptRole::Assistant,
        }
    }
}

/// A role-tagged piece of the prompt handed to the completion endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSegment {
    pub role: PromptRole,
    pub content: String,
}

impl PromptSegment {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: PromptRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: PromptRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: PromptRole::Assistant, content: content.into() }
    }
}
