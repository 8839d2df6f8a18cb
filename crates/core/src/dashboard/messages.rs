//! User-facing notices shown above a page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
}

impl MessageLevel {
    /// Presentation classes attached to the message.
    pub fn tags(self) -> &'static str {
        match self {
            MessageLevel::Info => "alert alert-secondary",
            MessageLevel::Warning => "alert alert-warning",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
    pub tags: String,
}

impl Message {
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            tags: level.tags().to_string(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageLevel::Warning, text)
    }
}

/// Pages carrying messages, so queued flash messages can be shown first.
pub trait WithMessages {
    fn messages_mut(&mut self) -> &mut Vec<Message>;

    fn prepend_messages(&mut self, mut flashed: Vec<Message>) {
        let messages = self.messages_mut();
        flashed.append(messages);
        *messages = flashed;
    }
}
