//! Chat turn records held by a session.

use serde::Serialize;
use uuid::Uuid;

use crate::core::attachment::Attachment;

/// Text of the record synthesized when a send fails. Never carries error detail.
pub const ERROR_TEXT: &str = "Sorry, I encountered an error. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Sender label shown above the message.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "AI Assistant",
        }
    }
}

/// One chat turn. Fields are read-only once the record is built.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    id: Uuid,
    role: Role,
    raw_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rendered_text: Option<String>,
    timestamp: String,
    is_error: bool,
}

fn now_display() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

impl Message {
    fn new(role: Role, raw_text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            raw_text,
            attachment: None,
            rendered_text: None,
            timestamp: now_display(),
            is_error: false,
        }
    }

    pub fn user(text: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self {
            attachment,
            ..Self::new(Role::User, text.into())
        }
    }

    /// Assistant record for a successful reply. `rendered` is the normalized markup.
    pub fn assistant(raw_text: impl Into<String>, rendered: String) -> Self {
        Self {
            rendered_text: Some(rendered),
            ..Self::new(Role::Assistant, raw_text.into())
        }
    }

    /// Assistant-role record standing in for a failed send.
    pub fn error() -> Self {
        Self {
            is_error: true,
            ..Self::new(Role::Assistant, ERROR_TEXT.to_string())
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn rendered_text(&self) -> Option<&str> {
        self.rendered_text.as_deref()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Text to show: the rendered reply when present, the raw text otherwise.
    pub fn display_text(&self) -> &str {
        self.rendered_text().unwrap_or(&self.raw_text)
    }
}
