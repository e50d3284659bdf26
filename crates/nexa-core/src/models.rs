//! Domain models for chat sessions.
//!
//! Two representations of the same conversation coexist: the UI-facing
//! [`Message`] list (newest-first while a session is open) and the
//! provider-facing [`Content`] list (oldest-first, persisted as JSON).
//! [`crate::transcode`] converts between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which participant authored a message. Every session has exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

impl Author {
    /// Display name shown next to the message bubble.
    pub fn display_name(self) -> &'static str {
        match self {
            Author::User => "Me",
            Author::Assistant => "Chatbot",
        }
    }

    /// The provider role this participant maps to.
    pub fn role(self) -> Role {
        match self {
            Author::User => Role::User,
            Author::Assistant => Role::Model,
        }
    }
}

impl From<Role> for Author {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Author::User,
            Role::Model => Author::Assistant,
        }
    }
}

/// Provider-facing role of a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

/// A base64-encoded binary payload with its MIME type, embedded directly
/// in a part.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Render as a `data:` URI suitable for direct display.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// A single payload unit within a content: text or inline binary, not both.
///
/// Serialized untagged so the stored layout stays
/// `{"text": ...}` / `{"inlineData": {...}}`, matching what earlier
/// versions of the app wrote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// Consumed defensively: stored parts carrying neither field.
    Empty {},
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an inline-data part.
    pub fn inline_data(data: InlineData) -> Self {
        Self::InlineData { inline_data: data }
    }

    /// Text payload, if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Inline binary payload, if this is an inline-data part.
    pub fn as_inline_data(&self) -> Option<&InlineData> {
        match self {
            Self::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }
}

/// The persisted, provider-facing representation of one conversation turn.
///
/// Only the first part is meaningful; additional parts are tolerated on
/// read but never constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a single-part text content.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a single-part inline-data content.
    pub fn inline_data(role: Role, data: InlineData) -> Self {
        Self {
            role,
            parts: vec![Part::inline_data(data)],
        }
    }

    /// Text of the first part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.first().and_then(Part::as_text)
    }

    /// Inline data of the first part, if any.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts.first().and_then(Part::as_inline_data)
    }
}

/// A UI-facing chat message.
///
/// Never persisted directly; [`crate::transcode`] derives the stored
/// [`Content`] list from the message list on every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Unique within one session's in-memory list. Freshly composed
    /// messages get a UUID; messages rebuilt from storage get their
    /// position in the rebuilt list.
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: Author,
    /// Inline binary attachment carried through persistence.
    pub attachment: Option<InlineData>,
    /// Display image value: a URL or `data:` URI.
    pub image: Option<String>,
    /// Marks a locally synthesized failure notice. Not persisted; a
    /// reloaded session shows the turn as a plain assistant message.
    pub failed: bool,
}

impl Message {
    fn new(author: Author, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            created_at: Utc::now(),
            author,
            attachment: None,
            image: None,
            failed: false,
        }
    }

    /// A freshly composed user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, text)
    }

    /// A user message carrying an inline attachment instead of text.
    pub fn user_attachment(data: InlineData) -> Self {
        let mut message = Self::new(Author::User, "");
        message.image = Some(data.data_uri());
        message.attachment = Some(data);
        message
    }

    /// An assistant reply.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Author::Assistant, text)
    }

    /// An assistant reply carrying a generated image. The payload is kept
    /// inline so reloading the session reconstructs the image without
    /// re-fetching it.
    pub fn assistant_image(data: InlineData) -> Self {
        let mut message = Self::new(Author::Assistant, "");
        message.image = Some(data.data_uri());
        message.attachment = Some(data);
        message
    }

    /// A visible error turn, shown in place of a reply that never came.
    pub fn failure(text: impl Into<String>) -> Self {
        let mut message = Self::new(Author::Assistant, text);
        message.failed = true;
        message
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
