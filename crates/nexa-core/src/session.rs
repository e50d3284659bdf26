//! The open-session controller.
//!
//! Owns one session's newest-first message list, rewrites the stored
//! content list after every mutation, and mediates outbound generation
//! requests. At most one request is in flight per session: a user message
//! sent while a reply is pending is still appended and persisted, but no
//! second request is issued until the controller returns to idle.

use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::generate::{GeneratedImage, ReplyGenerator};
use crate::models::{Content, InlineData, Message};
use crate::store::SessionStore;
use crate::transcode::{contents_to_messages, messages_to_contents};

/// Command prefix that routes a user turn to image generation.
pub const IMAGINE_PREFIX: &str = "/imagine";

/// Controller state for the outbound request guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No outbound request in flight.
    #[default]
    Idle,
    /// Exactly one outbound request in flight for this session.
    AwaitingAssistant,
}

/// The outbound request owed for an accepted user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRequest {
    /// Text generation over the full transcoded history.
    Text { contents: Vec<Content> },
    /// Image generation for an `/imagine` prompt.
    Image { prompt: String },
}

enum TurnReply {
    Text(String),
    Image(GeneratedImage),
}

/// Controller for one open chat session.
pub struct ChatSession<S> {
    store: S,
    key: String,
    messages: Vec<Message>,
    state: SessionState,
    request_timeout: Duration,
}

impl<S: SessionStore> ChatSession<S> {
    /// Open the session stored under `key`, loading any existing history.
    /// A missing or malformed entry yields an empty session, never an
    /// error.
    pub fn open(store: S, key: impl Into<String>, request_timeout: Duration) -> Self {
        let mut session = Self {
            store,
            key: key.into(),
            messages: Vec::new(),
            state: SessionState::Idle,
            request_timeout,
        };
        session.load();
        session
    }

    /// Start a brand-new session under a fresh key.
    pub fn create(store: S, request_timeout: Duration) -> Self {
        Self {
            store,
            key: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            state: SessionState::Idle,
            request_timeout,
        }
    }

    /// Create a fresh session from a starter prompt and run its first
    /// turn. Used when a home-screen suggestion opens the chat view.
    pub async fn start_with_prompt(
        store: S,
        generator: &impl ReplyGenerator,
        prompt: &str,
        request_timeout: Duration,
    ) -> Result<Self> {
        let mut session = Self::create(store, request_timeout);
        session.send(generator, prompt).await?;
        Ok(session)
    }

    /// The stable key this session persists under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The in-memory message list, newest-first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the in-memory list with the stored history. A value that
    /// fails to read or parse is logged and treated as an empty session.
    pub fn load(&mut self) {
        self.messages.clear();
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(err) => {
                warn!(session = %self.key, error = %err, "failed to read stored session");
                return;
            }
        };
        match serde_json::from_str::<Vec<Content>>(&raw) {
            Ok(contents) => self.messages = contents_to_messages(&contents),
            Err(err) => {
                warn!(session = %self.key, error = %err, "stored session is malformed, starting empty");
            }
        }
    }

    /// Append a user text turn. Returns the outbound request owed for it,
    /// or `None` while an earlier request is still in flight.
    pub fn append_user_message(&mut self, text: &str) -> Result<Option<TurnRequest>> {
        self.append_and_arm(Message::user(text), Some(text))
    }

    /// Append a user turn carrying an inline attachment instead of text.
    pub fn append_user_attachment(&mut self, data: InlineData) -> Result<Option<TurnRequest>> {
        self.append_and_arm(Message::user_attachment(data), None)
    }

    fn append_and_arm(&mut self, message: Message, text: Option<&str>) -> Result<Option<TurnRequest>> {
        self.messages.insert(0, message);
        self.persist()?;

        if self.state == SessionState::AwaitingAssistant {
            debug!(session = %self.key, "request already in flight, not issuing another");
            return Ok(None);
        }
        self.state = SessionState::AwaitingAssistant;

        let request = match text.and_then(parse_imagine) {
            Some(prompt) => TurnRequest::Image {
                prompt: prompt.to_string(),
            },
            None => TurnRequest::Text {
                contents: messages_to_contents(&self.messages),
            },
        };
        Ok(Some(request))
    }

    /// Record the assistant reply for the in-flight request and return to
    /// idle.
    pub fn receive_assistant_reply(&mut self, text: &str) -> Result<()> {
        self.messages.insert(0, Message::assistant(text));
        self.state = SessionState::Idle;
        self.persist()
    }

    /// Record a generated image as the assistant reply and return to idle.
    pub fn receive_assistant_image(&mut self, image: GeneratedImage) -> Result<()> {
        self.messages.insert(0, Message::assistant_image(image.into()));
        self.state = SessionState::Idle;
        self.persist()
    }

    /// Record a failed request as a visible error turn and return to idle.
    /// Every failure path appends a turn; none is dropped silently.
    pub fn receive_failure(&mut self, err: &Error) -> Result<()> {
        self.messages
            .insert(0, Message::failure(format!("The assistant could not reply: {err}")));
        self.state = SessionState::Idle;
        self.persist()
    }

    /// Abandon any in-flight request and return to idle. Called when the
    /// session view is torn down; the eventual response is dropped rather
    /// than applied to a dead view.
    pub fn cancel(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Rewrite the stored content list from the current message list.
    /// Full overwrite under the session key; invoked after every mutation.
    pub fn persist(&mut self) -> Result<()> {
        let contents = messages_to_contents(&self.messages);
        let json = serde_json::to_string(&contents)?;
        self.store.set(&self.key, &json)?;
        debug!(session = %self.key, turns = contents.len(), "persisted session");
        Ok(())
    }

    /// Run one full user turn: append the message, issue the owed request
    /// with a timeout, then record the reply or a visible failure turn.
    pub async fn send(&mut self, generator: &impl ReplyGenerator, text: &str) -> Result<()> {
        let Some(request) = self.append_user_message(text)? else {
            return Ok(());
        };
        match self.dispatch(generator, request).await {
            Ok(TurnReply::Text(reply)) => self.receive_assistant_reply(&reply),
            Ok(TurnReply::Image(image)) => self.receive_assistant_image(image),
            Err(err) => {
                warn!(session = %self.key, error = %err, "generation request failed");
                self.receive_failure(&err)
            }
        }
    }

    async fn dispatch(
        &self,
        generator: &impl ReplyGenerator,
        request: TurnRequest,
    ) -> Result<TurnReply> {
        let fut = async {
            match request {
                TurnRequest::Text { contents } => generator
                    .generate_text(&contents)
                    .await
                    .map(TurnReply::Text),
                TurnRequest::Image { prompt } => generator
                    .generate_image(&prompt)
                    .await
                    .map(TurnReply::Image),
            }
        };
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(reply) => reply,
            Err(_) => Err(Error::Timeout(self.request_timeout.as_secs())),
        }
    }
}

/// Recognize the `/imagine <prompt>` command, returning the prompt.
pub fn parse_imagine(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(IMAGINE_PREFIX)?;
    let prompt = rest.trim();
    if prompt.is_empty() { None } else { Some(prompt) }
}
