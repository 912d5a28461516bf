//! Chat session: record list, thread/user identifiers and the single in-flight send.

use uuid::Uuid;

use crate::core::attachment::Attachment;
use crate::core::client::{ChatRequest, Transport};
use crate::core::message::Message;
use crate::core::render;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Nothing to send: type a message or attach an image")]
    EmptyMessage,
    #[error("A message is already being sent")]
    Busy,
}

/// Conversation state for one user. `user_id` is fixed for the lifetime of the
/// session; `thread_id` changes on every [`ChatSession::new_chat`].
#[derive(Debug)]
pub struct ChatSession {
    user_id: String,
    thread_id: String,
    messages: Vec<Message>,
    fallback: Option<String>,
    busy: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            thread_id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            fallback: None,
            busy: false,
        }
    }

    /// Render empty replies as `fallback` instead of the built-in greeting.
    pub fn with_fallback(mut self, fallback: Option<String>) -> Self {
        self.fallback = fallback;
        self
    }

    fn normalize(&self, raw: Option<&str>) -> String {
        match self.fallback.as_deref() {
            Some(fallback) => render::normalize_with_fallback(raw, fallback),
            None => render::normalize_response(raw),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while a send is outstanding, or after a send was abandoned mid-flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Drop all records and start a new thread. The user id is kept.
    pub fn new_chat(&mut self) {
        self.messages.clear();
        self.thread_id = Uuid::new_v4().to_string();
        self.busy = false;
        log::info!("Started new thread {}", self.thread_id);
    }

    /// Send one user turn and append the assistant's answer.
    ///
    /// The user record is appended first. A transport failure never surfaces as an
    /// `Err`: it is logged and recorded as an error message with fixed text.
    /// Returns the appended assistant (or error) record.
    pub async fn send<T: Transport>(
        &mut self,
        transport: &T,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<&Message, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        if text.trim().is_empty() && attachment.is_none() {
            return Err(SessionError::EmptyMessage);
        }

        self.messages.push(Message::user(text, attachment));
        self.busy = true;

        let result = {
            let user = &self.messages[self.messages.len() - 1];
            let request = ChatRequest {
                message: user.raw_text(),
                thread_id: &self.thread_id,
                user_id: &self.user_id,
                image: user.attachment(),
            };
            transport.send(&request).await
        };
        self.busy = false;

        let reply = match result {
            Ok(reply) => {
                log::debug!(
                    "Reply {} on thread {}",
                    reply.message_id.as_deref().unwrap_or("-"),
                    reply.thread_id.as_deref().unwrap_or("-")
                );
                let rendered = self.normalize(reply.response.as_deref());
                Message::assistant(reply.response.unwrap_or_default(), rendered)
            }
            Err(e) => {
                log::error!("Chat request failed (transient: {}): {}", e.is_transient(), e);
                Message::error()
            }
        };
        log::debug!("Appending {:?} record {}", reply.role(), reply.id());
        self.messages.push(reply);
        Ok(&self.messages[self.messages.len() - 1])
    }
}
