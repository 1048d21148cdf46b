//! Chat turn state and the reducer that owns every transition.
//!
//! `ChatTurn::update` is the only place the turn state changes. The event
//! loop feeds it user input and resolved requests, then carries out the
//! returned [`TurnEffect`].

use crate::client::{ChatRequest, ChatResponse};
use crate::error::ClientError;
use tracing::{debug, info};

/// Everything the chat screen knows about the current exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTurn {
    pub input_text: String,
    pub reply_text: String,
    pub conversation_id: Option<String>,
    pub loading: bool,
}

/// Inputs to [`ChatTurn::update`]
#[derive(Debug)]
pub enum TurnEvent {
    /// The composer's text changed.
    InputChanged(String),
    /// The user pressed Send.
    Submit,
    /// The in-flight request finished.
    Resolved(Result<ChatResponse, ClientError>),
}

/// Work the caller must perform after an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEffect {
    None,
    /// Issue this request to the backend.
    Send(ChatRequest),
    /// Show this message to the user without blocking.
    Notify(String),
}

impl ChatTurn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the Send control should accept a press.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input_text.is_empty()
    }

    pub fn update(&mut self, event: TurnEvent) -> TurnEffect {
        match event {
            TurnEvent::InputChanged(text) => {
                if !self.loading {
                    self.input_text = text;
                }
                TurnEffect::None
            }
            TurnEvent::Submit => self.begin_send(),
            TurnEvent::Resolved(result) => self.resolve(result),
        }
    }

    fn begin_send(&mut self) -> TurnEffect {
        if self.loading || self.input_text.trim().is_empty() {
            return TurnEffect::None;
        }

        self.loading = true;
        info!(conversation_id = ?self.conversation_id, "submitting message");

        TurnEffect::Send(ChatRequest {
            message: self.input_text.clone(),
            conversation_id: self.conversation_id.clone(),
        })
    }

    fn resolve(&mut self, result: Result<ChatResponse, ClientError>) -> TurnEffect {
        // Reset happens before any notice is produced.
        self.loading = false;
        self.input_text.clear();

        match result {
            Ok(reply) => {
                if let Some(id) = reply.conversation_id() {
                    if self.conversation_id.as_deref() != Some(id) {
                        debug!(conversation_id = id, "conversation id updated");
                    }
                    self.conversation_id = Some(id.to_string());
                }
                self.reply_text = reply.response;
                TurnEffect::None
            }
            Err(err) => {
                info!(error = %err, status = ?err.status(), "message failed");
                TurnEffect::Notify(format!("Error: {err}"))
            }
        }
    }
}
