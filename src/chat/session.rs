//! Client-side conversation state

use super::relay::ChatRelay;
use super::{ChatRequest, ChatResponse, ChatTurn, CompletionBackend};

/// Shown when the relay's reply can't be understood at all
pub const FALLBACK_ERROR: &str = "The cosmos lost our signal. Try again...";

/// Conversation history plus the last error, if the latest exchange failed
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: Vec<ChatTurn>,
    error: Option<String>,
}

impl ChatSession {
    /// Session opening with an assistant greeting
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            history: vec![ChatTurn::assistant(greeting)],
            error: None,
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Send `input` through the relay's JSON endpoint. The user turn is kept
    /// whether or not the exchange succeeds; the reply is appended on success.
    /// Returns the reply, or `None` when the input was blank or the call failed.
    pub fn send<B: CompletionBackend>(&mut self, relay: &mut ChatRelay<B>, input: &str) -> Option<&str> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        self.error = None;
        self.history.push(ChatTurn::user(input));

        let request = ChatRequest {
            messages: self.history.clone(),
        };
        let Ok(body) = serde_json::to_string(&request) else {
            self.error = Some(FALLBACK_ERROR.to_string());
            return None;
        };

        let response = relay.handle("POST", &body);
        match (response.status, response.body) {
            (200, Some(ChatResponse::Reply { reply, .. })) => {
                self.history.push(ChatTurn::assistant(reply));
                self.history.last().map(|turn| turn.content.as_str())
            }
            (_, Some(ChatResponse::Error { error, .. })) if !error.is_empty() => {
                self.error = Some(error);
                None
            }
            _ => {
                self.error = Some(FALLBACK_ERROR.to_string());
                None
            }
        }
    }
}
