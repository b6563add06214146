//! Cosmic guide chat boundary
//!
//! One request/response exchange against a hosted language model. The relay
//! rotates through a list of credentials, retrying transient failures and
//! giving up early when the upstream says the request itself is bad.
//! The model call sits behind [`CompletionBackend`] so hosts plug in their
//! own HTTP client.

pub mod relay;
pub mod session;

use serde::{Deserialize, Serialize};

pub use relay::{ChatRelay, CompletionParams, Credentials, HttpReply, RelayReply};
pub use session::ChatSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Request body: the conversation so far, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
}

/// Response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Reply {
        reply: String,
        /// 1-based attempt that succeeded
        #[serde(rename = "keyUsed")]
        key_used: usize,
    },
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

/// Failure of a single completion call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// Rate limit, timeout, 5xx: worth trying the next credential
    #[error("transient upstream failure: {0}")]
    Transient(String),
    /// The request itself was refused (HTTP 400); retrying cannot help
    #[error("upstream rejected the request: {0}")]
    ClientFault(String),
}

/// Failure of a whole relay exchange
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("No API keys configured. Please set GROQ_API_KEY_1 in environment variables.")]
    NoCredentials,

    #[error("All API keys exhausted. Please try again.")]
    Rejected { attempts: usize, source: UpstreamError },

    #[error("All API keys exhausted. Please try again.")]
    Exhausted {
        attempts: usize,
        last: Option<UpstreamError>,
    },
}

impl ChatError {
    /// HTTP-style status for the JSON handler
    pub fn status(&self) -> u16 {
        match self {
            ChatError::InvalidRequest(_) => 400,
            ChatError::NoCredentials => 500,
            ChatError::Rejected { .. } | ChatError::Exhausted { .. } => 503,
        }
    }

    /// Underlying upstream message, if any
    pub fn detail(&self) -> Option<String> {
        match self {
            ChatError::Rejected { source, .. } => Some(source.to_string()),
            ChatError::Exhausted { last, .. } => last.as_ref().map(ToString::to_string),
            _ => None,
        }
    }
}

/// A hosted chat-completion API
pub trait CompletionBackend {
    /// Run one completion with `credential`; `messages` already starts with the system prompt
    fn complete(
        &mut self,
        credential: &str,
        messages: &[ChatTurn],
        params: &CompletionParams,
    ) -> Result<String, UpstreamError>;
}
