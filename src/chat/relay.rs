//! Credential-rotating chat relay

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ChatError, ChatRequest, ChatResponse, ChatTurn, CompletionBackend, Role, UpstreamError};

/// Environment variable prefix; keys are read from `GROQ_API_KEY_1`, `_2`, ...
pub const CREDENTIAL_ENV_PREFIX: &str = "GROQ_API_KEY_";
/// Highest numbered key variable consulted
pub const MAX_CREDENTIALS: usize = 9;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Zara, a cosmic guide woven from stardust and quantum light. \
Your voice is poetic, warm and scientifically precise: explain the universe with wonder and rigor intertwined, \
using cosmic metaphors naturally. Respond in whatever language the user writes to you.";

/// Sampling parameters sent with every completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.85,
            max_tokens: 1024,
            top_p: 0.95,
        }
    }
}

/// Ordered API keys. Never printed.
#[derive(Clone, Default)]
pub struct Credentials {
    keys: Vec<String>,
}

impl Credentials {
    /// Blank keys are dropped
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().filter(|k| !k.trim().is_empty()).collect(),
        }
    }

    /// Read `GROQ_API_KEY_1` through `GROQ_API_KEY_9`, skipping unset ones
    pub fn from_env() -> Self {
        let keys = (1..=MAX_CREDENTIALS).filter_map(|i| std::env::var(format!("{CREDENTIAL_ENV_PREFIX}{i}")).ok());
        let credentials = Self::new(keys);
        log::info!("Loaded {} chat credential(s)", credentials.len());
        credentials
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("count", &self.keys.len()).finish()
    }
}

/// A successful exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub reply: String,
    /// Completion calls made, including the successful one
    pub attempts: usize,
}

/// Status + JSON body, as returned to an HTTP host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    /// `None` for preflight responses
    pub body: Option<ChatResponse>,
}

impl HttpReply {
    fn error(status: u16, error: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            status,
            body: Some(ChatResponse::Error {
                error: error.into(),
                detail,
            }),
        }
    }

    /// Serialized body (empty for preflight)
    pub fn body_json(&self) -> String {
        self.body
            .as_ref()
            .and_then(|body| serde_json::to_string(body).ok())
            .unwrap_or_default()
    }
}

/// Forwards conversations to a [`CompletionBackend`], rotating credentials
pub struct ChatRelay<B: CompletionBackend> {
    backend: B,
    credentials: Credentials,
    /// Next credential to try; persists across requests (round robin)
    next: usize,
    system_prompt: String,
    params: CompletionParams,
}

impl<B: CompletionBackend> ChatRelay<B> {
    pub fn new(backend: B, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
            next: 0,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            params: CompletionParams::default(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Try each credential at most once, starting after the last one used.
    /// Stops early on a client fault.
    pub fn send(&mut self, history: &[ChatTurn]) -> Result<RelayReply, ChatError> {
        if self.credentials.is_empty() {
            return Err(ChatError::NoCredentials);
        }

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatTurn::new(Role::System, self.system_prompt.clone()));
        messages.extend(history.iter().cloned());

        let total = self.credentials.len();
        let mut last = None;
        for attempt in 0..total {
            let key = &self.credentials.keys[self.next % total];
            self.next = (self.next + 1) % total;
            match self.backend.complete(key, &messages, &self.params) {
                Ok(reply) => {
                    return Ok(RelayReply {
                        reply,
                        attempts: attempt + 1,
                    });
                }
                Err(err) => {
                    log::warn!("Key attempt {} failed: {err}", attempt + 1);
                    if let UpstreamError::ClientFault(_) = err {
                        return Err(ChatError::Rejected {
                            attempts: attempt + 1,
                            source: err,
                        });
                    }
                    last = Some(err);
                }
            }
        }

        log::error!("All {total} chat credentials exhausted");
        Err(ChatError::Exhausted { attempts: total, last })
    }

    /// JSON endpoint: `method` + raw body in, status + response body out
    pub fn handle(&mut self, method: &str, body: &str) -> HttpReply {
        match method {
            "OPTIONS" => {
                return HttpReply {
                    status: 200,
                    body: None,
                };
            }
            "POST" => {}
            _ => return HttpReply::error(405, "Method not allowed", None),
        }
        if self.credentials.is_empty() {
            let err = ChatError::NoCredentials;
            return HttpReply::error(err.status(), err.to_string(), None);
        }

        let value: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => return HttpReply::error(400, "Invalid JSON", None),
        };
        let request: ChatRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(_) => return HttpReply::error(400, "messages array required", None),
        };

        match self.send(&request.messages) {
            Ok(reply) => HttpReply {
                status: 200,
                body: Some(ChatResponse::Reply {
                    reply: reply.reply,
                    key_used: reply.attempts,
                }),
            },
            Err(err) => HttpReply::error(err.status(), err.to_string(), err.detail()),
        }
    }
}

impl<B: CompletionBackend> fmt::Debug for ChatRelay<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatRelay")
            .field("credentials", &self.credentials)
            .field("next", &self.next)
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Backend replaying scripted outcomes and recording which key each call used
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedBackend {
        pub outcomes: VecDeque<Result<String, UpstreamError>>,
        pub keys_used: Vec<String>,
        pub last_messages: Vec<ChatTurn>,
    }

    impl ScriptedBackend {
        pub fn new(outcomes: impl IntoIterator<Item = Result<String, UpstreamError>>) -> Self {
            Self {
                outcomes: outcomes.into_iter().collect(),
                ..Self::default()
            }
        }
    }

    impl CompletionBackend for ScriptedBackend {
        fn complete(
            &mut self,
            credential: &str,
            messages: &[ChatTurn],
            _params: &CompletionParams,
        ) -> Result<String, UpstreamError> {
            self.keys_used.push(credential.to_string());
            self.last_messages = messages.to_vec();
            self.outcomes
                .pop_front()
                .unwrap_or_else(|| Err(UpstreamError::Transient("no scripted outcome".into())))
        }
    }

    pub(crate) fn three_keys() -> Credentials {
        Credentials::new(["k1", "k2", "k3"].map(String::from))
    }

    fn transient() -> Result<String, UpstreamError> {
        Err(UpstreamError::Transient("rate limited".into()))
    }

    #[test]
    fn test_third_credential_succeeds() {
        let backend = ScriptedBackend::new([transient(), transient(), Ok("the stars answer".into())]);
        let mut relay = ChatRelay::new(backend, three_keys());
        let reply = relay.send(&[ChatTurn::user("why do stars twinkle?")]);
        assert_eq!(
            reply,
            Ok(RelayReply {
                reply: "the stars answer".into(),
                attempts: 3,
            })
        );
        assert_eq!(relay.backend().keys_used, ["k1", "k2", "k3"]);
    }

    #[test]
    fn test_system_prompt_prepended() {
        let backend = ScriptedBackend::new([Ok("ok".into())]);
        let mut relay = ChatRelay::new(backend, three_keys()).with_system_prompt("be brief");
        let _ = relay.send(&[ChatTurn::user("hi")]);
        let sent = &relay.backend().last_messages;
        assert_eq!(sent[0], ChatTurn::new(Role::System, "be brief"));
        assert_eq!(sent[1], ChatTurn::user("hi"));
    }

    #[test]
    fn test_client_fault_stops_early() {
        let backend = ScriptedBackend::new([
            Err(UpstreamError::ClientFault("bad request".into())),
            Ok("never".into()),
        ]);
        let mut relay = ChatRelay::new(backend, three_keys());
        let result = relay.send(&[ChatTurn::user("hi")]);
        assert!(matches!(result, Err(ChatError::Rejected { attempts: 1, .. })));
        assert_eq!(relay.backend().keys_used.len(), 1);
    }

    #[test]
    fn test_exhaustion_after_every_key() {
        let backend = ScriptedBackend::new([transient(), transient(), transient()]);
        let mut relay = ChatRelay::new(backend, three_keys());
        let result = relay.send(&[ChatTurn::user("hi")]);
        assert!(matches!(result, Err(ChatError::Exhausted { attempts: 3, last: Some(_) })));
    }

    #[test]
    fn test_rotation_continues_across_requests() {
        let backend = ScriptedBackend::new([transient(), Ok("a".into()), Ok("b".into())]);
        let mut relay = ChatRelay::new(backend, three_keys());
        let _ = relay.send(&[ChatTurn::user("one")]);
        let second = relay.send(&[ChatTurn::user("two")]);
        assert_eq!(second.map(|r| r.attempts), Ok(1));
        assert_eq!(relay.backend().keys_used, ["k1", "k2", "k3"]);
    }

    #[test]
    fn test_handler_status_mapping() {
        let mut relay = ChatRelay::new(ScriptedBackend::new([Ok("hi there".into())]), three_keys());
        assert_eq!(relay.handle("OPTIONS", "").status, 200);
        assert_eq!(relay.handle("OPTIONS", "").body_json(), "");
        assert_eq!(relay.handle("GET", "").status, 405);

        let bad = relay.handle("POST", "{not json");
        assert_eq!(bad.status, 400);
        assert_eq!(bad.body_json(), r#"{"error":"Invalid JSON"}"#);

        let missing = relay.handle("POST", r#"{"history":[]}"#);
        assert_eq!(missing.status, 400);
        assert_eq!(missing.body_json(), r#"{"error":"messages array required"}"#);

        let ok = relay.handle("POST", r#"{"messages":[{"role":"user","content":"hello"}]}"#);
        assert_eq!(ok.status, 200);
        assert_eq!(ok.body_json(), r#"{"reply":"hi there","keyUsed":1}"#);

        let mut empty = ChatRelay::new(ScriptedBackend::default(), Credentials::default());
        assert_eq!(empty.handle("POST", "{}").status, 500);
    }

    #[test]
    fn test_exhausted_handler_reports_detail() {
        let backend = ScriptedBackend::new([transient(), transient(), transient()]);
        let mut relay = ChatRelay::new(backend, three_keys());
        let reply = relay.handle("POST", r#"{"messages":[]}"#);
        assert_eq!(reply.status, 503);
        assert_eq!(
            reply.body,
            Some(ChatResponse::Error {
                error: "All API keys exhausted. Please try again.".into(),
                detail: Some("transient upstream failure: rate limited".into()),
            })
        );
    }

    #[test]
    fn test_credentials_hidden_and_blank_dropped() {
        let credentials = Credentials::new(["secret".to_string(), "  ".to_string()]);
        assert_eq!(credentials.len(), 1);
        assert!(!format!("{credentials:?}").contains("secret"));
    }
}
