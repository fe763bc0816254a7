// src/chat/frontend.rs
use tracing::{info, warn};

use crate::chat::client::QueryApiClient;
use crate::models::ChatMessage;

pub const GREETING: &str = "Hi! Ask me about the catalog and I'll search its metadata for you.";
pub const CONNECT_FAILED: &str =
    "Could not reach the search API. Please check your configuration.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// Chat session state: connectivity, the ordered message log, the loading
/// flag, and a dismissable error banner. Starts disconnected; `connect`
/// probes the API once and there is no automatic retry afterwards, so a
/// fresh front-end is the recovery path.
pub struct ChatFrontend {
    client: QueryApiClient,
    status: ConnectionStatus,
    messages: Vec<ChatMessage>,
    loading: bool,
    error: Option<String>,
}

impl ChatFrontend {
    pub fn new(client: QueryApiClient) -> Self {
        Self {
            client,
            status: ConnectionStatus::Disconnected,
            messages: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// One health probe. Success greets the user; failure raises the
    /// configuration banner and leaves the session disconnected.
    pub async fn connect(&mut self) {
        match self.client.health().await {
            Ok(health) => {
                info!("search API is {}", health.status);
                self.status = ConnectionStatus::Connected;
                self.messages.push(ChatMessage::assistant(GREETING));
            }
            Err(err) => {
                warn!("search API health check failed: {}", err);
                self.status = ConnectionStatus::Disconnected;
                self.error = Some(CONNECT_FAILED.to_string());
            }
        }
    }

    /// Submit one message. Returns `false`, with no network call, when the
    /// session is disconnected or the trimmed text is empty. Otherwise issues
    /// exactly one query; the response (or the error, on the banner and in
    /// the log) lands in the message log, and loading clears either way.
    pub async fn send(&mut self, text: &str) -> bool {
        let text = text.trim();
        if !self.is_connected() || text.is_empty() {
            return false;
        }

        self.messages.push(ChatMessage::user(text));
        self.loading = true;
        match self.client.query(text).await {
            Ok(reply) => {
                self.messages.push(ChatMessage::assistant(reply.response));
            }
            Err(err) => {
                let text = err.to_string();
                self.messages.push(ChatMessage::assistant(text.clone()));
                self.error = Some(text);
            }
        }
        self.loading = false;
        true
    }
}
