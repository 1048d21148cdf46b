use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Serialized as `null` when absent; the backend expects the key.
    pub conversation_id: Option<String>,
}

/// Successful reply from `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Passed through untouched; nothing here reads it.
    #[serde(default)]
    pub sources: Option<serde_json::Value>,
}

impl ChatResponse {
    /// Conversation id from the reply, with empty strings treated as absent.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// HTTP client for the chat backend
#[derive(Clone)]
pub struct ChatClient {
    base_url: String,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        // No timeout: requests run until the platform gives up.
        let client = reqwest::Client::builder()
            .user_agent(concat!("asked/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one user message and return the backend's reply
    pub async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> ClientResult<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url);
        let payload = ChatRequest {
            message: message.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        };

        debug!(%url, conversation_id = ?payload.conversation_id, "sending chat message");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let body = Self::checked_body(response).await?;
        let reply: ChatResponse = serde_json::from_str(&body)?;

        debug!(conversation_id = ?reply.conversation_id, "chat reply received");
        Ok(reply)
    }

    /// Fetch the backend's analytics object as-is
    pub async fn get_analytics(&self) -> ClientResult<serde_json::Value> {
        let url = format!("{}/api/analytics", self.base_url);
        debug!(%url, "fetching analytics");

        let response = self.client.get(&url).send().await?;
        let body = Self::checked_body(response).await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Read the body of a 2xx response, or turn anything else into a backend error.
    async fn checked_body(response: reqwest::Response) -> ClientResult<String> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "backend returned an error status");
            return Err(ClientError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}
