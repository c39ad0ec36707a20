use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::api::{ChatReply, ChatRequest, ErrorBody, HealthResponse, HistoryEntry, HistoryResponse};
use crate::error::{ApiError, Result};

/// The three endpoints the client consumes.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn health(&self) -> Result<HealthResponse>;

    /// Up to `limit` stored exchanges, newest first.
    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// Send one message and return the assistant's reply.
    async fn send_chat(&self, message: &str) -> Result<String>;
}

/// [`ChatBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        // A trailing slash keeps any path prefix when endpoints are joined.
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: ErrorBody = response.json().await?;
        Err(ApiError::Api {
            status: status.as_u16(),
            message: body.error.filter(|e| !e.is_empty()),
        })
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn health(&self) -> Result<HealthResponse> {
        let url = self.endpoint("api/health")?;
        debug!(%url, "checking backend health");

        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let url = self.endpoint("api/history")?;
        debug!(%url, limit, "fetching chat history");

        let response = self
            .client
            .get(url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        let history: HistoryResponse = Self::decode(response).await?;
        Ok(history.messages)
    }

    async fn send_chat(&self, message: &str) -> Result<String> {
        let url = self.endpoint("api/chat")?;
        debug!(%url, chars = message.chars().count(), "sending chat message");

        let request = ChatRequest {
            message: message.to_string(),
        };

        let response = self.client.post(url).json(&request).send().await?;

        let reply: ChatReply = Self::decode(response).await?;
        Ok(reply.ai_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let backend = HttpBackend::new("http://localhost:5000/chatbot").unwrap();
        assert_eq!(
            backend.endpoint("api/chat").unwrap().as_str(),
            "http://localhost:5000/chatbot/api/chat"
        );
    }

    #[test]
    fn bare_host_joins_at_root() {
        let backend = HttpBackend::new("http://localhost:5000").unwrap();
        assert_eq!(
            backend.endpoint("api/health").unwrap().as_str(),
            "http://localhost:5000/api/health"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            HttpBackend::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
