use crate::config;

/// Thin wrapper around a [`reqwest::Client`] pointed at one provider base URL.
///
/// Both facades issue single-shot JSON POSTs; the transport attaches the API
/// key and a correlation id, and hands back status plus parsed body without
/// interpreting either. Error-code interpretation belongs to the facades.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Status and parsed JSON body of one round-trip.
///
/// Non-2xx replies are returned, not raised: the auth facade reads provider
/// error codes out of failure bodies.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config::http_timeout())
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub async fn post_json(
        &self,
        path: &str,
        request_body: &serde_json::Value,
    ) -> Result<HttpReply, TransportError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::debug!(path, request_id = %request_id, "dispatching provider request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            // Correlation id. Providers may ignore it, but applications can use it for linkage.
            .header("x-client-request-id", &request_id)
            .json(request_body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text)
            .unwrap_or_else(|_| serde_json::json!({ "error": { "message": text } }));

        Ok(HttpReply { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
