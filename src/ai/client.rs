use crate::config;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use once_cell::sync::OnceCell;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_AUDIO_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Client for the generative-language API.
///
/// Holds the HTTP transport and the model ids used for text and audio calls.
/// Usually accessed through [`global`]; built explicitly in tests so the base
/// URL can point at a mock server.
pub struct GenAiClient {
    pub(crate) transport: HttpTransport,
    text_model: String,
    audio_model: String,
}

static GLOBAL: OnceCell<GenAiClient> = OnceCell::new();

/// Process-wide client, constructed once from configuration (keyring/env) and
/// held for the process lifetime. No teardown is defined or required.
pub fn global() -> Result<&'static GenAiClient> {
    GLOBAL.get_or_try_init(|| GenAiClientBuilder::new().build())
}

impl GenAiClient {
    pub fn builder() -> GenAiClientBuilder {
        GenAiClientBuilder::new()
    }

    /// POST one `generateContent` request against `model` and return the
    /// parsed reply body. Non-2xx replies become [`Error::Provider`].
    pub(crate) async fn generate(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let path = format!("/v1beta/models/{}:generateContent", model);
        let reply = self.transport.post_json(&path, body).await?;
        if !reply.is_success() {
            let message = reply.body["error"]["message"]
                .as_str()
                .unwrap_or("unspecified provider failure")
                .to_string();
            return Err(Error::Provider {
                status: reply.status,
                message,
            });
        }
        Ok(reply.body)
    }

    pub(crate) fn text_model(&self) -> &str {
        &self.text_model
    }

    pub(crate) fn audio_model(&self) -> &str {
        &self.audio_model
    }
}

/// Concatenated text of the first candidate's parts; `Err(EmptyResponse)` when
/// there is none. `operation` tags the error context for diagnostics.
pub(crate) fn extract_text(reply: &serde_json::Value, operation: &str) -> Result<String> {
    let mut out = String::new();
    if let Some(parts) = reply["candidates"][0]["content"]["parts"].as_array() {
        for part in parts {
            if let Some(text) = part["text"].as_str() {
                out.push_str(text);
            }
        }
    }
    if out.trim().is_empty() {
        return Err(Error::empty_response(operation));
    }
    Ok(out)
}

/// Builder for [`GenAiClient`].
///
/// Keep this surface area small and predictable: api key, model ids, and a
/// base-url override for mock servers.
pub struct GenAiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    text_model: Option<String>,
    audio_model: Option<String>,
}

impl GenAiClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            text_model: None,
            audio_model: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the provider base URL (primarily for testing with mock servers).
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = Some(model.into());
        self
    }

    pub fn audio_model(mut self, model: impl Into<String>) -> Self {
        self.audio_model = Some(model.into());
        self
    }

    pub fn build(self) -> Result<GenAiClient> {
        let api_key = self
            .api_key
            .or_else(|| config::resolve_api_key("genai"))
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key required",
                    ErrorContext::new().with_field_path("config.api_key"),
                )
            })?;
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let transport = HttpTransport::new(base_url, api_key)?;

        Ok(GenAiClient {
            transport,
            text_model: self.text_model.unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            audio_model: self
                .audio_model
                .unwrap_or_else(|| DEFAULT_AUDIO_MODEL.to_string()),
        })
    }
}

impl Default for GenAiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
