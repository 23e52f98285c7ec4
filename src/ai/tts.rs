//! Speech-synthesis call.

use super::client::GenAiClient;
use super::types::AudioPayload;
use crate::{Error, ErrorContext, Result};
use serde_json::json;

/// Fixed preset voice used for every spoken rendition.
const VOICE_NAME: &str = "Kore";

impl GenAiClient {
    /// Request a spoken rendition of `text` and return the inline base64 audio.
    pub(crate) async fn synthesize_speech(&self, text: &str) -> Result<AudioPayload> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": text}],
            }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": {"voiceName": VOICE_NAME}
                    }
                }
            }
        });

        let reply = self.generate(self.audio_model(), &body).await?;
        let inline = &reply["candidates"][0]["content"]["parts"][0]["inlineData"];
        let data = inline["data"].as_str().ok_or_else(|| Error::EmptyResponse {
            context: ErrorContext::new()
                .with_field_path("candidates[0].content.parts[0].inlineData.data")
                .with_source("tts"),
        })?;

        Ok(AudioPayload {
            data: data.to_string(),
            mime_type: inline["mimeType"].as_str().map(str::to_string),
        })
    }
}
