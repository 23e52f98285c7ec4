//! Analysis and summary operations.
//!
//! Failures never escape these methods: the primary call folds to an empty
//! outcome, the secondary audio call folds to `audio: None`. The two failure
//! classes have different blast radii and are kept independent.

use super::client::{extract_text, GenAiClient};
use super::schema;
use super::template;
use super::types::{
    AnalysisOutcome, AudioPayload, DailySummaryResult, PestAnalysisResult, SoilAnalysisResult,
    SourceCitation, SummaryOutcome,
};
use crate::Result;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Synthesis requests are bounded; only the spoken rendition is truncated,
/// never the returned summary text.
const SUMMARY_SPEECH_MAX_CHARS: usize = 1000;

impl GenAiClient {
    /// Identify a pest from an image and narrate the result.
    ///
    /// `audio_template` carries the placeholders `{name}`, `{description}`,
    /// `{prevention}`, `{treatment}`.
    pub async fn analyze_pest(
        &self,
        image_base64: &str,
        mime_type: &str,
        prompt: &str,
        audio_template: &str,
    ) -> AnalysisOutcome<PestAnalysisResult> {
        let analysis: PestAnalysisResult = match self
            .image_analysis(
                image_base64,
                mime_type,
                prompt,
                schema::pest_response_schema(),
                "pest_analysis",
            )
            .await
        {
            Ok(analysis) => analysis,
            Err(error) => {
                tracing::warn!(%error, "pest analysis failed");
                return AnalysisOutcome::empty();
            }
        };

        let speech = template::render(
            audio_template,
            &[
                ("name", analysis.name.clone()),
                ("description", analysis.description.clone()),
                ("prevention", template::join_list(&analysis.prevention)),
                ("treatment", template::join_list(&analysis.treatment)),
            ],
        );
        let audio = self.best_effort_audio(&speech, "pest_analysis").await;

        AnalysisOutcome {
            analysis: Some(analysis),
            audio,
        }
    }

    /// Assess soil from an image and narrate the result.
    ///
    /// `audio_template` carries the placeholders `{type}`, `{ph}`,
    /// `{deficiencies}`, `{recommendations}`.
    pub async fn analyze_soil_by_image(
        &self,
        image_base64: &str,
        mime_type: &str,
        prompt: &str,
        audio_template: &str,
    ) -> AnalysisOutcome<SoilAnalysisResult> {
        let analysis: SoilAnalysisResult = match self
            .image_analysis(
                image_base64,
                mime_type,
                prompt,
                schema::soil_response_schema(),
                "soil_analysis",
            )
            .await
        {
            Ok(analysis) => analysis,
            Err(error) => {
                tracing::warn!(%error, "soil analysis failed");
                return AnalysisOutcome::empty();
            }
        };

        let speech = template::render(
            audio_template,
            &[
                ("type", analysis.soil_type.clone()),
                ("ph", analysis.ph_estimate.clone()),
                ("deficiencies", template::join_list(&analysis.deficiencies)),
                (
                    "recommendations",
                    template::join_list(&analysis.recommendations),
                ),
            ],
        );
        let audio = self.best_effort_audio(&speech, "soil_analysis").await;

        AnalysisOutcome {
            analysis: Some(analysis),
            audio,
        }
    }

    /// Search-grounded free-text summary plus citations, with a spoken
    /// rendition of at most the first [`SUMMARY_SPEECH_MAX_CHARS`] characters.
    ///
    /// `audio_template` carries the `{summary}` placeholder.
    pub async fn get_daily_summary(&self, prompt: &str, audio_template: &str) -> SummaryOutcome {
        let summary = match self.grounded_summary(prompt).await {
            Ok(summary) => summary,
            Err(error) => {
                tracing::warn!(%error, "daily summary failed");
                return SummaryOutcome::empty();
            }
        };

        let spoken = template::truncate_chars(&summary.text, SUMMARY_SPEECH_MAX_CHARS);
        let speech = template::render(audio_template, &[("summary", spoken.to_string())]);
        let audio = self.best_effort_audio(&speech, "daily_summary").await;

        SummaryOutcome {
            summary: Some(summary),
            audio,
        }
    }

    async fn image_analysis<T: DeserializeOwned>(
        &self,
        image_base64: &str,
        mime_type: &str,
        prompt: &str,
        response_schema: serde_json::Value,
        operation: &str,
    ) -> Result<T> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {"inlineData": {"mimeType": mime_type, "data": image_base64}},
                    {"text": prompt},
                ],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema,
            }
        });

        let reply = self.generate(self.text_model(), &body).await?;
        let text = extract_text(&reply, operation)?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn grounded_summary(&self, prompt: &str) -> Result<DailySummaryResult> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}],
            }],
            "tools": [{"google_search": {}}],
        });

        let reply = self.generate(self.text_model(), &body).await?;
        let text = extract_text(&reply, "daily_summary")?;

        // Citations stay in provider order.
        let sources = reply["candidates"][0]["groundingMetadata"]["groundingChunks"]
            .as_array()
            .map(|chunks| {
                chunks
                    .iter()
                    .map(|chunk| SourceCitation {
                        uri: chunk["web"]["uri"].as_str().map(str::to_string),
                        title: chunk["web"]["title"].as_str().map(str::to_string),
                        raw: chunk.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(DailySummaryResult { text, sources })
    }

    /// Secondary call: synthesis failures are swallowed so the primary result
    /// still reaches the caller. The cause is logged but not surfaced.
    async fn best_effort_audio(&self, speech_prompt: &str, operation: &str) -> Option<AudioPayload> {
        match self.synthesize_speech(speech_prompt).await {
            Ok(audio) => Some(audio),
            Err(error) => {
                tracing::warn!(%error, operation, "audio synthesis failed; continuing without audio");
                None
            }
        }
    }
}
