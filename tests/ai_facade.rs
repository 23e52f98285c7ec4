//! Integration tests for the AI facade against a mock provider.

use cropsense::ai::{encode_inline, GenAiClient};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const TEXT_PATH: &str = "/v1beta/models/text-model:generateContent";
const AUDIO_PATH: &str = "/v1beta/models/audio-model:generateContent";

async fn test_client(server: &ServerGuard) -> GenAiClient {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    GenAiClient::builder()
        .api_key("test-key")
        .base_url_override(server.url())
        .text_model("text-model")
        .audio_model("audio-model")
        .build()
        .expect("failed to build client")
}

fn text_reply(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}]}
        }]
    })
    .to_string()
}

fn audio_reply() -> String {
    json!({
        "candidates": [{
            "content": {"parts": [{
                "inlineData": {"mimeType": "audio/L16;rate=24000", "data": "UklGRg=="}
            }]}
        }]
    })
    .to_string()
}

#[tokio::test]
async fn empty_analysis_text_yields_fully_empty_outcome() {
    let mut server = Server::new_async().await;
    let _analysis = server
        .mock("POST", TEXT_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_reply(""))
        .create_async()
        .await;
    // The audio call must not even be attempted.
    let audio = server
        .mock("POST", AUDIO_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(audio_reply())
        .expect(0)
        .create_async()
        .await;

    let client = test_client(&server).await;
    let outcome = client
        .analyze_pest(&encode_inline(b"img"), "image/jpeg", "what is this", "{name}")
        .await;

    assert!(outcome.analysis.is_none());
    assert!(outcome.audio.is_none());
    audio.assert_async().await;
}

#[tokio::test]
async fn provider_error_on_primary_call_yields_fully_empty_outcome() {
    let mut server = Server::new_async().await;
    let _analysis = server
        .mock("POST", TEXT_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(json!({"error": {"message": "backend melted"}}).to_string())
        .create_async()
        .await;

    let client = test_client(&server).await;
    let outcome = client
        .analyze_pest("aW1n", "image/jpeg", "what is this", "{name}")
        .await;

    assert!(outcome.analysis.is_none());
    assert!(outcome.audio.is_none());
}

#[tokio::test]
async fn failing_audio_call_still_returns_analysis() {
    let mut server = Server::new_async().await;
    let pest_json = json!({
        "name": "Aphid",
        "description": "Small sap-sucking insect",
        "prevention": ["encourage ladybirds"],
        "treatment": ["spray neem oil"]
    });
    let _analysis = server
        .mock("POST", TEXT_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(text_reply(&pest_json.to_string()))
        .create_async()
        .await;
    let _audio = server
        .mock("POST", AUDIO_PATH)
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(json!({"error": {"message": "rate limited"}}).to_string())
        .create_async()
        .await;

    let client = test_client(&server).await;
    let outcome = client
        .analyze_pest("aW1n", "image/jpeg", "what is this", "{name}: {treatment}")
        .await;

    let analysis = outcome.analysis.expect("analysis should survive audio failure");
    assert_eq!(analysis.name, "Aphid");
    assert_eq!(analysis.treatment, vec!["spray neem oil"]);
    assert!(outcome.audio.is_none());
}

#[tokio::test]
async fn synthesis_prompt_has_placeholders_substituted() {
    let mut server = Server::new_async().await;
    let soil_json = json!({
        "soil_type": "Loam",
        "ph_level_estimate": "6.5",
        "nutrient_deficiencies": ["nitrogen", "potassium"],
        "recommendations": ["add compost"]
    });
    let _analysis = server
        .mock("POST", TEXT_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(text_reply(&soil_json.to_string()))
        .create_async()
        .await;

    let expected_speech =
        "Soil is Loam with pH 6.5. Lacking: nitrogen. potassium. Do: add compost";
    let audio = server
        .mock("POST", AUDIO_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "contents": [{"parts": [{"text": expected_speech}]}]
        })))
        .with_status(200)
        .with_body(audio_reply())
        .create_async()
        .await;

    let client = test_client(&server).await;
    let outcome = client
        .analyze_soil_by_image(
            "aW1n",
            "image/png",
            "assess this soil",
            "Soil is {type} with pH {ph}. Lacking: {deficiencies}. Do: {recommendations}",
        )
        .await;

    audio.assert_async().await;
    let analysis = outcome.analysis.expect("analysis");
    assert_eq!(analysis.ph_estimate, "6.5");
    assert_eq!(analysis.deficiencies, vec!["nitrogen", "potassium"]);
    let audio = outcome.audio.expect("audio");
    assert_eq!(audio.data, "UklGRg==");
    assert_eq!(audio.mime_type.as_deref(), Some("audio/L16;rate=24000"));
}

#[tokio::test]
async fn summary_audio_is_truncated_but_text_is_not() {
    let mut server = Server::new_async().await;
    let long_text = "w".repeat(1500);
    let reply = json!({
        "candidates": [{
            "content": {"parts": [{"text": long_text}]},
            "groundingMetadata": {
                "groundingChunks": [
                    {"web": {"uri": "https://agri.example/a", "title": "First"}},
                    {"web": {"uri": "https://agri.example/b", "title": "Second"}}
                ]
            }
        }]
    });
    let _summary = server
        .mock("POST", TEXT_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(reply.to_string())
        .create_async()
        .await;

    let truncated = "w".repeat(1000);
    let audio = server
        .mock("POST", AUDIO_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "contents": [{"parts": [{"text": truncated}]}]
        })))
        .with_status(200)
        .with_body(audio_reply())
        .create_async()
        .await;

    let client = test_client(&server).await;
    let outcome = client.get_daily_summary("today's report", "{summary}").await;

    audio.assert_async().await;
    let summary = outcome.summary.expect("summary");
    assert_eq!(summary.text.len(), 1500);
    // Citations keep provider order.
    assert_eq!(summary.sources.len(), 2);
    assert_eq!(summary.sources[0].uri.as_deref(), Some("https://agri.example/a"));
    assert_eq!(summary.sources[1].title.as_deref(), Some("Second"));
    assert!(outcome.audio.is_some());
}

#[tokio::test]
async fn chat_session_keeps_history_and_fixed_temperature() {
    let mut server = Server::new_async().await;
    let chat = server
        .mock("POST", TEXT_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "systemInstruction": {"parts": [{"text": "You are an agronomist."}]},
            "generationConfig": {"temperature": 0.2}
        })))
        .with_status(200)
        .with_body(text_reply("Rotate your crops."))
        .expect(2)
        .create_async()
        .await;

    let client = test_client(&server).await;
    let mut session = client.create_agronomist_chat("You are an agronomist.");

    let first = session.send("My maize leaves are yellowing.").await.unwrap();
    assert_eq!(first, "Rotate your crops.");
    assert_eq!(session.turn_count(), 2);

    session.send("What else?").await.unwrap();
    assert_eq!(session.turn_count(), 4);
    chat.assert_async().await;
}

#[tokio::test]
async fn failed_chat_send_leaves_history_unchanged() {
    let mut server = Server::new_async().await;
    let _chat = server
        .mock("POST", TEXT_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body(json!({"error": {"message": "overloaded"}}).to_string())
        .create_async()
        .await;

    let client = test_client(&server).await;
    let mut session = client.create_agronomist_chat("You are an agronomist.");

    assert!(session.send("hello?").await.is_err());
    assert_eq!(session.turn_count(), 0);
}
