//! Multi-turn agronomist chat session.

use super::client::{extract_text, GenAiClient};
use crate::Result;
use serde_json::json;

/// Fixed low-temperature sampling, favoring determinism over creativity.
const CHAT_TEMPERATURE: f64 = 0.2;

/// Conversational session handle.
///
/// Holds the system instruction and the running history; each `send` posts the
/// whole history. No teardown or history persistence happens at this layer.
pub struct ChatSession<'a> {
    client: &'a GenAiClient,
    system_instruction: String,
    history: Vec<ChatTurn>,
}

#[derive(Debug, Clone)]
struct ChatTurn {
    role: &'static str,
    text: String,
}

impl GenAiClient {
    /// Construct a chat session configured with `system_instruction`.
    pub fn create_agronomist_chat(&self, system_instruction: impl Into<String>) -> ChatSession<'_> {
        ChatSession {
            client: self,
            system_instruction: system_instruction.into(),
            history: Vec::new(),
        }
    }
}

impl ChatSession<'_> {
    /// Send one user turn and return the model's reply text.
    ///
    /// The user turn is kept in history only when the round-trip succeeds, so
    /// a failed send leaves the session where it was.
    pub async fn send(&mut self, text: impl Into<String>) -> Result<String> {
        let user_turn = ChatTurn {
            role: "user",
            text: text.into(),
        };

        let contents: Vec<serde_json::Value> = self
            .history
            .iter()
            .chain(std::iter::once(&user_turn))
            .map(|turn| {
                json!({
                    "role": turn.role,
                    "parts": [{"text": turn.text}],
                })
            })
            .collect();

        let body = json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{"text": self.system_instruction}],
            },
            "generationConfig": {"temperature": CHAT_TEMPERATURE},
        });

        let reply = self.client.generate(self.client.text_model(), &body).await?;
        let answer = extract_text(&reply, "chat")?;

        self.history.push(user_turn);
        self.history.push(ChatTurn {
            role: "model",
            text: answer.clone(),
        });

        Ok(answer)
    }

    /// Number of turns exchanged so far (user and model turns both count).
    pub fn turn_count(&self) -> usize {
        self.history.len()
    }
}
