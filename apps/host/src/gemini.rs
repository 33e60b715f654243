//! Gemini REST client.
//!
//! Speaks the `generateContent` endpoint directly with reqwest. Conversation
//! replies are requested with the full history every time, so the client keeps
//! no session state of its own.

use crate::config::HostConfig;
use crate::error::{HostError, Result};
use lingo_core::chat::validate_history;
use lingo_core::{ChatError, ChatMessage, LanguageModel, LessonPlan, Role};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Persona used for conversation practice and generated lessons.
pub const SYSTEM_INSTRUCTION: &str = "You are Captain Jack Sparrow, a witty pirate captain who \
teaches business English to Cengo, a Turkish speaker at A2/B1 level preparing for an eyewear \
trade fair. Keep replies short and simple, stay in character, gently correct mistakes and \
end with a question that keeps the conversation going.";

// === API Request/Response Types ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    /// Single-turn prompt.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::text(Some("user"), text)],
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Conversation turns in order, with the persona as system instruction.
    pub fn conversation(history: &[ChatMessage]) -> Self {
        let contents = history
            .iter()
            .map(|message| {
                let role = match message.role {
                    Role::User => "user",
                    Role::Model => "model",
                };
                Content::text(Some(role), message.text.clone())
            })
            .collect();
        Self {
            contents,
            system_instruction: Some(Content::text(None, SYSTEM_INSTRUCTION)),
            generation_config: None,
        }
    }

    pub fn json_output(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
        });
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Prompt asking for a plain translation of one sentence.
pub fn translation_prompt(text: &str) -> String {
    format!(
        "You are a helpful language assistant. Provide a simple and natural Turkish translation \
         for the following English sentence, which is for a beginner English learner. Do not add \
         any extra text or quotation marks, just the translation itself. The sentence is: \"{text}\""
    )
}

/// Prompt asking for a full lesson plan as JSON.
pub fn lesson_prompt(topic: Option<&str>) -> String {
    let topic = topic.unwrap_or("a randomly chosen but simple, fundamental topic for an A2 learner");
    format!(
        "Create a daily English lesson plan for a Turkish speaker named Cengo, a beginner \
         (A2/B1 level) preparing for an eyewear trade fair. Make the explanation fun and \
         pirate-themed. Vocabulary and sentences should relate to business, eyewear, sailing \
         or diving.\n\
         The lesson must be structured around this grammar topic: {topic}.\n\
         Reply with one JSON object with the fields grammarTopic, explanation (under 50 words), \
         detailedExplanation (an array of parts: {{\"type\":\"text\",\"content\"}}, \
         {{\"type\":\"example\",\"english\",\"turkish\"}} or \
         {{\"type\":\"quiz\",\"question\",\"options\",\"answer\"}} where answer is one of the \
         options), vocabulary (5-7 items with english, turkish and category, one of Eyewear, \
         Business, Marine, Diving, Sailboats, AI & Tech, Global News), fillInBlanks (3-4 items \
         with sentence using ___ for the gap, turkish, blank and 4 options), conversationPrompt \
         and summary."
    )
}

/// HTTP client for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: api_base.into(),
        }
    }

    pub fn from_config(config: &HostConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| HostError::Config("GEMINI_API_KEY is not set".to_string()))?;
        Ok(Self::new(api_key, config.model.clone(), config.api_base.clone()))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    /// Run one generateContent call and return the reply text.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(HostError::Model { status, message });
        }

        let response: GenerateResponse = resp.json().await?;
        response.text().ok_or(HostError::EmptyReply)
    }

    /// Ask the model for a fresh lesson plan.
    pub async fn generate_lesson(&self, topic: Option<&str>) -> Result<LessonPlan> {
        let mut request = GenerateRequest::prompt(lesson_prompt(topic)).json_output();
        request.system_instruction = Some(Content::text(None, SYSTEM_INSTRUCTION));

        let text = self.generate(&request).await.map_err(|e| {
            tracing::warn!(error = %e, "lesson generation failed");
            e
        })?;
        let plan = LessonPlan::from_model_text(&text).map_err(|e| {
            tracing::warn!(error = %e, "model returned an unusable lesson plan");
            e
        })?;
        Ok(plan)
    }
}

fn service_error(e: HostError) -> ChatError {
    tracing::warn!(error = %e, "language model request failed");
    ChatError::Service(e.to_string())
}

impl LanguageModel for GeminiClient {
    async fn translate(&self, text: &str) -> std::result::Result<String, ChatError> {
        let request = GenerateRequest::prompt(translation_prompt(text));
        self.generate(&request)
            .await
            .map(|t| t.trim().to_string())
            .map_err(service_error)
    }

    async fn chat(&self, history: &[ChatMessage]) -> std::result::Result<String, ChatError> {
        validate_history(history)?;
        let request = GenerateRequest::conversation(history);
        self.generate(&request).await.map_err(service_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn conversation_request_shape() {
        let history = vec![
            ChatMessage::model("Ahoy! What brings ye aboard?"),
            ChatMessage::user("I sell sunglasses."),
        ];
        let body = serde_json::to_value(GenerateRequest::conversation(&history)).unwrap();
        assert_eq!(
            body["contents"],
            json!([
                {"role": "model", "parts": [{"text": "Ahoy! What brings ye aboard?"}]},
                {"role": "user", "parts": [{"text": "I sell sunglasses."}]}
            ])
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn json_output_sets_mime_type() {
        let body = serde_json::to_value(GenerateRequest::prompt("x").json_output()).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn response_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Aye, "}, {"text": "matey."}]}}]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Aye, matey."));

        let empty: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn prompts_mention_inputs() {
        assert!(translation_prompt("Hello").contains("\"Hello\""));
        assert!(lesson_prompt(Some("Past Simple")).contains("Past Simple"));
        assert!(lesson_prompt(None).contains("randomly chosen"));
    }

    #[test]
    fn client_requires_api_key() {
        let config = HostConfig::from_lookup(|_| None);
        assert!(matches!(
            GeminiClient::from_config(&config),
            Err(HostError::Config(_))
        ));
    }

    #[tokio::test]
    async fn chat_rejects_history_ending_with_model() {
        let client = GeminiClient::new("key", "gemini-2.5-flash", "http://127.0.0.1:9");
        let history = vec![ChatMessage::model("Ahoy")];
        assert_eq!(
            client.chat(&history).await,
            Err(ChatError::LastMessageNotFromUser)
        );
    }
}
