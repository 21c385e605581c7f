//! OpenAI-compatible adapter for free-chat replies.
//!
//! Supports OpenAI API, Azure OpenAI, and local Ollama instances.

use crate::domain::DomainError;
use crate::ports::AiPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// OpenAI-compatible AI adapter.
///
/// Can be configured to work with:
/// - OpenAI API (api.openai.com)
/// - Azure OpenAI
/// - Ollama (localhost)
/// - Any OpenAI-compatible API
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdapter {
    /// Create a new OpenAI adapter.
    ///
    /// # Arguments
    /// * `api_url` - API endpoint (e.g., "https://api.openai.com/v1/chat/completions")
    /// * `api_key` - API key (can be empty for local Ollama)
    /// * `model` - Model name (e.g., "gpt-4o-mini", "llama3.2")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    fn system_prompt() -> &'static str {
        "Kamu adalah asisten kelas yang ramah untuk grup kuliah. \
         Jawab singkat dan jelas, dalam bahasa yang sama dengan pertanyaan \
         (Indonesia atau Inggris). Gunakan konteks jadwal yang diberikan bila \
         relevan; jangan mengarang jadwal yang tidak ada di konteks. \
         Jangan pernah meminta atau mengulang kata sandi, token, atau data \
         sensitif lainnya."
    }

    /// Build the user prompt with the store snapshot as grounding context.
    fn user_prompt(prompt: &str, context: &str) -> String {
        if context.trim().is_empty() {
            prompt.to_string()
        } else {
            format!(
                "Konteks jadwal saat ini:\n{}\n\nPesan pengguna:\n{}",
                context, prompt
            )
        }
    }
}

/// OpenAI API request structure.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI API response structure.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

#[async_trait::async_trait]
impl AiPort for OpenAiAdapter {
    async fn reply(&self, prompt: &str, context: &str) -> Result<String, DomainError> {
        info!(
            prompt_len = prompt.len(),
            context_len = context.len(),
            "sending free-chat prompt to AI"
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::system_prompt().to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Self::user_prompt(prompt, context),
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "AI API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| DomainError::Ai("No response choices returned".to_string()))?;

        debug!(reply_len = content.len(), "received AI response");

        Ok(content)
    }
}
