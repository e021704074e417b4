use crate::domain::error::TranslateError;
use crate::domain::model::Hop;
use crate::domain::traits::Translator;
use crate::infrastructure::network::client::{
    check_status, decode_json, ApiErrorDetail, TRANSLATION_TEMPERATURE,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const QUOTA_CODE: &str = "insufficient_quota";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize, Default)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn is_quota(detail: &ApiErrorDetail) -> bool {
    detail.code_str() == Some(QUOTA_CODE)
}

/// Chat-completions backend (`Authorization: Bearer`).
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, OPENAI_BASE_URL, api_key, model)
    }

    pub fn with_base_url(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Translator for OpenAiClient {
    async fn translate(&self, text: &str, hop: Hop) -> Result<String, TranslateError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: TRANSLATION_TEMPERATURE,
            messages: vec![
                Message {
                    role: "system",
                    content: format!(
                        "You are a translator. Translate the user text to {}. Return only the translation.",
                        hop.dst.name()
                    ),
                },
                Message {
                    role: "user",
                    content: text.to_string(),
                },
            ],
        };

        tracing::debug!(model = %self.model, %hop, "Sending chat completion request");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = check_status(response, is_quota).await?;
        let parsed: ChatResponse = decode_json(response).await?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default())
    }
}
