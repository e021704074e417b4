use crate::domain::error::TranslateError;
use crate::domain::model::Hop;
use crate::domain::traits::Translator;
use crate::infrastructure::network::client::{
    check_status, decode_json, ApiErrorDetail, TRANSLATION_TEMPERATURE,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_CONTENT: &str = "generateContent";
const QUOTA_STATUS: &str = "RESOURCE_EXHAUSTED";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModel>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GeminiModel {
    pub name: String,
    #[serde(rename = "supportedGenerationMethods", default)]
    pub supported_generation_methods: Vec<String>,
}

impl GeminiModel {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }

    pub fn id(&self) -> &str {
        normalize_model(&self.name)
    }
}

fn is_quota(detail: &ApiErrorDetail) -> bool {
    detail.status.as_deref() == Some(QUOTA_STATUS) || detail.code_num() == Some(429)
}

/// Catalog names come back as `models/<id>`; the URL wants the bare id.
pub fn normalize_model(model: &str) -> &str {
    let model = model.trim();
    model.strip_prefix("models/").unwrap_or(model)
}

/// Unwrap a reply the model put entirely in parentheses.
pub fn normalize_translation(text: &str) -> String {
    if text.chars().count() >= 2 && text.starts_with('(') && text.ends_with(')') {
        let inner = text[1..text.len() - 1].trim();
        if !inner.is_empty() {
            return inner.to_string();
        }
    }
    text.to_string()
}

/// Generate-content backend (`x-goog-api-key`).
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, GEMINI_BASE_URL, api_key, model)
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

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Every model advertising `generateContent`, across all catalog pages.
    pub async fn list_models(&self) -> Result<Vec<GeminiModel>, TranslateError> {
        let url = format!("{}/models", self.base());
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).header(API_KEY_HEADER, &self.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let response = check_status(request.send().await?, is_quota).await?;
            let page: ModelsResponse = decode_json(response).await?;

            models.extend(
                page.models
                    .into_iter()
                    .filter(GeminiModel::supports_generate_content),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(count = models.len(), "Fetched Gemini model catalog");
        Ok(models)
    }
}

#[async_trait]
impl Translator for GeminiClient {
    async fn translate(&self, text: &str, hop: Hop) -> Result<String, TranslateError> {
        let url = format!(
            "{}/models/{}:{}",
            self.base(),
            normalize_model(&self.model),
            GENERATE_CONTENT
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!(
                        "Translate the following text to {}. Return only the translation.\n\n{}",
                        hop.dst.name(),
                        text
                    ),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TRANSLATION_TEMPERATURE,
            },
        };

        tracing::debug!(model = %self.model, %hop, "Sending generateContent request");
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let response = check_status(response, is_quota).await?;
        let parsed: GenerateResponse = decode_json(response).await?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .unwrap_or_default();
        Ok(normalize_translation(text.trim()))
    }
}

/// In-memory model list, fetched once and shared by every query made
/// through this value.
pub struct ModelCatalog {
    client: GeminiClient,
    cached: Mutex<Option<Vec<GeminiModel>>>,
}

impl ModelCatalog {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            cached: Mutex::new(None),
        }
    }

    pub async fn models(&self) -> Result<Vec<GeminiModel>, TranslateError> {
        let mut cached = self.cached.lock().await;
        if let Some(models) = cached.as_ref() {
            return Ok(models.clone());
        }
        let models = self.client.list_models().await?;
        *cached = Some(models.clone());
        Ok(models)
    }

    pub async fn model_ids(&self) -> Result<Vec<String>, TranslateError> {
        Ok(self
            .models()
            .await?
            .iter()
            .map(|m| m.id().to_string())
            .collect())
    }

    /// Accepts either `gemini-x` or `models/gemini-x`.
    pub async fn supports(&self, model: &str) -> Result<bool, TranslateError> {
        let wanted = normalize_model(model);
        Ok(self.models().await?.iter().any(|m| m.id() == wanted))
    }
}
