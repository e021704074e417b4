use crate::domain::script::{detect, ScriptTag};
use serde::{Deserialize, Serialize};
use std::fmt;

// 翻译后端
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Local,
    OpenAi,
    Gemini,
}

impl Provider {
    /// Used when the configured value is missing or unrecognised.
    pub const DEFAULT: Provider = Provider::Gemini;

    /// Parse the `provider` setting. Never fails: anything unknown falls
    /// back to [`Provider::DEFAULT`] so a half-written config stays usable.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("local") => Provider::Local,
            Some("openai") => Provider::OpenAi,
            Some("gemini") => Provider::Gemini,
            Some("") | None => Provider::DEFAULT,
            Some(other) => {
                tracing::warn!(provider = other, "Unknown provider, using default");
                Provider::DEFAULT
            }
        }
    }

    pub fn setting_name(&self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }

    /// Account name under which the provider's API key lives in the vault.
    pub fn key_account(&self) -> Option<&'static str> {
        match self {
            Provider::Local => None,
            Provider::OpenAi => Some("OpenAIAPIKey"),
            Provider::Gemini => Some("GeminiAPIKey"),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Local => "Local",
            Provider::OpenAi => "OpenAI",
            Provider::Gemini => "Gemini",
        };
        f.write_str(name)
    }
}

// 语言代码
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    Hebrew,
    English,
    Russian,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Hebrew => "he",
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Hebrew => "Hebrew",
            Language::English => "English",
            Language::Russian => "Russian",
        }
    }
}

/// One translation step, `src -> dst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub src: Language,
    pub dst: Language,
}

impl Hop {
    pub const fn new(src: Language, dst: Language) -> Self {
        Self { src, dst }
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.src.code(), self.dst.code())
    }
}

/// Immutable per-trigger request.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub source_text: String,
    pub script: ScriptTag,
    pub provider: Provider,
}

impl TranslationRequest {
    pub fn new(source_text: impl Into<String>, provider: Provider) -> Self {
        let source_text = source_text.into();
        let script = detect(&source_text);
        Self {
            source_text,
            script,
            provider,
        }
    }

    /// Language the text is assumed to be in.
    pub fn source_language(&self) -> Language {
        match self.script {
            ScriptTag::PivotScript => Language::Hebrew,
            ScriptTag::Default => Language::English,
        }
    }
}

/// Configuration snapshot taken once at the start of a request.
///
/// Both pivot hops see the same snapshot; nothing re-reads settings
/// while a request is in flight.
#[derive(Clone, PartialEq)]
pub struct BackendConfig {
    pub provider: Provider,
    pub command_template: String,
    pub api_key: String,
    pub model_id: String,
    pub max_chars: u32,
    pub models_dir: String,
}

// api_key must never end up in logs
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("command_template", &self.command_template)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model_id", &self.model_id)
            .field("max_chars", &self.max_chars)
            .field("models_dir", &self.models_dir)
            .finish()
    }
}

// 翻译结果 (用于展示和 JSON 输出)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutcome {
    pub input: String,
    pub source_lang: String,
    pub provider: Provider,
    pub translation: Option<String>,
    pub error: Option<String>,
    pub quota_exceeded: bool,
}

impl TranslationOutcome {
    pub fn is_success(&self) -> bool {
        self.translation.is_some()
    }

    /// Text for the result surface. Always non-empty.
    pub fn display_text(&self) -> String {
        match (&self.translation, &self.error) {
            (Some(text), _) => text.clone(),
            (None, Some(err)) => format!("Translation error: {}", err),
            (None, None) => "Empty response.".to_string(),
        }
    }
}
