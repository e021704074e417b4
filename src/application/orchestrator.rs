use crate::domain::error::TranslateError;
use crate::domain::model::{BackendConfig, Hop, Language, Provider, TranslationRequest};
use crate::domain::script::ScriptTag;
use crate::domain::traits::Translator;
use crate::infrastructure::network::{GeminiClient, OpenAiClient};
use crate::infrastructure::process::LocalTranslator;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

const DIRECT: [Hop; 1] = [Hop::new(Language::English, Language::Russian)];
const PIVOT: [Hop; 2] = [
    Hop::new(Language::Hebrew, Language::English),
    Hop::new(Language::English, Language::Russian),
];

/// Hops to run for a script: one direct hop, or he→en→ru.
pub fn plan(script: ScriptTag) -> &'static [Hop] {
    match script {
        ScriptTag::Default => &DIRECT,
        ScriptTag::PivotScript => &PIVOT,
    }
}

/// The configured backend. Adding a provider means one variant here and
/// one arm in [`Backend::from_config`].
pub enum Backend {
    Local(LocalTranslator),
    OpenAi(OpenAiClient),
    Gemini(GeminiClient),
}

fn require_key(config: &BackendConfig) -> Result<String, TranslateError> {
    if config.api_key.is_empty() {
        return Err(TranslateError::MissingApiKey(config.provider));
    }
    Ok(config.api_key.clone())
}

impl Backend {
    pub fn from_config(config: &BackendConfig, http: &Client) -> Result<Self, TranslateError> {
        let backend = match config.provider {
            Provider::Local => Backend::Local(LocalTranslator::from_config(config)),
            Provider::OpenAi => Backend::OpenAi(OpenAiClient::new(
                http.clone(),
                require_key(config)?,
                config.model_id.clone(),
            )),
            Provider::Gemini => Backend::Gemini(GeminiClient::new(
                http.clone(),
                require_key(config)?,
                config.model_id.clone(),
            )),
        };
        Ok(backend)
    }

    pub fn provider(&self) -> Provider {
        match self {
            Backend::Local(_) => Provider::Local,
            Backend::OpenAi(_) => Provider::OpenAi,
            Backend::Gemini(_) => Provider::Gemini,
        }
    }
}

#[async_trait]
impl Translator for Backend {
    async fn translate(&self, text: &str, hop: Hop) -> Result<String, TranslateError> {
        match self {
            Backend::Local(local) => local.translate(text, hop).await,
            Backend::OpenAi(openai) => openai.translate(text, hop).await,
            Backend::Gemini(gemini) => gemini.translate(text, hop).await,
        }
    }
}

/// Run every hop of the request's plan in order, feeding each output
/// into the next. The first failing hop ends the request with its error;
/// an empty hop output ends it with `EmptyResponse`.
pub async fn run(
    translator: &(impl Translator + ?Sized),
    request: &TranslationRequest,
) -> Result<String, TranslateError> {
    let hops = plan(request.script);
    let mut text = request.source_text.clone();

    for (step, hop) in hops.iter().enumerate() {
        debug!(%hop, step = step + 1, of = hops.len(), input_len = text.len(), "Dispatching hop");
        let output = translator.translate(&text, *hop).await?;
        let output = output.trim();
        if output.is_empty() {
            info!(%hop, "Backend returned an empty translation");
            return Err(TranslateError::EmptyResponse);
        }
        text = output.to_string();
    }

    Ok(text)
}
