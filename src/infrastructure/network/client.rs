use crate::domain::error::TranslateError;
use reqwest::Response;
use serde::Deserialize;
use serde_json::Value;

/// Sampling temperature for every cloud request: keep the model on one
/// literal translation.
pub const TRANSLATION_TEMPERATURE: f64 = 0.2;

// `{"error": {...}}` as returned by both cloud APIs
#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
    /// A string sentinel for OpenAI-style APIs, a number for Gemini.
    pub code: Option<Value>,
    pub status: Option<String>,
}

impl ApiErrorDetail {
    pub fn code_str(&self) -> Option<&str> {
        self.code.as_ref().and_then(Value::as_str)
    }

    pub fn code_num(&self) -> Option<i64> {
        self.code.as_ref().and_then(Value::as_i64)
    }
}

/// Map a non-2xx body onto the error taxonomy.
///
/// A structured error with a message becomes `QuotaExceeded` when
/// `is_quota` says so and `Backend` otherwise. Anything else is wrapped
/// raw.
pub fn classify_error_body(
    body: &str,
    is_quota: impl Fn(&ApiErrorDetail) -> bool,
) -> TranslateError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.error.message.clone() {
            if is_quota(&envelope.error) {
                return TranslateError::QuotaExceeded(message);
            }
            return TranslateError::Backend(message);
        }
    }
    TranslateError::Backend(format!("API error: {}", body))
}

/// Pass 2xx responses through, turn the rest into a classified error.
pub async fn check_status(
    response: Response,
    is_quota: impl Fn(&ApiErrorDetail) -> bool,
) -> Result<Response, TranslateError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await?;
    tracing::info!(status = status.as_u16(), "Cloud backend returned an error");
    Err(classify_error_body(&body, is_quota))
}

/// Decode a successful body. Missing fields are the caller's business;
/// only a body that is not JSON at all fails here.
pub async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, TranslateError> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| TranslateError::Backend(format!("Failed to parse response: {}", e)))
}
